//! # Manifest Metadata Rules
//!
//! The manifest metadata block identifies the package flavor. A VNF package
//! declares the four `vnf_*` keys, a PNF package the four `pnfd_*` keys.
//! [`classify`] maps a metadata block to a [`MetadataClass`] and [`check`]
//! turns that classification into violations:
//!
//! | Class          | Violations                                                   |
//! |----------------|--------------------------------------------------------------|
//! | `Vnf`/`Pnf`    | one per key beyond the mandatory four                        |
//! | `Mixed`        | a size violation above the limit, then one mixed violation   |
//! | `Incomplete`   | a size violation unless exactly four keys, one per missing key |
//! | `Unidentified` | a size violation unless exactly four keys, then one generic  |
//!
//! Classification only looks at which keys are present, never at their
//! order.

use csar_core::constants::{MANIFEST_METADATA_LIMIT, PNF_MANDATORY_METADATA, VNF_MANDATORY_METADATA};

use crate::manifest::ManifestMetadata;
use crate::violation::Violation;

/// Package flavor declared by the manifest metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PackageFlavor {
    Vnf,
    Pnf,
}

impl PackageFlavor {
    /// The four keys a complete block of this flavor declares.
    pub fn mandatory_keys(&self) -> &'static [&'static str; 4] {
        match self {
            Self::Vnf => &VNF_MANDATORY_METADATA,
            Self::Pnf => &PNF_MANDATORY_METADATA,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Vnf => "vnf",
            Self::Pnf => "pnf",
        }
    }
}

impl std::fmt::Display for PackageFlavor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of classifying a metadata block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataClass {
    /// All four VNF keys, no PNF key. `extra` lists any other keys.
    Vnf { extra: Vec<String> },
    /// All four PNF keys, no VNF key. `extra` lists any other keys.
    Pnf { extra: Vec<String> },
    /// Keys of both flavors are present.
    Mixed,
    /// Some, but not all, keys of one flavor are present.
    Incomplete {
        flavor: PackageFlavor,
        missing: Vec<&'static str>,
    },
    /// No key of either flavor is present.
    Unidentified,
}

impl MetadataClass {
    /// The flavor this block commits to, if any.
    ///
    /// An incomplete block still commits to its flavor; a mixed or
    /// unidentified one does not.
    pub fn flavor(&self) -> Option<PackageFlavor> {
        match self {
            Self::Vnf { .. } => Some(PackageFlavor::Vnf),
            Self::Pnf { .. } => Some(PackageFlavor::Pnf),
            Self::Incomplete { flavor, .. } => Some(*flavor),
            Self::Mixed | Self::Unidentified => None,
        }
    }
}

/// Classify a metadata block by the flavor keys it contains.
pub fn classify(metadata: &ManifestMetadata) -> MetadataClass {
    let has_vnf = VNF_MANDATORY_METADATA
        .iter()
        .any(|k| metadata.contains_key(k));
    let has_pnf = PNF_MANDATORY_METADATA
        .iter()
        .any(|k| metadata.contains_key(k));

    let flavor = match (has_vnf, has_pnf) {
        (true, true) => return MetadataClass::Mixed,
        (false, false) => return MetadataClass::Unidentified,
        (true, false) => PackageFlavor::Vnf,
        (false, true) => PackageFlavor::Pnf,
    };

    let mandatory = flavor.mandatory_keys();
    let missing: Vec<&'static str> = mandatory
        .iter()
        .copied()
        .filter(|k| !metadata.contains_key(k))
        .collect();
    if !missing.is_empty() {
        return MetadataClass::Incomplete { flavor, missing };
    }

    let extra: Vec<String> = metadata
        .keys()
        .filter(|k| !mandatory.iter().any(|m| m == k))
        .map(str::to_string)
        .collect();
    match flavor {
        PackageFlavor::Vnf => MetadataClass::Vnf { extra },
        PackageFlavor::Pnf => MetadataClass::Pnf { extra },
    }
}

/// Violations of a metadata block, in reporting order.
pub fn check(metadata: &ManifestMetadata) -> Vec<Violation> {
    let found = metadata.len();
    let limit = MANIFEST_METADATA_LIMIT;
    let count_mismatch = || Violation::MetadataCountMismatch { limit, found };

    let class = classify(metadata);
    let flavor = class.flavor().map(|f| f.as_str()).unwrap_or_default();
    match class {
        MetadataClass::Vnf { extra } | MetadataClass::Pnf { extra } => extra
            .into_iter()
            .map(|key| Violation::MetadataEntryExceedsLimit {
                key,
                flavor: flavor.to_string(),
                limit,
            })
            .collect(),
        MetadataClass::Mixed => {
            let mut violations = Vec::new();
            if found > limit {
                violations.push(Violation::MetadataTooManyEntries { limit, found });
            }
            violations.push(Violation::MetadataMixed);
            violations
        }
        MetadataClass::Incomplete { missing, .. } => {
            let mut violations = Vec::new();
            if found != limit {
                violations.push(count_mismatch());
            }
            violations.extend(missing.into_iter().map(|key| Violation::MetadataMissingEntry {
                flavor: flavor.to_string(),
                key: key.to_string(),
            }));
            violations
        }
        MetadataClass::Unidentified => {
            let mut violations = Vec::new();
            if found != limit {
                violations.push(count_mismatch());
            }
            violations.push(Violation::MetadataNoMandatoryEntries);
            violations
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use csar_core::constants::*;
    use proptest::prelude::*;

    fn meta(keys: &[&str]) -> ManifestMetadata {
        ManifestMetadata::from_pairs(keys.iter().map(|k| (*k, "value")))
    }

    #[test]
    fn complete_vnf_is_clean() {
        let m = meta(&VNF_MANDATORY_METADATA);
        assert_eq!(classify(&m), MetadataClass::Vnf { extra: vec![] });
        assert!(check(&m).is_empty());
    }

    #[test]
    fn complete_pnf_is_clean() {
        let m = meta(&PNF_MANDATORY_METADATA);
        assert_eq!(classify(&m).flavor(), Some(PackageFlavor::Pnf));
        assert!(check(&m).is_empty());
    }

    #[test]
    fn mixed_four_keys_is_one_violation() {
        let m = meta(&[VNF_PRODUCT_NAME, VNF_PROVIDER_ID, PNFD_NAME, PNFD_PROVIDER]);
        assert_eq!(classify(&m), MetadataClass::Mixed);
        assert_eq!(check(&m), vec![Violation::MetadataMixed]);
    }

    #[test]
    fn mixed_eight_keys_exceeds_limit_and_mixes() {
        let mut keys = VNF_MANDATORY_METADATA.to_vec();
        keys.extend(PNF_MANDATORY_METADATA);
        let v = check(&meta(&keys));
        assert_eq!(
            v,
            vec![
                Violation::MetadataTooManyEntries { limit: 4, found: 8 },
                Violation::MetadataMixed
            ]
        );
    }

    #[test]
    fn foreign_keys_are_one_violation() {
        let m = meta(&["invalid_product_name", "invalid_provider_id", "invalid_package_version", "invalid_release_date_time"]);
        assert_eq!(classify(&m), MetadataClass::Unidentified);
        assert_eq!(check(&m), vec![Violation::MetadataNoMandatoryEntries]);
    }

    #[test]
    fn two_pnf_keys_report_count_and_each_missing() {
        let m = meta(&[PNFD_NAME, PNFD_PROVIDER]);
        let v = check(&m);
        assert_eq!(v.len(), 3);
        assert_eq!(v[0], Violation::MetadataCountMismatch { limit: 4, found: 2 });
        assert!(v.contains(&Violation::MetadataMissingEntry {
            flavor: "pnf".to_string(),
            key: PNFD_ARCHIVE_VERSION.to_string()
        }));
    }

    #[test]
    fn one_vnf_key_reports_count_and_three_missing() {
        let v = check(&meta(&[VNF_PRODUCT_NAME]));
        assert_eq!(v.len(), 4);
        assert!(v[1..]
            .iter()
            .all(|e| matches!(e, Violation::MetadataMissingEntry { flavor, .. } if flavor == "vnf")));
    }

    #[test]
    fn incomplete_block_of_four_has_no_count_violation() {
        let v = check(&meta(&[PNFD_NAME, PNFD_PROVIDER, PNFD_ARCHIVE_VERSION, "custom"]));
        assert_eq!(
            v,
            vec![Violation::MetadataMissingEntry {
                flavor: "pnf".to_string(),
                key: PNFD_RELEASE_DATE_TIME.to_string()
            }]
        );
    }

    #[test]
    fn complete_block_with_extra_key_flags_the_extra() {
        let mut keys = VNF_MANDATORY_METADATA.to_vec();
        keys.push("compatible_specification_versions");
        let m = meta(&keys);
        assert_eq!(
            classify(&m),
            MetadataClass::Vnf {
                extra: vec!["compatible_specification_versions".to_string()]
            }
        );
        let v = check(&m);
        assert_eq!(v.len(), 1);
        assert!(matches!(&v[0], Violation::MetadataEntryExceedsLimit { key, .. } if key == "compatible_specification_versions"));
    }

    #[test]
    fn empty_block_is_unidentified_with_count() {
        assert_eq!(
            check(&ManifestMetadata::default()),
            vec![
                Violation::MetadataCountMismatch { limit: 4, found: 0 },
                Violation::MetadataNoMandatoryEntries
            ]
        );
    }

    fn mixed_keys() -> impl Strategy<Value = Vec<&'static str>> {
        (
            proptest::sample::subsequence(VNF_MANDATORY_METADATA.to_vec(), 1..=4),
            proptest::sample::subsequence(PNF_MANDATORY_METADATA.to_vec(), 1..=4),
        )
            .prop_flat_map(|(vnf, pnf)| {
                let mut all = vnf;
                all.extend(pnf);
                Just(all).prop_shuffle()
            })
    }

    proptest! {
        #[test]
        fn mixed_blocks_never_report_missing_entries(keys in mixed_keys()) {
            let v = check(&meta(&keys));
            prop_assert_eq!(v.iter().filter(|e| **e == Violation::MetadataMixed).count(), 1);
            let has_missing_entry =
                v.iter().any(|e| matches!(e, Violation::MetadataMissingEntry { .. }));
            prop_assert!(!has_missing_entry);
            prop_assert_eq!(v.len(), 1 + usize::from(keys.len() > 4));
        }

        #[test]
        fn classification_ignores_order(
            keys in proptest::sample::subsequence(
                [VNF_MANDATORY_METADATA, PNF_MANDATORY_METADATA].concat(),
                0..=8,
            ).prop_shuffle()
        ) {
            let mut reversed = keys.clone();
            reversed.reverse();
            prop_assert_eq!(classify(&meta(&keys)).flavor(), classify(&meta(&reversed)).flavor());
            prop_assert_eq!(check(&meta(&keys)).len(), check(&meta(&reversed)).len());
        }
    }
}
