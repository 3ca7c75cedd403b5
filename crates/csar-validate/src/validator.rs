//! # SOL004 Meta-Directory Validator
//!
//! [`Sol004Validator`] runs every rule over an unpacked package and returns
//! the violations as a [`ValidationResult`]. The validator holds only its
//! configuration; each call builds a private [`ValidationContext`], so one
//! instance can serve concurrent callers.
//!
//! ## Phases
//!
//! 1. `TOSCA-Metadata/TOSCA.meta` must exist and parse cleanly, and every
//!    mandatory entry must be declared. A failure here ends validation: the
//!    remaining rules would only report consequences of the same fault.
//! 2. Manifest naming: the configured extension, and the same stem as the
//!    main definitions file.
//! 3. Each meta entry in declaration order: version checks, referenced file
//!    existence, the import graph of the definitions file, and the manifest
//!    checks (grammar, metadata flavor, source completeness).

use std::collections::BTreeSet;

use csar_core::constants::TOSCA_META_PATH;
use csar_core::{PackageFileStore, PackagePath, ValidationResult};

use crate::aggregate::ResultCollector;
use crate::config::ValidatorConfig;
use crate::imports::ImportGraphResolver;
use crate::manifest::Manifest;
use crate::meta::{MetaAttribute, MetaEntry, MetaFile, MetaKey};
use crate::metadata::{self, MetadataClass, PackageFlavor};
use crate::violation::Violation;

/// Validates the meta directory of unpacked SOL004 packages.
#[derive(Debug, Clone, Default)]
pub struct Sol004Validator {
    config: ValidatorConfig,
}

impl Sol004Validator {
    pub fn new(config: ValidatorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    /// Validate a package.
    ///
    /// `folders` lists directory paths known to exist in the archive, in
    /// addition to those recorded in the store. A trailing `/` is ignored.
    pub fn validate(&self, store: &PackageFileStore, folders: &[String]) -> ValidationResult {
        let _span = tracing::debug_span!("validate_package", files = store.len()).entered();
        let mut context = ValidationContext::new(&self.config, store, folders);
        context.run();
        let result = context.finish();
        tracing::info!(
            category = %self.config.category,
            errors = result.error_count(),
            "package validation finished"
        );
        result
    }
}

/// The manifest referenced from TOSCA.meta, parsed once per call.
#[derive(Debug)]
struct ManifestView {
    manifest: Manifest,
    class: MetadataClass,
}

/// Root files referenced from TOSCA.meta that the manifest must declare.
#[derive(Debug, Default)]
struct RootReferences {
    definitions: String,
    manifest: String,
    change_log: String,
}

/// Per-call validation state.
struct ValidationContext<'a> {
    config: &'a ValidatorConfig,
    store: &'a PackageFileStore,
    folders: BTreeSet<String>,
    collector: ResultCollector,
    manifest: Option<ManifestView>,
    roots: RootReferences,
}

impl<'a> ValidationContext<'a> {
    fn new(config: &'a ValidatorConfig, store: &'a PackageFileStore, folders: &[String]) -> Self {
        Self {
            config,
            store,
            folders: folders
                .iter()
                .filter_map(|f| PackagePath::new(f).ok())
                .map(String::from)
                .collect(),
            collector: ResultCollector::new(config.category.as_str()),
            manifest: None,
            roots: RootReferences::default(),
        }
    }

    fn run(&mut self) {
        let store = self.store;
        let Some(content) = store.get_str(TOSCA_META_PATH) else {
            self.collector
                .report(Violation::MetaFileMissing(TOSCA_META_PATH.to_string()));
            return;
        };
        let meta = MetaFile::parse(content);
        if !meta.is_valid() {
            self.collector.report_all(meta.errors().iter().cloned());
            return;
        }

        let missing = meta.missing_mandatory();
        if !missing.is_empty() {
            self.collector.report_all(
                missing
                    .into_iter()
                    .map(|a| Violation::MetaEntryMissing(a.as_str().to_string())),
            );
            return;
        }

        let (Some(definitions), Some(manifest), Some(change_log)) = (
            meta.get(MetaAttribute::EntryDefinitions),
            meta.get(MetaAttribute::EtsiEntryManifest),
            meta.get(MetaAttribute::EtsiEntryChangeLog),
        ) else {
            return;
        };
        self.roots = RootReferences {
            definitions: definitions.to_string(),
            manifest: manifest.to_string(),
            change_log: change_log.to_string(),
        };
        tracing::debug!(definitions, manifest, "TOSCA.meta accepted");

        self.check_manifest_naming(manifest, definitions);
        self.manifest = store.get_str(manifest).map(|content| {
            let manifest = Manifest::parse(content);
            let class = metadata::classify(manifest.metadata());
            ManifestView { manifest, class }
        });

        for entry in meta.entries() {
            self.check_entry(entry);
        }
    }

    fn check_manifest_naming(&mut self, manifest: &str, definitions: &str) {
        // Unnormalizable paths surface as missing files later.
        let (Ok(manifest_path), Ok(definitions_path)) =
            (PackagePath::new(manifest), PackagePath::new(definitions))
        else {
            return;
        };

        if manifest_path.extension() != Some(self.config.manifest_extension.as_str()) {
            self.collector.report(Violation::ManifestInvalidExtension {
                path: manifest.to_string(),
                expected: self.config.manifest_extension.clone(),
            });
        }
        if manifest_path.file_stem() != definitions_path.file_stem() {
            self.collector.report(Violation::ManifestNameMismatch {
                manifest: manifest_path.file_name().to_string(),
                definitions: definitions_path.file_name().to_string(),
            });
        }
    }

    fn check_entry(&mut self, entry: &MetaEntry) {
        let attribute = match &entry.key {
            MetaKey::Known(attribute) => *attribute,
            // Reported while parsing.
            MetaKey::Unrecognized(_) => return,
        };
        let value = entry.value.as_str();
        let config = self.config;

        match attribute {
            MetaAttribute::MetaFileVersion => {
                self.check_version(attribute, value, &config.accepted_meta_file_versions)
            }
            MetaAttribute::CsarVersion => {
                self.check_version(attribute, value, &config.accepted_csar_versions)
            }
            MetaAttribute::CreatedBy => {}
            MetaAttribute::EntryDefinitions => self.check_definitions(value),
            MetaAttribute::EtsiEntryManifest => self.check_manifest(value),
            MetaAttribute::EtsiEntryChangeLog => {
                if !self.store.contains(value) {
                    self.collector.report(Violation::MetaReferenceMissing {
                        entry: attribute.as_str().to_string(),
                        path: value.to_string(),
                    });
                }
            }
            MetaAttribute::EtsiEntryTests | MetaAttribute::EtsiEntryLicenses => {
                if self.flavor() == Some(PackageFlavor::Pnf) {
                    self.collector.report(Violation::EntryNotApplicableToPnf(
                        attribute.as_str().to_string(),
                    ));
                } else {
                    self.check_folder_reference(attribute, value);
                }
            }
            MetaAttribute::EtsiEntryCertificate => self.check_folder_reference(attribute, value),
        }
    }

    fn check_version(&mut self, attribute: MetaAttribute, value: &str, accepted: &[String]) {
        if !accepted.iter().any(|v| v == value) {
            self.collector.report(Violation::MetaInvalidVersion {
                attribute: attribute.as_str().to_string(),
                value: value.to_string(),
                accepted: accepted.join(", "),
            });
        }
    }

    fn check_definitions(&mut self, value: &str) {
        let root = match PackagePath::new(value) {
            Ok(root) if self.store.contains_path(&root) => root,
            _ => {
                self.collector
                    .report(Violation::DefinitionsMissing(value.to_string()));
                return;
            }
        };
        let resolution = ImportGraphResolver::new(self.store).resolve(&root);
        self.collector.report_all(resolution.violations);
    }

    fn check_manifest(&mut self, value: &str) {
        let Some(view) = self.manifest.as_ref() else {
            self.collector
                .report(Violation::ManifestMissing(value.to_string()));
            return;
        };

        let manifest = &view.manifest;
        self.collector.report_all(manifest.errors().iter().cloned());

        let mut violations = Vec::new();
        if manifest.declares_metadata() {
            violations.extend(metadata::check(manifest.metadata()));
        }
        violations.extend(self.missing_sources(manifest));
        if manifest.is_valid() {
            violations.extend(self.undeclared_roots(manifest));
        } else {
            tracing::debug!(
                manifest = value,
                errors = manifest.errors().len(),
                "manifest has grammar errors; skipping undeclared root check"
            );
        }
        self.collector.report_all(violations);
    }

    /// Every declared source, MANO or not, must exist.
    fn missing_sources(&self, manifest: &Manifest) -> Vec<Violation> {
        let mut violations = Vec::new();
        for source in manifest.sources() {
            if !self.store.contains(&source.path) {
                violations.push(Violation::SourceMissing(source.path.clone()));
            }
        }
        for set in manifest.non_mano_artifact_sets() {
            for path in set.paths() {
                if !self.store.contains(path) {
                    violations.push(Violation::NonManoSourceMissing {
                        artifact_type: set.artifact_type.clone(),
                        path: path.to_string(),
                    });
                }
            }
        }
        violations
    }

    /// Every root file that exists must be declared as a source.
    ///
    /// Only meaningful on a manifest without grammar errors: a broken line
    /// may be the declaration that is missing.
    fn undeclared_roots(&self, manifest: &Manifest) -> Vec<Violation> {
        let declared: BTreeSet<PackagePath> = manifest
            .sources()
            .iter()
            .filter_map(|s| PackagePath::new(&s.path).ok())
            .collect();
        let roots = [
            TOSCA_META_PATH,
            self.roots.definitions.as_str(),
            self.roots.manifest.as_str(),
            self.roots.change_log.as_str(),
        ];
        roots
            .into_iter()
            .filter_map(|root| PackagePath::new(root).ok())
            .filter(|path| self.store.contains_path(path) && !declared.contains(path))
            .map(|path| Violation::SourceNotDeclared(path.to_string()))
            .collect()
    }

    /// A Tests/Licenses/Certificate reference may name a folder or a file.
    fn check_folder_reference(&mut self, attribute: MetaAttribute, value: &str) {
        let exists = match PackagePath::new(value) {
            Ok(path) => {
                self.folders.contains(path.as_str())
                    || self.store.contains_folder(path.as_str())
                    || self.store.contains_path(&path)
            }
            Err(_) => false,
        };
        if !exists {
            self.collector.report(Violation::MetaReferenceMissing {
                entry: attribute.as_str().to_string(),
                path: value.to_string(),
            });
        }
    }

    fn flavor(&self) -> Option<PackageFlavor> {
        self.manifest.as_ref().and_then(|view| view.class.flavor())
    }

    fn finish(self) -> ValidationResult {
        self.collector.into_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::ManifestBuilder;
    use csar_core::constants::*;

    const META: &str = "TOSCA-Meta-File-Version: 1.0\n\
        CSAR-Version: 1.1\n\
        Created-By: Vendor\n\
        Entry-Definitions: Definitions/MainServiceTemplate.yaml\n\
        ETSI-Entry-Manifest: Definitions/MainServiceTemplate.mf\n\
        ETSI-Entry-Change-Log: Artifacts/changeLog.text\n";

    fn vnf_package() -> PackageFileStore {
        let manifest = ManifestBuilder::new()
            .with_metadata(VNF_PRODUCT_NAME, "RadioNode")
            .with_metadata(VNF_PROVIDER_ID, "ACME")
            .with_metadata(VNF_PACKAGE_VERSION, "1.0")
            .with_metadata(VNF_RELEASE_DATE_TIME, "2019-03-11T11:25:00+00:00")
            .with_source(TOSCA_META_PATH)
            .with_source("Definitions/MainServiceTemplate.yaml")
            .with_source("Artifacts/changeLog.text")
            .with_source("Definitions/MainServiceTemplate.mf")
            .build();
        let mut store = PackageFileStore::new();
        store.add_file(TOSCA_META_PATH, META).unwrap();
        store
            .add_file("Definitions/MainServiceTemplate.yaml", "tosca_definitions_version: tosca_simple_yaml_1_2\n")
            .unwrap();
        store.add_file("Artifacts/changeLog.text", "").unwrap();
        store
            .add_file("Definitions/MainServiceTemplate.mf", manifest)
            .unwrap();
        store
    }

    fn messages(result: &ValidationResult) -> Vec<String> {
        result
            .get(UPLOAD_FILE_CATEGORY)
            .unwrap_or_default()
            .iter()
            .map(|e| e.message.clone())
            .collect()
    }

    #[test]
    fn valid_package_has_empty_result() {
        let result = Sol004Validator::default().validate(&vnf_package(), &[]);
        assert!(result.is_empty(), "{:?}", messages(&result));
        assert_eq!(result.category_count(), 0);
    }

    #[test]
    fn empty_store_reports_missing_meta_only() {
        let result = Sol004Validator::default().validate(&PackageFileStore::new(), &[]);
        assert_eq!(
            messages(&result),
            vec![Violation::MetaFileMissing(TOSCA_META_PATH.to_string()).to_string()]
        );
    }

    #[test]
    fn missing_mandatory_entries_stop_validation() {
        let mut store = PackageFileStore::new();
        store
            .add_file(TOSCA_META_PATH, "TOSCA-Meta-File-Version: 1.0\nCSAR-Version: 1.1\n")
            .unwrap();
        let result = Sol004Validator::default().validate(&store, &[]);
        assert_eq!(result.error_count(), 4);
        assert!(messages(&result).iter().all(|m| m.starts_with("mandatory TOSCA.meta entry")));
    }

    #[test]
    fn configured_versions_are_accepted() {
        let mut store = vnf_package();
        store
            .add_file(TOSCA_META_PATH, META.replace("CSAR-Version: 1.1", "CSAR-Version: 1.2"))
            .unwrap();
        assert_eq!(Sol004Validator::default().validate(&store, &[]).error_count(), 1);

        let config = ValidatorConfig {
            accepted_csar_versions: vec!["1.1".to_string(), "1.2".to_string()],
            ..ValidatorConfig::default()
        };
        assert!(Sol004Validator::new(config).validate(&store, &[]).is_empty());
    }

    #[test]
    fn custom_category_is_used() {
        let config = ValidatorConfig {
            category: "onboarding".to_string(),
            ..ValidatorConfig::default()
        };
        let result = Sol004Validator::new(config).validate(&PackageFileStore::new(), &[]);
        assert!(result.get("onboarding").is_some());
        assert!(result.get(UPLOAD_FILE_CATEGORY).is_none());
    }

    #[test]
    fn undeclared_root_file_is_reported() {
        let mut store = vnf_package();
        let manifest = ManifestBuilder::new()
            .with_metadata(VNF_PRODUCT_NAME, "RadioNode")
            .with_metadata(VNF_PROVIDER_ID, "ACME")
            .with_metadata(VNF_PACKAGE_VERSION, "1.0")
            .with_metadata(VNF_RELEASE_DATE_TIME, "2019-03-11T11:25:00+00:00")
            .with_source(TOSCA_META_PATH)
            .with_source("Definitions/MainServiceTemplate.yaml")
            .with_source("Definitions/MainServiceTemplate.mf")
            .build();
        store
            .add_file("Definitions/MainServiceTemplate.mf", manifest)
            .unwrap();
        let result = Sol004Validator::default().validate(&store, &[]);
        assert_eq!(
            messages(&result),
            vec![Violation::SourceNotDeclared("Artifacts/changeLog.text".to_string()).to_string()]
        );
    }

    #[test]
    fn certificate_may_be_a_store_folder_or_file() {
        let mut store = vnf_package();
        store
            .add_file(
                TOSCA_META_PATH,
                format!("{META}ETSI-Entry-Certificate: Files/Certificates\n"),
            )
            .unwrap();
        assert_eq!(Sol004Validator::default().validate(&store, &[]).error_count(), 1);

        store.add_folder("Files/Certificates/").unwrap();
        assert!(Sol004Validator::default().validate(&store, &[]).is_empty());
    }

    #[test]
    fn validator_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Sol004Validator>();
    }
}
