//! # TOSCA.meta Parsing
//!
//! `TOSCA-Metadata/TOSCA.meta` is a line-oriented file of `KEY: VALUE`
//! attributes. The parser is lenient in what it records and strict in what
//! it reports: every malformed line yields a [`Violation`] and parsing
//! continues, so one pass surfaces every grammar problem.
//!
//! Keys are split at the first `:`; surrounding whitespace is trimmed from
//! both key and value, and blank lines are skipped. Recognized keys are
//! modelled by [`MetaAttribute`]; anything else is kept as
//! [`MetaKey::Unrecognized`] and reported, never silently dropped.

use std::collections::HashSet;

use crate::violation::Violation;

/// Attributes recognized in `TOSCA.meta`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MetaAttribute {
    /// `TOSCA-Meta-File-Version`
    MetaFileVersion,
    /// `CSAR-Version`
    CsarVersion,
    /// `Created-By`
    CreatedBy,
    /// `Entry-Definitions`
    EntryDefinitions,
    /// `ETSI-Entry-Manifest`
    EtsiEntryManifest,
    /// `ETSI-Entry-Change-Log`
    EtsiEntryChangeLog,
    /// `ETSI-Entry-Tests`
    EtsiEntryTests,
    /// `ETSI-Entry-Licenses`
    EtsiEntryLicenses,
    /// `ETSI-Entry-Certificate`
    EtsiEntryCertificate,
}

impl MetaAttribute {
    /// All recognized attributes, mandatory ones first.
    pub const ALL: [MetaAttribute; 9] = [
        Self::MetaFileVersion,
        Self::CsarVersion,
        Self::CreatedBy,
        Self::EntryDefinitions,
        Self::EtsiEntryManifest,
        Self::EtsiEntryChangeLog,
        Self::EtsiEntryTests,
        Self::EtsiEntryLicenses,
        Self::EtsiEntryCertificate,
    ];

    /// The key as written in the file.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MetaFileVersion => "TOSCA-Meta-File-Version",
            Self::CsarVersion => "CSAR-Version",
            Self::CreatedBy => "Created-By",
            Self::EntryDefinitions => "Entry-Definitions",
            Self::EtsiEntryManifest => "ETSI-Entry-Manifest",
            Self::EtsiEntryChangeLog => "ETSI-Entry-Change-Log",
            Self::EtsiEntryTests => "ETSI-Entry-Tests",
            Self::EtsiEntryLicenses => "ETSI-Entry-Licenses",
            Self::EtsiEntryCertificate => "ETSI-Entry-Certificate",
        }
    }

    /// Look up an attribute by its exact key.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|a| a.as_str() == key)
    }

    /// Whether every package must declare this attribute.
    pub fn is_mandatory(&self) -> bool {
        matches!(
            self,
            Self::MetaFileVersion
                | Self::CsarVersion
                | Self::CreatedBy
                | Self::EntryDefinitions
                | Self::EtsiEntryManifest
                | Self::EtsiEntryChangeLog
        )
    }

    /// Mandatory attributes in declaration order.
    pub fn mandatory() -> impl Iterator<Item = MetaAttribute> {
        Self::ALL.into_iter().filter(MetaAttribute::is_mandatory)
    }
}

impl std::fmt::Display for MetaAttribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Key of a parsed meta line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetaKey {
    /// A recognized attribute.
    Known(MetaAttribute),
    /// A key outside the recognized set, kept verbatim.
    Unrecognized(String),
}

impl MetaKey {
    /// Classify a trimmed key.
    pub fn parse(key: &str) -> Self {
        match MetaAttribute::from_key(key) {
            Some(attribute) => Self::Known(attribute),
            None => Self::Unrecognized(key.to_string()),
        }
    }

    /// The key as written.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Known(attribute) => attribute.as_str(),
            Self::Unrecognized(key) => key,
        }
    }
}

/// One `KEY: VALUE` line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaEntry {
    pub key: MetaKey,
    pub value: String,
    /// 1-based line number.
    pub line: usize,
}

/// A parsed `TOSCA.meta` file: the entries in declaration order plus the
/// grammar violations found while reading it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetaFile {
    entries: Vec<MetaEntry>,
    errors: Vec<Violation>,
}

impl MetaFile {
    /// Parse raw file content.
    pub fn parse(content: &[u8]) -> Self {
        match std::str::from_utf8(content) {
            Ok(text) => Self::parse_str(text),
            Err(_) => Self {
                entries: Vec::new(),
                errors: vec![Violation::MetaNotUtf8],
            },
        }
    }

    /// Parse file text.
    pub fn parse_str(text: &str) -> Self {
        let mut meta = Self::default();
        let mut seen: HashSet<MetaAttribute> = HashSet::new();

        for (idx, raw) in text.lines().enumerate() {
            let line = idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }

            let Some((key, value)) = split_attribute(trimmed) else {
                meta.errors.push(Violation::MetaInvalidLine {
                    line,
                    content: trimmed.to_string(),
                });
                continue;
            };
            if key.is_empty() {
                meta.errors.push(Violation::MetaInvalidLine {
                    line,
                    content: trimmed.to_string(),
                });
                continue;
            }
            if value.is_empty() {
                meta.errors.push(Violation::MetaEntryNoValue {
                    line,
                    key: key.to_string(),
                });
                continue;
            }

            let key = MetaKey::parse(key);
            match &key {
                MetaKey::Known(attribute) => {
                    if !seen.insert(*attribute) {
                        meta.errors.push(Violation::MetaDuplicateEntry {
                            line,
                            key: attribute.as_str().to_string(),
                        });
                        continue;
                    }
                }
                MetaKey::Unrecognized(name) => {
                    tracing::warn!(key = %name, line, "unsupported TOSCA.meta entry");
                    meta.errors.push(Violation::MetaUnsupportedEntry {
                        line,
                        key: name.clone(),
                    });
                }
            }
            meta.entries.push(MetaEntry {
                key,
                value: value.to_string(),
                line,
            });
        }

        meta
    }

    /// Entries in declaration order, including unrecognized ones.
    pub fn entries(&self) -> &[MetaEntry] {
        &self.entries
    }

    /// Grammar violations in line order.
    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    /// Whether the file parsed without violations.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Value of a recognized attribute.
    pub fn get(&self, attribute: MetaAttribute) -> Option<&str> {
        self.entries
            .iter()
            .find(|e| e.key == MetaKey::Known(attribute))
            .map(|e| e.value.as_str())
    }

    /// Mandatory attributes that were not declared.
    pub fn missing_mandatory(&self) -> Vec<MetaAttribute> {
        MetaAttribute::mandatory()
            .filter(|a| self.get(*a).is_none())
            .collect()
    }
}

/// Split a `KEY: VALUE` line at its first `:`, trimming both sides.
///
/// The separator is a colon followed by whitespace or the end of the line,
/// so `Key:value` is not an attribute.
pub(crate) fn split_attribute(text: &str) -> Option<(&str, &str)> {
    let (key, rest) = text.split_once(':')?;
    if !rest.is_empty() && !rest.starts_with(char::is_whitespace) {
        return None;
    }
    Some((key.trim(), rest.trim()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = "TOSCA-Meta-File-Version: 1.0\n\
        CSAR-Version: 1.1\n\
        Created-By: Vendor\n\
        Entry-Definitions: Definitions/MainServiceTemplate.yaml\n\
        ETSI-Entry-Manifest: MainServiceTemplate.mf\n\
        ETSI-Entry-Change-Log: Artifacts/changeLog.text\n";

    #[test]
    fn parses_valid_file_in_order() {
        let meta = MetaFile::parse(VALID.as_bytes());
        assert!(meta.is_valid(), "{:?}", meta.errors());
        assert_eq!(meta.entries().len(), 6);
        assert_eq!(meta.entries()[0].key, MetaKey::Known(MetaAttribute::MetaFileVersion));
        assert_eq!(meta.get(MetaAttribute::CsarVersion), Some("1.1"));
        assert_eq!(
            meta.get(MetaAttribute::EntryDefinitions),
            Some("Definitions/MainServiceTemplate.yaml")
        );
        assert!(meta.missing_mandatory().is_empty());
    }

    #[test]
    fn value_may_contain_colons() {
        let meta = MetaFile::parse_str("Created-By: http://vendor.example:8080/x\n");
        assert_eq!(
            meta.get(MetaAttribute::CreatedBy),
            Some("http://vendor.example:8080/x")
        );
    }

    #[test]
    fn blank_lines_and_crlf_are_tolerated() {
        let meta = MetaFile::parse_str("\r\nCSAR-Version: 1.1\r\n\r\n   \nCreated-By: x\r\n");
        assert!(meta.is_valid());
        assert_eq!(meta.get(MetaAttribute::CsarVersion), Some("1.1"));
        assert_eq!(meta.entries()[1].line, 5);
    }

    #[test]
    fn colon_without_following_space_is_invalid() {
        let meta = MetaFile::parse_str("Entry-Definitions:Definitions/x.yaml\nCSAR-Version:\n");
        assert_eq!(
            meta.errors(),
            &[
                Violation::MetaInvalidLine {
                    line: 1,
                    content: "Entry-Definitions:Definitions/x.yaml".to_string()
                },
                Violation::MetaEntryNoValue {
                    line: 2,
                    key: "CSAR-Version".to_string()
                }
            ]
        );
        assert!(meta.get(MetaAttribute::EntryDefinitions).is_none());
    }

    #[test]
    fn key_without_value_is_one_error() {
        let meta = MetaFile::parse_str("Entry-Definitions: \n");
        assert_eq!(
            meta.errors(),
            &[Violation::MetaEntryNoValue {
                line: 1,
                key: "Entry-Definitions".to_string()
            }]
        );
        assert!(meta.entries().is_empty());
    }

    #[test]
    fn unsupported_key_is_reported_and_kept() {
        let meta = MetaFile::parse_str("Entry-Events: Definitions/events.log\n");
        assert_eq!(meta.errors().len(), 1);
        assert!(matches!(
            &meta.errors()[0],
            Violation::MetaUnsupportedEntry { key, line: 1 } if key == "Entry-Events"
        ));
        assert_eq!(
            meta.entries()[0].key,
            MetaKey::Unrecognized("Entry-Events".to_string())
        );
    }

    #[test]
    fn line_without_separator_is_invalid() {
        let meta = MetaFile::parse_str("CSAR-Version 1.1\n: value\n");
        assert_eq!(meta.errors().len(), 2);
        assert!(meta
            .errors()
            .iter()
            .all(|e| matches!(e, Violation::MetaInvalidLine { .. })));
    }

    #[test]
    fn duplicate_key_keeps_first_value() {
        let meta = MetaFile::parse_str("CSAR-Version: 1.1\nCSAR-Version: 9.9\n");
        assert_eq!(
            meta.errors(),
            &[Violation::MetaDuplicateEntry {
                line: 2,
                key: "CSAR-Version".to_string()
            }]
        );
        assert_eq!(meta.get(MetaAttribute::CsarVersion), Some("1.1"));
    }

    #[test]
    fn non_utf8_is_reported() {
        let meta = MetaFile::parse(&[0xff, 0xfe, b':']);
        assert_eq!(meta.errors(), &[Violation::MetaNotUtf8]);
    }

    #[test]
    fn missing_mandatory_lists_in_declaration_order() {
        let meta = MetaFile::parse_str("Created-By: x\n");
        assert_eq!(
            meta.missing_mandatory(),
            vec![
                MetaAttribute::MetaFileVersion,
                MetaAttribute::CsarVersion,
                MetaAttribute::EntryDefinitions,
                MetaAttribute::EtsiEntryManifest,
                MetaAttribute::EtsiEntryChangeLog,
            ]
        );
    }

    #[test]
    fn optional_attributes_are_not_mandatory() {
        assert!(!MetaAttribute::EtsiEntryTests.is_mandatory());
        assert!(!MetaAttribute::EtsiEntryLicenses.is_mandatory());
        assert!(!MetaAttribute::EtsiEntryCertificate.is_mandatory());
        assert_eq!(MetaAttribute::mandatory().count(), 6);
    }

    #[test]
    fn attribute_keys_round_trip() {
        for attribute in MetaAttribute::ALL {
            assert_eq!(MetaAttribute::from_key(attribute.as_str()), Some(attribute));
        }
        assert_eq!(MetaAttribute::from_key("csar-version"), None);
    }
}
