//! # Manifest Parsing
//!
//! The package manifest (`<name>.mf`) is a line-oriented text file with the
//! following layout. Indentation is insignificant and blank lines separate
//! blocks.
//!
//! ```text
//! metadata:
//!     vnf_product_name: Mock
//!     vnf_provider_id: ACME
//!     vnf_package_version: 1.0
//!     vnf_release_date_time: 2019-03-11T11:25:00+00:00
//!
//! Source: Definitions/MainServiceTemplate.yaml
//! Algorithm: SHA-256
//! Hash: 09e5a788acb180162c51679ae4c998039fa6644505db2415e35107d1ee213943
//!
//! non_mano_artifact_sets:
//!     onap_ves_events:
//!         Source: Artifacts/Deployment/Events/ves_events.yaml
//!
//! -----BEGIN CMS-----
//! ...
//! -----END CMS-----
//! ```
//!
//! Non-MANO artifacts may also be declared as `Non-MANO-Artifact-Set: <type>`
//! followed by `Source:` lines up to the next blank line.
//!
//! Like the meta parser, the manifest parser never stops at the first
//! problem: every grammar violation is collected in [`Manifest::errors`].

use std::collections::HashSet;

use csar_core::{is_hex_digest, DigestAlgorithm};

use crate::meta::split_attribute;
use crate::violation::Violation;

const METADATA_HEADER: &str = "metadata:";
const NON_MANO_HEADER: &str = "non_mano_artifact_sets:";
const NON_MANO_SET_KEY: &str = "Non-MANO-Artifact-Set";
const SOURCE_KEY: &str = "Source";
const ALGORITHM_KEY: &str = "Algorithm";
const HASH_KEY: &str = "Hash";
const CMS_BEGIN: &str = "-----BEGIN CMS-----";
const CMS_END: &str = "-----END CMS-----";

/// Ordered `key: value` pairs of the metadata block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestMetadata {
    entries: Vec<(String, String)>,
}

impl ManifestMetadata {
    /// Build from pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    /// Keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Digest declared for a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub algorithm: String,
    pub digest: String,
}

/// A `Source:` declaration with its optional digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceEntry {
    pub path: String,
    pub signature: Option<Signature>,
    /// 1-based line of the `Source:` line.
    pub line: usize,
}

/// Sources grouped under one non-MANO artifact type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NonManoArtifactSet {
    pub artifact_type: String,
    pub sources: Vec<SourceEntry>,
}

impl NonManoArtifactSet {
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.sources.iter().map(|s| s.path.as_str())
    }
}

/// A parsed manifest plus the grammar violations found in it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    metadata: ManifestMetadata,
    sources: Vec<SourceEntry>,
    non_mano_sets: Vec<NonManoArtifactSet>,
    signed: bool,
    has_metadata: bool,
    errors: Vec<Violation>,
}

impl Manifest {
    /// Parse raw manifest content.
    pub fn parse(content: &[u8]) -> Self {
        match std::str::from_utf8(content) {
            Ok(text) => Self::parse_str(text),
            Err(_) => Self {
                errors: vec![Violation::ManifestNotUtf8],
                ..Self::default()
            },
        }
    }

    /// Parse manifest text.
    pub fn parse_str(text: &str) -> Self {
        let mut parser = Parser::default();
        for (idx, raw) in text.lines().enumerate() {
            parser.line(idx + 1, raw.trim());
        }
        parser.finish()
    }

    pub fn metadata(&self) -> &ManifestMetadata {
        &self.metadata
    }

    /// Sources declared outside non-MANO sets, in declaration order.
    pub fn sources(&self) -> &[SourceEntry] {
        &self.sources
    }

    pub fn non_mano_artifact_sets(&self) -> &[NonManoArtifactSet] {
        &self.non_mano_sets
    }

    /// Whether a complete CMS signature block was present.
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    pub fn errors(&self) -> &[Violation] {
        &self.errors
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Whether the manifest opened with a `metadata:` block.
    pub fn declares_metadata(&self) -> bool {
        self.has_metadata
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Section {
    #[default]
    Start,
    Metadata,
    Sources,
    /// Inside `non_mano_artifact_sets:`, or a `Non-MANO-Artifact-Set:`
    /// block that closes on the next blank line.
    NonMano {
        closes_on_blank: bool,
    },
    Signature {
        start: usize,
    },
    AfterSignature,
}

/// Where the next `Algorithm:`/`Hash:` pair attaches.
#[derive(Debug, Clone, Copy)]
enum SignatureTarget {
    Source(usize),
    NonMano { set: usize, source: usize },
}

#[derive(Default)]
struct Parser {
    manifest: Manifest,
    section: Section,
    metadata_keys: HashSet<String>,
    current_set: Option<usize>,
    target: Option<SignatureTarget>,
    pending_algorithm: Option<String>,
}

impl Parser {
    fn line(&mut self, line: usize, text: &str) {
        match self.section {
            Section::Start => self.start_line(line, text),
            Section::Metadata => self.metadata_line(line, text),
            Section::Sources | Section::NonMano { .. } => self.body_line(line, text),
            Section::Signature { .. } => {
                if text == CMS_END {
                    self.manifest.signed = true;
                    self.section = Section::AfterSignature;
                }
            }
            Section::AfterSignature => {
                if !text.is_empty() {
                    self.error(Violation::ManifestContentAfterSignature { line });
                }
            }
        }
    }

    fn start_line(&mut self, line: usize, text: &str) {
        if text.is_empty() {
            return;
        }
        if text == METADATA_HEADER {
            self.manifest.has_metadata = true;
            self.section = Section::Metadata;
            return;
        }
        self.error(Violation::ManifestNoMetadata);
        self.section = Section::Sources;
        self.body_line(line, text);
    }

    fn metadata_line(&mut self, line: usize, text: &str) {
        if text.is_empty() {
            self.section = Section::Sources;
            return;
        }
        if opens_body(text) {
            self.section = Section::Sources;
            self.body_line(line, text);
            return;
        }
        let Some((key, value)) = split_attribute(text) else {
            self.error(Violation::ManifestInvalidMetadataLine {
                line,
                content: text.to_string(),
            });
            return;
        };
        if key.is_empty() {
            self.error(Violation::ManifestInvalidMetadataLine {
                line,
                content: text.to_string(),
            });
        } else if value.is_empty() {
            self.error(Violation::ManifestMetadataNoValue {
                line,
                key: key.to_string(),
            });
        } else if !self.metadata_keys.insert(key.to_string()) {
            self.error(Violation::ManifestDuplicateMetadata {
                line,
                key: key.to_string(),
            });
        } else {
            self.manifest
                .metadata
                .entries
                .push((key.to_string(), value.to_string()));
        }
    }

    fn body_line(&mut self, line: usize, text: &str) {
        if text.is_empty() {
            if let Section::NonMano {
                closes_on_blank: true,
            } = self.section
            {
                self.close_signature();
                self.current_set = None;
                self.section = Section::Sources;
            }
            return;
        }
        if text == CMS_BEGIN {
            self.close_signature();
            self.section = Section::Signature { start: line };
            return;
        }
        if text == NON_MANO_HEADER {
            self.close_signature();
            self.current_set = None;
            self.section = Section::NonMano {
                closes_on_blank: false,
            };
            return;
        }

        match split_attribute(text) {
            Some((SOURCE_KEY, path)) => self.source(line, path),
            Some((ALGORITHM_KEY, value)) => self.algorithm(line, value),
            Some((HASH_KEY, value)) => self.hash(line, value),
            Some((NON_MANO_SET_KEY, artifact_type)) => {
                self.close_signature();
                self.section = Section::NonMano {
                    closes_on_blank: true,
                };
                self.open_set(line, artifact_type);
            }
            Some((artifact_type, ""))
                if self.section
                    == (Section::NonMano {
                        closes_on_blank: false,
                    })
                    && !artifact_type.is_empty() =>
            {
                self.close_signature();
                self.open_set(line, artifact_type);
            }
            _ => self.error(Violation::ManifestInvalidLine {
                line,
                content: text.to_string(),
            }),
        }
    }

    fn source(&mut self, line: usize, path: &str) {
        self.close_signature();
        if path.is_empty() {
            self.error(Violation::ManifestSourceNoPath { line });
            return;
        }
        let entry = SourceEntry {
            path: path.to_string(),
            signature: None,
            line,
        };
        match self.section {
            Section::NonMano { .. } => match self.current_set {
                Some(set) => {
                    let sources = &mut self.manifest.non_mano_sets[set].sources;
                    sources.push(entry);
                    self.target = Some(SignatureTarget::NonMano {
                        set,
                        source: sources.len() - 1,
                    });
                }
                None => self.error(Violation::ManifestNonManoOrphanSource { line }),
            },
            _ => {
                self.manifest.sources.push(entry);
                self.target = Some(SignatureTarget::Source(self.manifest.sources.len() - 1));
            }
        }
    }

    fn algorithm(&mut self, line: usize, value: &str) {
        if self.target.is_none() || self.pending_algorithm.is_some() {
            self.close_signature();
            self.error(Violation::ManifestOrphanSignature {
                line,
                keyword: ALGORITHM_KEY.to_string(),
            });
            return;
        }
        self.pending_algorithm = Some(value.to_string());
    }

    fn hash(&mut self, line: usize, value: &str) {
        let (Some(target), Some(algorithm)) = (self.target.take(), self.pending_algorithm.take())
        else {
            self.close_signature();
            self.error(Violation::ManifestOrphanSignature {
                line,
                keyword: HASH_KEY.to_string(),
            });
            return;
        };

        let Some(source) = self.target_entry(target) else {
            return;
        };
        let source_path = source.path.clone();
        source.signature = Some(Signature {
            algorithm: algorithm.clone(),
            digest: value.to_string(),
        });
        if let Some(reason) = digest_problem(&algorithm, value) {
            self.error(Violation::ManifestInvalidDigest {
                source_path,
                digest: value.to_string(),
                reason,
            });
        }
    }

    fn open_set(&mut self, line: usize, artifact_type: &str) {
        if artifact_type.is_empty() {
            self.error(Violation::ManifestNonManoNoType { line });
            self.current_set = None;
            return;
        }
        let existing = self
            .manifest
            .non_mano_sets
            .iter()
            .position(|s| s.artifact_type == artifact_type);
        let index = existing.unwrap_or_else(|| {
            self.manifest.non_mano_sets.push(NonManoArtifactSet {
                artifact_type: artifact_type.to_string(),
                sources: Vec::new(),
            });
            self.manifest.non_mano_sets.len() - 1
        });
        self.current_set = Some(index);
    }

    fn target_entry(&mut self, target: SignatureTarget) -> Option<&mut SourceEntry> {
        match target {
            SignatureTarget::Source(idx) => self.manifest.sources.get_mut(idx),
            SignatureTarget::NonMano { set, source } => self
                .manifest
                .non_mano_sets
                .get_mut(set)
                .and_then(|s| s.sources.get_mut(source)),
        }
    }

    /// End the signature window of the current source. An algorithm without
    /// a hash is reported here.
    fn close_signature(&mut self) {
        let target = self.target.take();
        if self.pending_algorithm.take().is_none() {
            return;
        }
        let source_path = target
            .and_then(|t| self.target_entry(t).map(|s| s.path.clone()))
            .unwrap_or_default();
        self.error(Violation::ManifestIncompleteSignature { source_path });
    }

    fn error(&mut self, violation: Violation) {
        self.manifest.errors.push(violation);
    }

    fn finish(mut self) -> Manifest {
        match self.section {
            Section::Start => self.error(Violation::ManifestNoMetadata),
            Section::Signature { start } => {
                self.error(Violation::ManifestUnterminatedSignature { line: start })
            }
            _ => self.close_signature(),
        }
        self.manifest
    }
}

/// Lines that end the metadata block without a blank separator.
fn opens_body(text: &str) -> bool {
    text == NON_MANO_HEADER
        || text == CMS_BEGIN
        || matches!(split_attribute(text), Some((SOURCE_KEY | NON_MANO_SET_KEY, _)))
}

/// Describe what is wrong with a declared digest, if anything.
fn digest_problem(algorithm: &str, digest: &str) -> Option<String> {
    if digest.is_empty() {
        return Some("hash is empty".to_string());
    }
    if !is_hex_digest(digest) {
        return Some("hash is not hexadecimal".to_string());
    }
    match DigestAlgorithm::parse(algorithm) {
        Some(alg) if digest.len() != alg.hex_len() => Some(format!(
            "{alg} hash must be {} hex characters, found {}",
            alg.hex_len(),
            digest.len()
        )),
        _ => None,
    }
}
