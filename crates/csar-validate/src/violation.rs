//! # Violation Catalog
//!
//! Every rule the validator evaluates reports its findings as a
//! [`Violation`]. The `Display` text is the message handed to the caller;
//! the variant keeps the finding machine-checkable in tests.
//!
//! Violations are grouped by kind:
//!
//! - **Structural**: mandatory meta/manifest content missing, naming rules.
//! - **Grammar**: malformed `KEY: VALUE` lines, malformed YAML, incomplete
//!   manifest blocks.
//! - **Referential**: a declared source, import or meta entry names a file
//!   that is not in the package.
//! - **Metadata**: the manifest metadata block does not describe exactly one
//!   package flavor.

use csar_core::ValidationError;
use thiserror::Error;

/// A single rule violation found in a package.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    // -- Structural ---------------------------------------------------------
    /// The root meta file is absent.
    #[error("TOSCA meta file '{0}' not found in the package")]
    MetaFileMissing(String),

    /// A mandatory TOSCA.meta entry is absent.
    #[error("mandatory TOSCA.meta entry '{0}' is missing")]
    MetaEntryMissing(String),

    /// The manifest file does not use the required extension.
    #[error("manifest file '{path}' must have the '.{expected}' extension")]
    ManifestInvalidExtension { path: String, expected: String },

    /// The manifest and main definitions file names differ.
    #[error("manifest file name '{manifest}' does not match main definitions file name '{definitions}'")]
    ManifestNameMismatch {
        manifest: String,
        definitions: String,
    },

    /// A version attribute carries a value outside the accepted set.
    #[error("invalid {attribute} value '{value}' (accepted: {accepted})")]
    MetaInvalidVersion {
        attribute: String,
        value: String,
        accepted: String,
    },

    /// A VNF-only meta entry appears in a PNF package.
    #[error("TOSCA.meta entry '{0}' is only applicable to VNF packages")]
    EntryNotApplicableToPnf(String),

    // -- Meta file grammar ---------------------------------------------------
    /// The meta file is not UTF-8.
    #[error("TOSCA meta file is not valid UTF-8")]
    MetaNotUtf8,

    /// A meta line is not of the form `KEY: VALUE`.
    #[error("invalid TOSCA.meta entry at line {line}: '{content}'")]
    MetaInvalidLine { line: usize, content: String },

    /// A meta entry has an empty value.
    #[error("TOSCA.meta entry '{key}' at line {line} has no value")]
    MetaEntryNoValue { line: usize, key: String },

    /// A meta entry key is outside the recognized attribute set.
    #[error("unsupported TOSCA.meta entry '{key}' at line {line}")]
    MetaUnsupportedEntry { line: usize, key: String },

    /// A recognized meta entry is declared twice.
    #[error("duplicate TOSCA.meta entry '{key}' at line {line}")]
    MetaDuplicateEntry { line: usize, key: String },

    // -- Manifest grammar -----------------------------------------------------
    /// The manifest is not UTF-8.
    #[error("manifest file is not valid UTF-8")]
    ManifestNotUtf8,

    /// The manifest does not open with a `metadata:` block.
    #[error("manifest must start with a 'metadata:' block")]
    ManifestNoMetadata,

    /// A metadata line is not of the form `KEY: VALUE`.
    #[error("invalid manifest metadata entry at line {line}: '{content}'")]
    ManifestInvalidMetadataLine { line: usize, content: String },

    /// A metadata entry has an empty value.
    #[error("manifest metadata entry '{key}' at line {line} has no value")]
    ManifestMetadataNoValue { line: usize, key: String },

    /// A metadata key is declared twice.
    #[error("duplicate manifest metadata entry '{key}' at line {line}")]
    ManifestDuplicateMetadata { line: usize, key: String },

    /// A `Source:` line has no path.
    #[error("manifest Source at line {line} has no path")]
    ManifestSourceNoPath { line: usize },

    /// An `Algorithm:` or `Hash:` line does not follow a source.
    #[error("manifest '{keyword}' at line {line} does not follow a Source entry")]
    ManifestOrphanSignature { line: usize, keyword: String },

    /// An `Algorithm:` line was never completed by a `Hash:` line.
    #[error("signature of manifest Source '{source_path}' declares an algorithm but no hash")]
    ManifestIncompleteSignature { source_path: String },

    /// A declared digest is not well formed.
    #[error("invalid hash '{digest}' for manifest Source '{source_path}': {reason}")]
    ManifestInvalidDigest {
        source_path: String,
        digest: String,
        reason: String,
    },

    /// A non-MANO `Source:` line appears outside an artifact set.
    #[error("non-MANO Source at line {line} is not inside an artifact set")]
    ManifestNonManoOrphanSource { line: usize },

    /// A non-MANO artifact set header names no artifact type.
    #[error("non-MANO artifact set at line {line} has no artifact type")]
    ManifestNonManoNoType { line: usize },

    /// The CMS signature block is never closed.
    #[error("manifest signature block starting at line {line} never completes")]
    ManifestUnterminatedSignature { line: usize },

    /// Content follows the CMS signature block.
    #[error("unexpected content after the manifest signature block at line {line}")]
    ManifestContentAfterSignature { line: usize },

    /// A line matches no manifest construct.
    #[error("invalid manifest line {line}: '{content}'")]
    ManifestInvalidLine { line: usize, content: String },

    // -- Referential ----------------------------------------------------------
    /// The main definitions file named in TOSCA.meta is absent.
    #[error("main definitions file '{0}' referenced in TOSCA.meta does not exist")]
    DefinitionsMissing(String),

    /// The manifest named in TOSCA.meta is absent.
    #[error("manifest file '{0}' referenced in TOSCA.meta does not exist")]
    ManifestMissing(String),

    /// Another file or folder named in TOSCA.meta is absent.
    #[error("'{path}' referenced by TOSCA.meta entry '{entry}' does not exist")]
    MetaReferenceMissing { entry: String, path: String },

    /// A manifest source names a file that is absent.
    #[error("manifest Source '{0}' does not exist in the package")]
    SourceMissing(String),

    /// A non-MANO artifact names a file that is absent.
    #[error("non-MANO artifact '{path}' of type '{artifact_type}' does not exist in the package")]
    NonManoSourceMissing { artifact_type: String, path: String },

    /// A file referenced from TOSCA.meta is not declared as a manifest source.
    #[error("file '{0}' is not declared as a Source in the manifest")]
    SourceNotDeclared(String),

    // -- Metadata -------------------------------------------------------------
    /// An incomplete metadata block does not have exactly the expected size.
    #[error("manifest metadata must contain exactly {limit} entries, found {found}")]
    MetadataCountMismatch { limit: usize, found: usize },

    /// A metadata block holds more entries than allowed.
    #[error("manifest metadata has {found} entries, exceeding the limit of {limit}")]
    MetadataTooManyEntries { limit: usize, found: usize },

    /// A complete flavor block carries an additional key.
    #[error("manifest metadata entry '{key}' exceeds the limit of {limit} {flavor} entries")]
    MetadataEntryExceedsLimit {
        key: String,
        flavor: String,
        limit: usize,
    },

    /// Keys of both flavors are present.
    #[error("manifest metadata mixes pnf and vnf entries")]
    MetadataMixed,

    /// A mandatory key of the detected flavor is absent.
    #[error("manifest metadata is missing mandatory {flavor} entry '{key}'")]
    MetadataMissingEntry { flavor: String, key: String },

    /// No mandatory key of either flavor is present.
    #[error("manifest metadata is missing the mandatory vnf or pnf entries")]
    MetadataNoMandatoryEntries,

    // -- Import graph ---------------------------------------------------------
    /// A definitions document is not valid YAML.
    #[error("invalid YAML format in '{file}': {reason}")]
    InvalidYaml { file: String, reason: String },

    /// An import names a file that is absent.
    #[error("missing import file '{path}' referenced in '{file}'")]
    MissingImportFile { file: String, path: String },

    /// An import entry is structurally invalid.
    #[error("invalid import statement in '{file}': {statement}")]
    InvalidImportStatement { file: String, statement: String },
}

impl Violation {
    /// Convert into the caller-facing `ERROR`-level record.
    pub fn to_validation_error(&self) -> ValidationError {
        ValidationError::error(self.to_string())
    }
}

impl From<Violation> for ValidationError {
    fn from(violation: Violation) -> Self {
        violation.to_validation_error()
    }
}
