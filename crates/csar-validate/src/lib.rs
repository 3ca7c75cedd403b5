//! # csar-validate: SOL004 Meta-Directory Validation
//!
//! Checks the meta directory of an unpacked ETSI SOL004 CSAR before the
//! package is accepted into a catalog:
//!
//! - **TOSCA.meta** ([`meta`]): `KEY: VALUE` grammar, recognized and
//!   mandatory attributes, accepted versions.
//! - **Manifest** ([`manifest`]): metadata block, `Source:` declarations
//!   with optional digests, non-MANO artifact sets, CMS signature block.
//! - **Metadata flavor** ([`metadata`]): the manifest metadata must describe
//!   exactly one of a VNF or a PNF package.
//! - **Import graph** ([`imports`]): every file reachable through TOSCA
//!   `imports` must exist and be valid YAML.
//! - **Source completeness**: declared sources exist, and the files the
//!   meta directory points at are declared.
//!
//! Violations are returned as data in a [`ValidationResult`](csar_core::ValidationResult);
//! the caller decides whether to reject the package.
//!
//! ```
//! use csar_core::PackageFileStore;
//! use csar_validate::Sol004Validator;
//!
//! let store = PackageFileStore::new();
//! let result = Sol004Validator::default().validate(&store, &[]);
//! assert_eq!(result.error_count(), 1); // TOSCA.meta is missing
//! ```

pub mod aggregate;
pub mod builder;
pub mod config;
pub mod error;
pub mod imports;
pub mod manifest;
pub mod meta;
pub mod metadata;
pub mod validator;
pub mod violation;

pub use aggregate::ResultCollector;
pub use builder::ManifestBuilder;
pub use config::ValidatorConfig;
pub use error::ConfigError;
pub use imports::{DocumentState, ImportGraph, ImportGraphResolver, ImportResolution, ImportStatement};
pub use manifest::{Manifest, ManifestMetadata, NonManoArtifactSet, Signature, SourceEntry};
pub use meta::{MetaAttribute, MetaEntry, MetaFile, MetaKey};
pub use metadata::{classify, MetadataClass, PackageFlavor};
pub use validator::Sol004Validator;
pub use violation::Violation;
