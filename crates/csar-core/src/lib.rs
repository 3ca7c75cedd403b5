#![deny(missing_docs)]

//! # csar-core: Foundational Types for CSAR Validation
//!
//! This crate defines the types shared by every other crate in the
//! workspace. It has no internal crate dependencies, only `serde` and
//! `thiserror` from the external ecosystem.
//!
//! ## Design Principles
//!
//! 1. **Newtype for package paths.** A [`PackagePath`] is always normalized
//!    (forward slashes, no `.`/`..` segments, never escapes the package
//!    root). Lookups in the [`PackageFileStore`] go through the same
//!    normalization, so `Definitions/./a.yaml` and `Definitions/a.yaml`
//!    name the same file.
//!
//! 2. **Violations are data.** A validator never raises; it returns a
//!    [`ValidationResult`] mapping a category to an ordered list of
//!    [`ValidationError`]s. An empty result means the package is accepted.
//!
//! 3. **The store is read-only input.** [`PackageFileStore`] is built by the
//!    caller (archive extraction is out of scope) and borrowed immutably by
//!    validation code.

pub mod constants;
pub mod digest;
pub mod error;
pub mod path;
pub mod report;
pub mod store;

// Re-export primary types at crate root for ergonomic imports.
pub use digest::{is_hex_digest, DigestAlgorithm};
pub use error::PathError;
pub use path::PackagePath;
pub use report::{ErrorLevel, ValidationError, ValidationResult};
pub use store::PackageFileStore;
