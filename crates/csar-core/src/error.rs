//! # Error Hierarchy
//!
//! Structured error types for the core crate, built with `thiserror`.
//! Rule violations found while validating a package are *not* errors in
//! this sense; they are reported as [`ValidationError`](crate::ValidationError)
//! data. The types here cover misuse of the core API itself.

use thiserror::Error;

/// Errors raised when constructing a [`PackagePath`](crate::PackagePath).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    /// The path is empty (or only separators / `.` segments).
    #[error("package path is empty")]
    Empty,

    /// A `..` segment climbs above the package root.
    #[error("package path \"{0}\" escapes the package root")]
    EscapesRoot(String),
}
