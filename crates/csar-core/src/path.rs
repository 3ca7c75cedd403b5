//! # Package Paths
//!
//! [`PackagePath`] is the addressing primitive for files inside an unpacked
//! CSAR. Paths are relative to the package root, case-sensitive, and use
//! forward slashes.
//!
//! ## Normalization
//!
//! Construction normalizes the input: backslashes become `/`, empty and `.`
//! segments are dropped, and `..` removes the preceding segment. A path
//! that is empty after normalization, or whose `..` segments climb above
//! the package root, is rejected.

use serde::{Deserialize, Serialize};

use crate::error::PathError;

/// A normalized path relative to the package root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PackagePath(String);

impl PackagePath {
    /// Create a package path, normalizing separators and dot segments.
    ///
    /// # Errors
    ///
    /// Returns [`PathError::Empty`] if nothing remains after normalization
    /// and [`PathError::EscapesRoot`] if a `..` segment leaves the root.
    pub fn new(value: impl AsRef<str>) -> Result<Self, PathError> {
        let raw = value.as_ref();
        let mut segments: Vec<&str> = Vec::new();
        for segment in raw.split(|c| c == '/' || c == '\\') {
            match segment {
                "" | "." => {}
                ".." => {
                    if segments.pop().is_none() {
                        return Err(PathError::EscapesRoot(raw.to_string()));
                    }
                }
                other => segments.push(other),
            }
        }
        if segments.is_empty() {
            return Err(PathError::Empty);
        }
        Ok(Self(segments.join("/")))
    }

    /// Access the normalized path string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The directory containing this path, or `None` for a root-level file.
    pub fn parent(&self) -> Option<PackagePath> {
        self.0
            .rsplit_once('/')
            .map(|(dir, _)| PackagePath(dir.to_string()))
    }

    /// Resolve `reference` against the directory containing this path.
    ///
    /// A reference starting with `/` is resolved against the package root
    /// instead.
    ///
    /// # Errors
    ///
    /// Propagates the normalization errors of [`PackagePath::new`].
    pub fn resolve(&self, reference: &str) -> Result<PackagePath, PathError> {
        if reference.starts_with('/') {
            return PackagePath::new(reference);
        }
        match self.parent() {
            Some(dir) => PackagePath::new(format!("{}/{reference}", dir.0)),
            None => PackagePath::new(reference),
        }
    }

    /// The final path segment.
    pub fn file_name(&self) -> &str {
        self.0.rsplit('/').next().unwrap_or(&self.0)
    }

    /// The file name without its extension.
    ///
    /// A leading dot (`.hidden`) is part of the stem, not an extension.
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }

    /// The extension of the file name, without the dot.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(idx) => Some(&name[idx + 1..]),
        }
    }
}

impl std::fmt::Display for PackagePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackagePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PackagePath {
    type Error = PathError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        PackagePath::new(value)
    }
}

impl From<PackagePath> for String {
    fn from(path: PackagePath) -> Self {
        path.0
    }
}
