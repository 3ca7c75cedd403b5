//! # Package File Store
//!
//! The in-memory view of an unpacked CSAR: every file keyed by its
//! [`PackagePath`], plus the directory paths present in the archive.
//! Archive extraction is the caller's job; validators only borrow the
//! store immutably.

use std::collections::{BTreeMap, BTreeSet};

use crate::error::PathError;
use crate::path::PackagePath;

/// Immutable-by-convention mapping of package path to file content.
#[derive(Debug, Clone, Default)]
pub struct PackageFileStore {
    files: BTreeMap<PackagePath, Vec<u8>>,
    folders: BTreeSet<String>,
}

impl PackageFileStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a file.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `path` does not normalize to a valid
    /// package path.
    pub fn add_file(
        &mut self,
        path: impl AsRef<str>,
        content: impl Into<Vec<u8>>,
    ) -> Result<PackagePath, PathError> {
        let path = PackagePath::new(path)?;
        self.files.insert(path.clone(), content.into());
        Ok(path)
    }

    /// Record a directory present in the archive.
    ///
    /// # Errors
    ///
    /// Returns a [`PathError`] if `path` does not normalize to a valid
    /// package path.
    pub fn add_folder(&mut self, path: impl AsRef<str>) -> Result<(), PathError> {
        let path = PackagePath::new(path)?;
        self.folders.insert(path.into());
        Ok(())
    }

    /// Whether a file exists at `path`. Invalid paths never exist.
    pub fn contains(&self, path: &str) -> bool {
        PackagePath::new(path)
            .map(|p| self.files.contains_key(&p))
            .unwrap_or(false)
    }

    /// Whether a file exists at an already-normalized path.
    pub fn contains_path(&self, path: &PackagePath) -> bool {
        self.files.contains_key(path)
    }

    /// Whether `path` was recorded as a directory. A trailing `/` is ignored.
    pub fn contains_folder(&self, path: &str) -> bool {
        PackagePath::new(path)
            .map(|p| self.folders.contains(p.as_str()))
            .unwrap_or(false)
    }

    /// File content at `path`, if present.
    pub fn get(&self, path: &PackagePath) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }

    /// File content looked up by an unnormalized string path.
    pub fn get_str(&self, path: &str) -> Option<&[u8]> {
        PackagePath::new(path).ok().and_then(|p| self.get(&p))
    }

    /// All file paths in sorted order.
    pub fn paths(&self) -> impl Iterator<Item = &PackagePath> {
        self.files.keys()
    }

    /// All recorded directory paths in sorted order, without trailing `/`.
    pub fn folders(&self) -> impl Iterator<Item = &str> {
        self.folders.iter().map(String::as_str)
    }

    /// Number of files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether the store holds no files.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}
