//! # Package Loading
//!
//! Reads an unpacked package directory into a [`PackageFileStore`]. Every
//! regular file is stored under its path relative to the package root,
//! with `/` separators, and every directory is recorded as a folder.

use std::path::{Component, Path};

use anyhow::{bail, Context, Result};
use csar_core::PackageFileStore;

/// Load every file and directory under `root`.
///
/// # Errors
///
/// Fails if `root` is not a directory, if any entry cannot be read, or if
/// a path is not valid UTF-8.
pub fn load_package(root: &Path) -> Result<PackageFileStore> {
    if !root.is_dir() {
        bail!("package directory not found: {}", root.display());
    }
    let mut store = PackageFileStore::new();
    walk(root, root, &mut store)?;
    tracing::debug!(
        root = %root.display(),
        files = store.len(),
        folders = store.folders().count(),
        "loaded package"
    );
    Ok(store)
}

fn walk(root: &Path, dir: &Path, store: &mut PackageFileStore) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read directory {}", dir.display()))?;
    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", dir.display()))?;
        let path = entry.path();
        let relative = package_relative(root, &path)?;
        if path.is_dir() {
            store
                .add_folder(&relative)
                .with_context(|| format!("invalid package folder {relative}"))?;
            walk(root, &path, store)?;
        } else if path.is_file() {
            let content = std::fs::read(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            store
                .add_file(&relative, content)
                .with_context(|| format!("invalid package path {relative}"))?;
        } else {
            tracing::warn!(path = %path.display(), "skipping entry that is neither file nor directory");
        }
    }
    Ok(())
}

/// `path` relative to `root`, joined with `/`.
fn package_relative(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .with_context(|| format!("{} is outside {}", path.display(), root.display()))?;
    let mut segments = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(segment) => match segment.to_str() {
                Some(s) => segments.push(s),
                None => bail!("package path is not valid UTF-8: {}", path.display()),
            },
            _ => bail!("unexpected path component in {}", path.display()),
        }
    }
    Ok(segments.join("/"))
}
