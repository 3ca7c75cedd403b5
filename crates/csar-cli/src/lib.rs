//! # csar-cli: Command-Line Front End
//!
//! Loads an unpacked SOL004 package from disk and runs the meta-directory
//! validator over it.
//!
//! ## Subcommands
//!
//! - `validate`: validate one package directory and print a text or JSON
//!   report
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers here return exit codes.
//! - All validation rules live in `csar-validate`. This crate only moves
//!   bytes from the filesystem into a `PackageFileStore` and formats the
//!   result.
//! - Exit codes: 0 accepted, 1 rejected, 2 operational error.

pub mod package;
pub mod validate;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use csar_validate::ValidatorConfig;

/// Environment variable naming a validator config file.
pub const CONFIG_ENV: &str = "CSAR_VALIDATOR_CONFIG";

/// Resolve the validator configuration.
///
/// An explicit `--config` path wins over [`CONFIG_ENV`]. With neither set
/// the defaults apply.
pub fn resolve_config(explicit: Option<&Path>) -> Result<ValidatorConfig> {
    let path = match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => std::env::var_os(CONFIG_ENV)
            .filter(|v| !v.is_empty())
            .map(PathBuf::from),
    };
    match path {
        Some(path) => ValidatorConfig::load(&path)
            .with_context(|| format!("failed to load validator config {}", path.display())),
        None => Ok(ValidatorConfig::default()),
    }
}
