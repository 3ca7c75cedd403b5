//! Validator configuration errors.
//!
//! Rule violations found in a package are never errors; they are data in
//! the returned [`ValidationResult`](csar_core::ValidationResult). The only
//! fallible operation in this crate is loading a [`ValidatorConfig`](crate::ValidatorConfig).

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading or checking a validator configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML for the expected shape.
    #[error("failed to parse config YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// A configuration value is unusable.
    #[error("invalid config field '{field}': {reason}")]
    Invalid { field: String, reason: String },
}
