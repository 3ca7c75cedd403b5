//! Validator configuration.
//!
//! The defaults match the ETSI SOL004 profile supported by the validator:
//! results under `uploadFile`, `TOSCA-Meta-File-Version: 1.0`,
//! `CSAR-Version: 1.1` and `.mf` manifests. Deployments may widen the
//! accepted version lists through a YAML file:
//!
//! ```yaml
//! category: uploadFile
//! accepted_meta_file_versions: ["1.0"]
//! accepted_csar_versions: ["1.1"]
//! manifest_extension: mf
//! ```
//!
//! Missing fields fall back to their defaults.

use std::path::Path;

use csar_core::constants::{CSAR_VERSION, MANIFEST_EXTENSION, META_FILE_VERSION, UPLOAD_FILE_CATEGORY};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Tunables of a [`Sol004Validator`](crate::Sol004Validator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidatorConfig {
    /// Category key under which every violation is reported.
    pub category: String,
    /// Accepted `TOSCA-Meta-File-Version` values.
    pub accepted_meta_file_versions: Vec<String>,
    /// Accepted `CSAR-Version` values.
    pub accepted_csar_versions: Vec<String>,
    /// Required manifest file extension, without the dot.
    pub manifest_extension: String,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            category: UPLOAD_FILE_CATEGORY.to_string(),
            accepted_meta_file_versions: vec![META_FILE_VERSION.to_string()],
            accepted_csar_versions: vec![CSAR_VERSION.to_string()],
            manifest_extension: MANIFEST_EXTENSION.to_string(),
        }
    }
}

impl ValidatorConfig {
    /// Parse a configuration from YAML text and check it.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::YamlParse`] for malformed YAML and
    /// [`ConfigError::Invalid`] for unusable values.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes as unit, not as a defaulted struct.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Read and parse a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read, otherwise
    /// the errors of [`ValidatorConfig::from_yaml_str`].
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml_str(&content)?;
        tracing::debug!(path = %path.display(), category = %config.category, "loaded validator config");
        Ok(config)
    }

    /// Check that every field is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.category.trim().is_empty() {
            return Err(invalid("category", "must not be empty"));
        }
        if self.accepted_meta_file_versions.is_empty() {
            return Err(invalid("accepted_meta_file_versions", "must list at least one version"));
        }
        if self.accepted_csar_versions.is_empty() {
            return Err(invalid("accepted_csar_versions", "must list at least one version"));
        }
        let extension = self.manifest_extension.trim();
        if extension.is_empty() || extension.starts_with('.') {
            return Err(invalid(
                "manifest_extension",
                "must be a non-empty extension without a leading dot",
            ));
        }
        Ok(())
    }
}

fn invalid(field: &str, reason: &str) -> ConfigError {
    ConfigError::Invalid {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}
