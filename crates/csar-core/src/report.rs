//! # Validation Result Model
//!
//! Violations are returned as data, never raised. A [`ValidationResult`]
//! maps a category key (the surrounding system uses one category per
//! upload) to the ordered list of [`ValidationError`]s found under it.
//! An empty result signals acceptance; whether to reject or accept with
//! warnings is the caller's decision.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Severity of a reported violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ErrorLevel {
    /// The package must not be accepted as-is.
    Error,
    /// Reserved for non-fatal findings.
    Warning,
    /// Informational only.
    Info,
}

impl std::fmt::Display for ErrorLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Error => "ERROR",
            Self::Warning => "WARNING",
            Self::Info => "INFO",
        };
        f.write_str(s)
    }
}

/// One reported violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidationError {
    /// Severity.
    pub level: ErrorLevel,
    /// Human-readable description.
    pub message: String,
}

impl ValidationError {
    /// Create a violation with an explicit level.
    pub fn new(level: ErrorLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
        }
    }

    /// Create an `ERROR`-level violation.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ErrorLevel::Error, message)
    }

    /// Create a `WARNING`-level violation.
    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(ErrorLevel::Warning, message)
    }
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.level, self.message)
    }
}

/// Violations grouped by category, in insertion order within a category.
///
/// Categories only appear once they hold at least one violation, so an
/// accepted package yields an empty map.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationResult {
    categories: BTreeMap<String, Vec<ValidationError>>,
}

impl ValidationResult {
    /// Create an empty (accepting) result.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a violation under `category`.
    pub fn push(&mut self, category: impl Into<String>, error: ValidationError) {
        self.categories
            .entry(category.into())
            .or_default()
            .push(error);
    }

    /// Whether no violation was recorded in any category.
    pub fn is_empty(&self) -> bool {
        self.categories.values().all(Vec::is_empty)
    }

    /// Number of categories holding violations.
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Violations recorded under `category`, if any.
    pub fn get(&self, category: &str) -> Option<&[ValidationError]> {
        self.categories.get(category).map(Vec::as_slice)
    }

    /// Total number of violations across categories.
    pub fn error_count(&self) -> usize {
        self.categories.values().map(Vec::len).sum()
    }

    /// Whether any violation has [`ErrorLevel::Error`].
    pub fn has_errors(&self) -> bool {
        self.iter()
            .any(|(_, errors)| errors.iter().any(|e| e.level == ErrorLevel::Error))
    }

    /// Iterate categories in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ValidationError])> {
        self.categories
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Consume into the underlying map.
    pub fn into_inner(self) -> BTreeMap<String, Vec<ValidationError>> {
        self.categories
    }
}
