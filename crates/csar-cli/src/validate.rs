//! # Validate Subcommand
//!
//! Validates one unpacked package directory and prints the report.
//! The exit code tells the caller whether the package is accepted.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use csar_core::ValidationResult;
use csar_validate::{Sol004Validator, ValidatorConfig};

use crate::package::load_package;

/// Report format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One line per violation.
    #[default]
    Text,
    /// The validation result as a JSON object keyed by category.
    Json,
}

/// Arguments for the `csar validate` subcommand.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Unpacked package directory.
    #[arg(value_name = "DIR")]
    pub path: PathBuf,

    /// Extra folder known to exist in the archive. Repeatable.
    #[arg(long = "folder", value_name = "PATH")]
    pub folders: Vec<String>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute the validate subcommand.
///
/// Returns exit code: 0 when the package is accepted, 1 when it has
/// violations. Operational failures are returned as errors.
pub fn run_validate(args: &ValidateArgs, config: ValidatorConfig) -> Result<u8> {
    let store = load_package(&args.path)
        .with_context(|| format!("failed to load package {}", args.path.display()))?;

    let mut folders: Vec<String> = store.folders().map(str::to_string).collect();
    folders.extend(args.folders.iter().cloned());

    let result = Sol004Validator::new(config).validate(&store, &folders);
    tracing::info!(
        package = %args.path.display(),
        errors = result.error_count(),
        "validated package"
    );

    let report = match args.format {
        OutputFormat::Text => render_text(&args.path, &result),
        OutputFormat::Json => render_json(&result)?,
    };
    print!("{report}");

    Ok(if result.is_empty() { 0 } else { 1 })
}

/// Human-readable report.
pub fn render_text(package: &Path, result: &ValidationResult) -> String {
    let mut out = String::new();
    if result.is_empty() {
        let _ = writeln!(out, "OK: {}", package.display());
        return out;
    }
    let _ = writeln!(out, "FAIL: {}", package.display());
    for (category, errors) in result.iter() {
        for error in errors {
            let _ = writeln!(out, "  {} [{category}] {}", error.level, error.message);
        }
    }
    let _ = writeln!(out, "\n{} violation(s) found.", result.error_count());
    out
}

/// Machine-readable report, newline terminated.
pub fn render_json(result: &ValidationResult) -> Result<String> {
    let mut json =
        serde_json::to_string_pretty(result).context("failed to serialize validation result")?;
    json.push('\n');
    Ok(json)
}
