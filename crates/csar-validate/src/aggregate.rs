//! Accumulation of violations into a [`ValidationResult`].
//!
//! One collector lives for the duration of one validation call. Every
//! violation is recorded under the configured category in the order it was
//! reported.

use csar_core::ValidationResult;

use crate::violation::Violation;

/// Collects violations for a single category.
#[derive(Debug)]
pub struct ResultCollector {
    category: String,
    result: ValidationResult,
}

impl ResultCollector {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            result: ValidationResult::new(),
        }
    }

    pub fn report(&mut self, violation: Violation) {
        tracing::debug!(category = %self.category, violation = %violation, "violation");
        self.result.push(self.category.as_str(), violation.into());
    }

    pub fn report_all(&mut self, violations: impl IntoIterator<Item = Violation>) {
        for violation in violations {
            self.report(violation);
        }
    }

    pub fn into_result(self) -> ValidationResult {
        self.result
    }
}
