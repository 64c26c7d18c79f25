//! Validation reporter

use fhir_schema::{ErrorKind, ErrorTrail, ValidationError};
use serde::Serialize;
use std::fmt::Write as _;

/// Output format for rendered reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

/// One reported failure
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Data path of the offending value (`section/0/title`)
    pub path: String,
    /// Context trail (`: Composition/section: ...`)
    pub context: String,
    /// Human-readable message
    pub message: String,
    /// Stable code of the failure kind
    pub code: &'static str,
    pub kind: ErrorKind,
}

impl From<&ValidationError> for ValidationIssue {
    fn from(error: &ValidationError) -> Self {
        Self {
            path: error.path().to_string(),
            context: error.context_string(),
            message: error.message(),
            code: error.kind.code(),
            kind: error.kind.clone(),
        }
    }
}

/// Outcome of validating one value against one validator
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub is_valid: bool,
    /// Name of the validator the value was checked against
    pub type_name: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationReport {
    #[must_use]
    pub fn has_issues(&self) -> bool {
        !self.issues.is_empty()
    }
}

/// Reports validation results
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationReporter {
    format: ReportFormat,
}

impl ValidationReporter {
    /// Create a new validation reporter
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_format(format: ReportFormat) -> Self {
        Self { format }
    }

    /// Build a report; `None` means the value decoded successfully
    #[must_use]
    pub fn report(&self, type_name: &str, trail: Option<&ErrorTrail>) -> ValidationReport {
        let issues: Vec<ValidationIssue> = trail
            .map(|trail| trail.iter().map(ValidationIssue::from).collect())
            .unwrap_or_default();
        ValidationReport {
            is_valid: trail.is_none_or(ErrorTrail::is_empty),
            type_name: type_name.to_string(),
            issues,
        }
    }

    /// Render a report in this reporter's format
    ///
    /// # Errors
    ///
    /// Returns `Error::Report` if JSON serialization fails.
    pub fn render(&self, report: &ValidationReport) -> crate::Result<String> {
        match self.format {
            ReportFormat::Text => Ok(Self::render_text(report)),
            ReportFormat::Json => serde_json::to_string_pretty(report)
                .map_err(|e| crate::Error::Report(e.to_string())),
        }
    }

    fn render_text(report: &ValidationReport) -> String {
        if report.issues.is_empty() {
            return "No errors!".to_string();
        }
        let mut out = String::new();
        for issue in &report.issues {
            let _ = writeln!(out, "{} [{}]", issue.message, issue.code);
        }
        out.truncate(out.trim_end().len());
        out
    }
}
