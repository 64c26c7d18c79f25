//! Error trail types

use crate::context::{ContextEntry, ContextKey};
use fhir_ir::{Path, Value, ValueKind, stringify};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of decoding: the validated value or the error trail
pub type Validation<T> = std::result::Result<T, ErrorTrail>;

/// Why a value failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum ErrorKind {
    /// The runtime kind of the value is wrong
    TypeMismatch {
        expected: ValueKind,
        found: ValueKind,
    },

    /// Right kind, but a pattern or range constraint failed
    Format { constraint: String },

    /// A required field is absent
    MissingField,

    /// A field no shape declares (strict mode only)
    UnknownField,

    /// A union without alternatives
    NoAlternative,

    /// Nesting exceeded the configured limit
    DepthExceeded { limit: usize },

    /// A registry reference named a validator that was never registered
    UnresolvedReference { name: String },
}

impl ErrorKind {
    /// Type mismatch against the kind of `found`
    #[must_use]
    pub fn type_mismatch(expected: ValueKind, found: &Value) -> Self {
        ErrorKind::TypeMismatch {
            expected,
            found: ValueKind::of(found),
        }
    }

    /// Format violation with a description of the constraint
    pub fn format(constraint: impl Into<String>) -> Self {
        ErrorKind::Format {
            constraint: constraint.into(),
        }
    }

    /// Stable code for this kind of failure
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::MissingField => "FHIR-1-10",
            ErrorKind::TypeMismatch { .. } => "FHIR-1-11",
            ErrorKind::Format { .. } => "FHIR-1-14",
            ErrorKind::UnresolvedReference { .. } => "FHIR-1-17",
            ErrorKind::UnknownField => "FHIR-1-18",
            ErrorKind::NoAlternative => "FHIR-1-21",
            ErrorKind::DepthExceeded { .. } => "FHIR-1-22",
        }
    }

    /// Short human-readable explanation
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            ErrorKind::TypeMismatch { expected, found } => {
                format!("expected {expected}, found {found}")
            }
            ErrorKind::Format { constraint } => format!("does not satisfy {constraint}"),
            ErrorKind::MissingField => "required field is missing".to_string(),
            ErrorKind::UnknownField => "field is not declared".to_string(),
            ErrorKind::NoAlternative => "union has no alternatives".to_string(),
            ErrorKind::DepthExceeded { limit } => format!("nesting deeper than {limit}"),
            ErrorKind::UnresolvedReference { name } => format!("'{name}' is not registered"),
        }
    }
}

/// One failure with the context it happened in
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Failure category
    pub kind: ErrorKind,
    /// Keys and validator names from the root to the failure
    pub context: Vec<ContextEntry>,
    /// Offending raw value (`None` when absent)
    pub value: Option<Value>,
}

impl ValidationError {
    /// Data path (field names and indices) of the offending value
    #[must_use]
    pub fn path(&self) -> Path {
        self.context
            .iter()
            .filter_map(|entry| match &entry.key {
                ContextKey::Path(segment) => Some(segment.clone()),
                ContextKey::Root | ContextKey::Member(_) => None,
            })
            .collect()
    }

    /// Context rendered as `key: Type` entries joined by `/`
    #[must_use]
    pub fn context_string(&self) -> String {
        self.context
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Name of the innermost validator
    #[must_use]
    pub fn type_name(&self) -> Option<&str> {
        self.context.last().map(|entry| entry.type_name.as_str())
    }

    /// Human-readable line, e.g. `Invalid value 2 supplied to : code`
    #[must_use]
    pub fn message(&self) -> String {
        match &self.kind {
            ErrorKind::DepthExceeded { limit } => {
                format!("Maximum depth {limit} exceeded at {}", self.context_string())
            }
            ErrorKind::UnresolvedReference { name } => {
                format!(
                    "Unresolved reference '{name}' at {}",
                    self.context_string()
                )
            }
            _ => format!(
                "Invalid value {} supplied to {}",
                stringify(self.value.as_ref()),
                self.context_string()
            ),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Ordered list of failures returned by a failed decode
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ErrorTrail {
    errors: Vec<ValidationError>,
}

impl ErrorTrail {
    /// Create an empty trail
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one failure
    pub fn push(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    /// Append every failure of another trail
    pub fn extend(&mut self, other: ErrorTrail) {
        self.errors.extend(other.errors);
    }

    /// Keep at most `max` failures
    pub fn truncate(&mut self, max: usize) {
        self.errors.truncate(max);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> Option<&ValidationError> {
        self.errors.first()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.errors.iter()
    }

    /// One message per failure
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ValidationError::message).collect()
    }

    #[must_use]
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.errors
    }
}

impl From<ValidationError> for ErrorTrail {
    fn from(error: ValidationError) -> Self {
        Self {
            errors: vec![error],
        }
    }
}

impl IntoIterator for ErrorTrail {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorTrail {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}

impl fmt::Display for ErrorTrail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("\n"))
    }
}

impl std::error::Error for ErrorTrail {}
