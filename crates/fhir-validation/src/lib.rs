#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # fhir-validation
//!
//! Primitive validators and the runtime validation API.
//!
//! This crate provides the FHIR primitive catalog, a configurable
//! [`ValidationEngine`] and report rendering on top of the `fhir-schema`
//! combinators.
//!
//! ## Example Usage
//!
//! ```rust
//! use fhir_validation::{decode, is_valid, primitives};
//! use serde_json::json;
//!
//! let code = primitives::code();
//! assert_eq!(decode(&code, &json!("55423-8")).unwrap(), json!("55423-8"));
//!
//! let trail = decode(&code, &json!(2)).unwrap_err();
//! assert_eq!(trail.messages(), vec!["Invalid value 2 supplied to : code"]);
//! assert!(!is_valid(&primitives::positive_int(), &json!(0)));
//! ```

pub mod engine;
pub mod primitives;
pub mod reporter;

// Re-export main types
pub use engine::{ValidationConfig, ValidationEngine};
pub use primitives::PrimitiveKind;
pub use reporter::{ReportFormat, ValidationIssue, ValidationReport, ValidationReporter};

use fhir_ir::Value;
use fhir_schema::{ErrorTrail, Validation, Validator};
use thiserror::Error;

/// Errors that can occur around validation
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation failed:\n{0}")]
    Invalid(#[from] ErrorTrail),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cannot convert decoded {type_name}: {source}")]
    Conversion {
        type_name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unknown primitive kind: {0}")]
    UnknownKind(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Report error: {0}")]
    Report(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Decode with default settings
///
/// # Errors
///
/// Returns the first failure's trail.
pub fn decode(validator: &Validator, input: &Value) -> Validation<Value> {
    ValidationEngine::new().decode(validator, input)
}

/// Encode with default settings
#[must_use]
pub fn encode(validator: &Validator, value: &Value) -> Value {
    ValidationEngine::new().encode(validator, value)
}

/// Whether `input` decodes with default settings
#[must_use]
pub fn is_valid(validator: &Validator, input: &Value) -> bool {
    ValidationEngine::new().is_valid(validator, input)
}
