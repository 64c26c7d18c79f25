//! Validation engine

use crate::reporter::{ValidationReport, ValidationReporter};
use fhir_ir::Value;
use fhir_schema::{
    DEFAULT_MAX_DEPTH, DecodeOptions, ErrorMode, UnknownFields, Validation, Validator,
};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, trace};

/// Validation configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// First-error or collect-all reporting
    pub error_mode: ErrorMode,
    /// Policy for undeclared record fields
    pub unknown_fields: UnknownFields,
    /// Maximum nesting of fields/elements
    pub max_depth: usize,
    /// Maximum errors kept in a trail (0 = unlimited)
    pub max_errors: usize,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::FirstError,
            unknown_fields: UnknownFields::Preserve,
            max_depth: DEFAULT_MAX_DEPTH,
            max_errors: 0,
        }
    }
}

impl ValidationConfig {
    /// Reject undeclared fields and report every failure
    #[must_use]
    pub fn strict() -> Self {
        Self {
            error_mode: ErrorMode::CollectAll,
            unknown_fields: UnknownFields::Reject,
            ..Self::default()
        }
    }

    /// Options handed to each decode call
    #[must_use]
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            error_mode: self.error_mode,
            unknown_fields: self.unknown_fields,
            max_depth: self.max_depth,
        }
    }

    /// Parse a YAML configuration document
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the document does not describe a configuration.
    pub fn from_yaml_str(text: &str) -> crate::Result<Self> {
        serde_yaml::from_str(text).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Parse a JSON configuration document
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` when the document does not describe a configuration.
    pub fn from_json_str(text: &str) -> crate::Result<Self> {
        serde_json::from_str(text).map_err(|e| crate::Error::Config(e.to_string()))
    }

    /// Load a configuration file, JSON when the extension says so, YAML otherwise
    ///
    /// # Errors
    ///
    /// Returns `Error::Io` when the file cannot be read and `Error::Config`
    /// when it cannot be parsed.
    pub fn from_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        debug!(path = %path.display(), json = is_json, "loading validation config");
        if is_json {
            Self::from_json_str(&text)
        } else {
            Self::from_yaml_str(&text)
        }
    }
}

/// Runs validators under one configuration
#[derive(Debug, Clone, Default)]
pub struct ValidationEngine {
    config: ValidationConfig,
}

impl ValidationEngine {
    /// Create an engine with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with specific configuration
    #[must_use]
    pub fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Decode a raw value
    ///
    /// # Errors
    ///
    /// Returns the error trail, capped at `max_errors` entries when set.
    pub fn decode(&self, validator: &Validator, input: &Value) -> Validation<Value> {
        trace!(validator = validator.name(), "decode");
        validator
            .decode(input, self.config.decode_options())
            .map_err(|mut trail| {
                debug!(
                    validator = validator.name(),
                    errors = trail.len(),
                    "decode failed"
                );
                if self.config.max_errors > 0 {
                    trail.truncate(self.config.max_errors);
                }
                trail
            })
    }

    /// Encode an in-memory value to its wire form
    #[must_use]
    pub fn encode(&self, validator: &Validator, value: &Value) -> Value {
        validator.encode(value)
    }

    /// Whether `input` decodes successfully
    ///
    /// Always agrees with [`ValidationEngine::decode`] under the same
    /// unknown-field policy and depth limit.
    #[must_use]
    pub fn is_valid(&self, validator: &Validator, input: &Value) -> bool {
        let options = DecodeOptions {
            error_mode: ErrorMode::FirstError,
            ..self.config.decode_options()
        };
        validator.decode(input, options).is_ok()
    }

    /// Decode then convert the validated value into `T`
    ///
    /// # Errors
    ///
    /// Returns `Error::Invalid` with the trail when decoding fails and
    /// `Error::Conversion` when the decoded value does not fit `T`.
    pub fn decode_into<T: DeserializeOwned>(
        &self,
        validator: &Validator,
        input: &Value,
    ) -> crate::Result<T> {
        let decoded = self.decode(validator, input)?;
        serde_json::from_value(decoded).map_err(|source| crate::Error::Conversion {
            type_name: validator.name().to_string(),
            source,
        })
    }

    /// Parse JSON text then decode it
    ///
    /// # Errors
    ///
    /// Returns `Error::Parse` for malformed JSON and `Error::Invalid` when
    /// decoding fails.
    pub fn decode_str(&self, validator: &Validator, text: &str) -> crate::Result<Value> {
        let input: Value = serde_json::from_str(text)?;
        Ok(self.decode(validator, &input)?)
    }

    /// Decode and summarize the outcome as a report
    #[must_use]
    pub fn validate(&self, validator: &Validator, input: &Value) -> ValidationReport {
        let outcome = self.decode(validator, input);
        ValidationReporter::new().report(validator.name(), outcome.as_ref().err())
    }
}
