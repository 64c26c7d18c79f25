//! Configuration loading and command-line overrides

use anyhow::{Context, Result};
use clap::ValueEnum;
use fhir_schema::{ErrorMode, UnknownFields};
use fhir_validation::{ReportFormat, ValidationConfig};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum UnknownFieldsArg {
    Preserve,
    Strip,
    Reject,
}

impl From<UnknownFieldsArg> for UnknownFields {
    fn from(arg: UnknownFieldsArg) -> Self {
        match arg {
            UnknownFieldsArg::Preserve => UnknownFields::Preserve,
            UnknownFieldsArg::Strip => UnknownFields::Strip,
            UnknownFieldsArg::Reject => UnknownFields::Reject,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum FormatArg {
    #[default]
    Text,
    Json,
}

impl From<FormatArg> for ReportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Text => ReportFormat::Text,
            FormatArg::Json => ReportFormat::Json,
        }
    }
}

/// Flags that take precedence over the configuration file
#[derive(Debug, Clone, Copy, Default)]
pub struct Overrides {
    pub collect_all: bool,
    pub unknown_fields: Option<UnknownFieldsArg>,
}

/// Load the configuration file, or defaults when none is given
pub fn load(path: Option<&Path>) -> Result<ValidationConfig> {
    match path {
        Some(path) => ValidationConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ValidationConfig::default()),
    }
}

pub fn apply(mut config: ValidationConfig, overrides: Overrides) -> ValidationConfig {
    if overrides.collect_all {
        config.error_mode = ErrorMode::CollectAll;
    }
    if let Some(policy) = overrides.unknown_fields {
        config.unknown_fields = policy.into();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_defaults() {
        assert_eq!(load(None).unwrap(), ValidationConfig::default());
    }

    #[test]
    fn test_load_missing_file() {
        let err = load(Some(Path::new("/nonexistent/fhir-codec.yaml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }

    #[test]
    fn test_flags_override_file() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "unknown_fields: strip").unwrap();
        writeln!(file, "max_errors: 10").unwrap();

        let config = apply(
            load(Some(file.path())).unwrap(),
            Overrides {
                collect_all: true,
                unknown_fields: Some(UnknownFieldsArg::Reject),
            },
        );
        assert_eq!(config.error_mode, ErrorMode::CollectAll);
        assert_eq!(config.unknown_fields, UnknownFields::Reject);
        assert_eq!(config.max_errors, 10);
    }

    #[test]
    fn test_no_overrides_keeps_file_values() {
        let config = ValidationConfig {
            unknown_fields: UnknownFields::Strip,
            ..ValidationConfig::default()
        };
        assert_eq!(apply(config.clone(), Overrides::default()), config);
    }
}
