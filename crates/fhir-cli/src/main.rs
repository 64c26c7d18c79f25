//! # fhir-cli
//!
//! Command-line interface for the FHIR codec engine.
//!
//! Validates JSON documents against the registered datatype and resource
//! declarations, checks single primitive values, and lists known types.

mod config;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use config::{FormatArg, Overrides, UnknownFieldsArg};
use fhir_datatypes::registry;
use fhir_ir::{Cursor, Value};
use fhir_validation::{PrimitiveKind, ValidationEngine, ValidationReporter, decode};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "fhir-codec")]
#[command(about = "FHIR runtime type validation CLI")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML or JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a JSON document against a registered type
    Validate {
        /// Input file path
        input: PathBuf,

        /// Registered type name (e.g., Observation, Coding, date)
        #[arg(short = 't', long = "type")]
        type_name: String,

        /// Validate only the value at this path (e.g., section/0/title)
        #[arg(long)]
        at: Option<String>,

        /// Report every failure instead of the first one
        #[arg(long)]
        collect_all: bool,

        /// Treatment of undeclared fields
        #[arg(long, value_enum)]
        unknown_fields: Option<UnknownFieldsArg>,

        /// Report format
        #[arg(long, value_enum, default_value_t = FormatArg::Text)]
        format: FormatArg,
    },

    /// Check one literal value against a primitive kind
    Check {
        /// Primitive kind (e.g., code, date, positiveInt)
        kind: String,

        /// Value as JSON, or a bare string
        value: String,
    },

    /// List registered type names
    Types,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Validate {
            input,
            type_name,
            at,
            collect_all,
            unknown_fields,
            format,
        } => {
            let overrides = Overrides {
                collect_all,
                unknown_fields,
            };
            run_validate(
                cli.config.as_deref(),
                &input,
                &type_name,
                at.as_deref(),
                overrides,
                format,
            )
        }
        Commands::Check { kind, value } => run_check(&kind, &value),
        Commands::Types => {
            for name in registry().names() {
                println!("{name}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_validate(
    config_path: Option<&Path>,
    input: &Path,
    type_name: &str,
    at: Option<&str>,
    overrides: Overrides,
    format: FormatArg,
) -> Result<ExitCode> {
    let config = config::apply(config::load(config_path)?, overrides);
    let validator = registry()
        .require(type_name)
        .with_context(|| format!("Unknown type '{type_name}', see `fhir-codec types`"))?;

    let text = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;
    let document: Value = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse JSON in {}", input.display()))?;
    let target = match at {
        Some(path) => Cursor::new(&document)
            .navigate(path)
            .with_context(|| format!("Cannot select '{path}' in {}", input.display()))?
            .value(),
        None => &document,
    };

    tracing::info!(input = %input.display(), type_name, "validating");
    let engine = ValidationEngine::with_config(config);
    let report = engine.validate(&validator, target);
    let rendered = ValidationReporter::with_format(format.into()).render(&report)?;
    println!("{rendered}");

    Ok(if report.is_valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run_check(kind: &str, literal: &str) -> Result<ExitCode> {
    let kind: PrimitiveKind = kind.parse()?;
    let value =
        serde_json::from_str(literal).unwrap_or_else(|_| Value::String(literal.to_string()));

    match decode(&kind.validator(), &value) {
        Ok(_) => {
            println!("valid {kind}");
            Ok(ExitCode::SUCCESS)
        }
        Err(trail) => {
            for message in trail.messages() {
                println!("{message}");
            }
            Ok(ExitCode::FAILURE)
        }
    }
}
