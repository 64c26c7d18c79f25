#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # fhir-datatypes
//!
//! A representative slice of FHIR datatypes and resources declared with
//! the `fhir-schema` combinators, and a registry naming them alongside
//! every primitive kind.
//!
//! ```rust
//! use fhir_datatypes::registry;
//! use fhir_validation::decode;
//! use serde_json::json;
//!
//! let characteristic = registry().require("GroupCharacteristic").unwrap();
//! let value = json!({"code": {"text": "smoker"}, "value": true, "exclude": false});
//! assert_eq!(decode(&characteristic, &value).unwrap(), value);
//! ```

pub mod datatypes;
pub mod resources;

pub use datatypes::{
    ANNOTATION, CODEABLE_CONCEPT, CODING, EXTENSION, IDENTIFIER, NARRATIVE, PERIOD, QUANTITY,
    RANGE, REFERENCE,
};
pub use resources::{
    CHARACTERISTIC_VALUE, COMPOSITION, COMPOSITION_SECTION, GROUP_CHARACTERISTIC, OBSERVATION,
};

use fhir_schema::{SchemaRegistry, Validator};
use fhir_validation::PrimitiveKind;
use once_cell::sync::Lazy;
use std::sync::Arc;
use tracing::debug;

static REGISTRY: Lazy<Arc<SchemaRegistry>> = Lazy::new(|| {
    let registry = SchemaRegistry::shared();
    for kind in PrimitiveKind::ALL {
        registry.register(kind.name(), kind.validator());
    }
    for validator in declarations() {
        let name = validator.name().to_string();
        registry.register(name, validator);
    }
    debug!(types = registry.len(), "built datatype registry");
    registry
});

/// Every declared datatype and resource
#[must_use]
pub fn declarations() -> Vec<Validator> {
    vec![
        EXTENSION.clone(),
        CODING.clone(),
        CODEABLE_CONCEPT.clone(),
        QUANTITY.clone(),
        RANGE.clone(),
        PERIOD.clone(),
        IDENTIFIER.clone(),
        REFERENCE.clone(),
        NARRATIVE.clone(),
        ANNOTATION.clone(),
        GROUP_CHARACTERISTIC.clone(),
        COMPOSITION_SECTION.clone(),
        OBSERVATION.clone(),
        COMPOSITION.clone(),
    ]
}

/// Shared registry of primitives, datatypes and resources by name
#[must_use]
pub fn registry() -> Arc<SchemaRegistry> {
    Arc::clone(&REGISTRY)
}
