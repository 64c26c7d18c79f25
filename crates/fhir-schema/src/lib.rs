#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # fhir-schema
//!
//! Runtime type combinators for the FHIR codec engine.
//!
//! A [`Validator`] decodes an untyped JSON value into its validated
//! in-memory form, encodes it back to the wire form, and guards values of
//! its in-memory type. Leaf validators are built with [`primitive`];
//! records are built as the [`intersect`]ion of a [`required_shape`] and an
//! [`optional_shape`]; [`array_of`], [`union_of`] and [`recursive`] compose
//! them into arbitrarily nested and self-referential type graphs.
//!
//! ```rust
//! use fhir_schema::{DecodeOptions, intersect, optional_shape, primitive, required_shape, ErrorKind};
//! use fhir_ir::{Value, ValueKind};
//! use serde_json::json;
//!
//! let text = primitive(
//!     "string",
//!     Value::is_string,
//!     |v| match v {
//!         Value::String(_) => Ok(v.clone()),
//!         other => Err(ErrorKind::type_mismatch(ValueKind::String, other)),
//!     },
//!     Value::clone,
//! );
//! let patient = intersect(
//!     required_shape([("name", text.clone())]),
//!     optional_shape([("nickname", text)]),
//!     "Patient",
//! );
//!
//! let decoded = patient.decode(&json!({"name": "Ada"}), DecodeOptions::default()).unwrap();
//! assert_eq!(decoded, json!({"name": "Ada"}));
//! assert!(patient.decode(&json!({"nickname": "A"}), DecodeOptions::default()).is_err());
//! ```

pub mod array;
pub mod codec;
pub mod context;
pub mod error;
pub mod intersection;
pub mod primitive;
pub mod record;
pub mod recursive;
pub mod registry;
pub mod shape;
pub mod union;

pub use array::{ArrayCodec, array_of};
pub use codec::{Codec, Validator};
pub use context::{
    ContextEntry, ContextKey, Context, DEFAULT_MAX_DEPTH, DecodeOptions, ErrorMode, UnknownFields,
};
pub use error::{ErrorKind, ErrorTrail, Validation, ValidationError};
pub use intersection::{IntersectionCodec, intersect, intersection};
pub use primitive::{PrimitiveCodec, primitive, unresolved};
pub use record::RecordCodec;
pub use recursive::{RecursiveCodec, recursive};
pub use registry::{ReferenceCodec, SchemaRegistry};
pub use shape::{Presence, ShapeCodec, optional_shape, required_shape};
pub use union::{UnionCodec, union_named, union_of};

use thiserror::Error;

/// Errors raised by schema construction and lookup
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Validator not found: {0}")]
    NotFound(String),
}

pub type Result<T> = std::result::Result<T, Error>;
