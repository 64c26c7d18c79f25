#![deny(rust_2018_idioms)]
#![deny(unsafe_op_in_unsafe_fn)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

//! # fhir-ir
//!
//! Value model, data paths, and cursor APIs shared by the FHIR codec engine.
//!
//! Wire and in-memory values are both plain JSON values
//! ([`serde_json::Value`]). This crate adds the small vocabulary the engine
//! needs on top of them: runtime kind classification, message-friendly
//! stringification, data paths, and a cursor for navigating a value.

/// Data paths made of field names and sequence indices.
pub mod path;
/// Cursor-based navigation over JSON values.
pub mod traversal;
/// Runtime kind classification and stringification helpers.
pub mod value;

/// Path primitives used in error trails and navigation.
pub use path::{Path, PathSegment};
/// Cursor entry point for navigating values by path.
pub use traversal::Cursor;
/// Value model and helpers.
pub use value::{Map, Number, Value, ValueKind, is_whole_number, stringify};

use thiserror::Error;

/// Errors that can occur when working with values and paths
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Value not found at path: {path}")]
    NodeNotFound { path: String },

    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: String },

    #[error("Type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: ValueKind, found: ValueKind },
}

impl Error {
    /// Build a node-not-found error with path context.
    pub fn node_not_found(path: impl Into<String>) -> Self {
        Self::NodeNotFound { path: path.into() }
    }

    /// Build an invalid-path error with input path and parsing reason.
    pub fn invalid_path(path: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidPath {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

/// Crate-local result type for value and path operations.
pub type Result<T> = std::result::Result<T, Error>;
