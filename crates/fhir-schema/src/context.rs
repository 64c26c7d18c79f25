//! Decode context: the type/key trail and decode options

use crate::error::{ErrorKind, ErrorTrail, Validation, ValidationError};
use fhir_ir::{PathSegment, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default maximum nesting depth of fields and elements
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// How many failures a composite reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorMode {
    /// Stop at the first failing field or element
    #[default]
    FirstError,
    /// Keep validating siblings and report every failure
    CollectAll,
}

/// Treatment of record fields no shape declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownFields {
    /// Pass undeclared fields through unvalidated
    #[default]
    Preserve,
    /// Drop undeclared fields from the decoded value
    Strip,
    /// Fail on any undeclared field
    Reject,
}

/// Options that shape a single decode call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// First-error or collect-all reporting
    pub error_mode: ErrorMode,
    /// Policy for undeclared record fields
    pub unknown_fields: UnknownFields,
    /// Maximum nesting of fields/elements before decoding gives up
    pub max_depth: usize,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::FirstError,
            unknown_fields: UnknownFields::Preserve,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Key of one context entry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ContextKey {
    /// The decoded value itself
    Root,
    /// A field or element of the parent value
    Path(PathSegment),
    /// A member of an intersection or union (not a data step)
    Member(usize),
}

impl ContextKey {
    /// Key for a named field
    pub fn field(name: impl Into<String>) -> Self {
        ContextKey::Path(PathSegment::Key(name.into()))
    }

    /// Key for a sequence element
    #[must_use]
    pub fn index(index: usize) -> Self {
        ContextKey::Path(PathSegment::Index(index))
    }

    /// True when the key moves into a child value
    #[must_use]
    pub fn is_data(&self) -> bool {
        matches!(self, ContextKey::Path(_))
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContextKey::Root => Ok(()),
            ContextKey::Path(segment) => write!(f, "{segment}"),
            ContextKey::Member(index) => write!(f, "{index}"),
        }
    }
}

/// One step of the decode trail: the key and the validator applied there
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextEntry {
    pub key: ContextKey,
    pub type_name: String,
}

impl ContextEntry {
    pub fn new(key: ContextKey, type_name: impl Into<String>) -> Self {
        Self {
            key,
            type_name: type_name.into(),
        }
    }
}

impl fmt::Display for ContextEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.key, self.type_name)
    }
}

/// Mutable state threaded through one decode call.
///
/// Validators never keep state of their own; everything call-specific
/// lives here.
#[derive(Debug, Clone)]
pub struct Context {
    entries: Vec<ContextEntry>,
    depth: usize,
    options: DecodeOptions,
}

impl Context {
    /// Create an empty context
    #[must_use]
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            entries: Vec::new(),
            depth: 0,
            options,
        }
    }

    /// Options of the current call
    #[must_use]
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Whether composites should keep going after a failure
    #[must_use]
    pub fn collect_all(&self) -> bool {
        self.options.error_mode == ErrorMode::CollectAll
    }

    /// Entries from the root to the current position
    #[must_use]
    pub fn entries(&self) -> &[ContextEntry] {
        &self.entries
    }

    /// Current data nesting depth
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Run `f` with one more entry on the trail.
    ///
    /// Data keys count toward `max_depth`; once the limit is reached `f`
    /// is not run and a `DepthExceeded` failure is returned instead.
    pub fn with_entry<T, F>(&mut self, key: ContextKey, type_name: &str, f: F) -> Validation<T>
    where
        F: FnOnce(&mut Self) -> Validation<T>,
    {
        let descends = key.is_data();
        self.entries.push(ContextEntry::new(key, type_name));

        let result = if descends && self.depth >= self.options.max_depth {
            Err(self.failure(
                ErrorKind::DepthExceeded {
                    limit: self.options.max_depth,
                },
                None,
            ))
        } else {
            if descends {
                self.depth += 1;
            }
            let result = f(self);
            if descends {
                self.depth -= 1;
            }
            result
        };

        self.entries.pop();
        result
    }

    /// Build a single-entry trail for a failure at the current position
    #[must_use]
    pub fn failure(&self, kind: ErrorKind, value: Option<&Value>) -> ErrorTrail {
        ErrorTrail::from(ValidationError {
            kind,
            context: self.entries.clone(),
            value: value.cloned(),
        })
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new(DecodeOptions::default())
    }
}
