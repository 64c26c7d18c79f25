//! Concurrent registry of named validators

use crate::codec::{Codec, Validator};
use crate::context::Context;
use crate::error::Validation;
use crate::primitive::unresolved;
use crate::record::RecordCodec;
use crate::{Error, Result};
use dashmap::DashMap;
use fhir_ir::Value;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Weak};
use tracing::{debug, trace};

/// Thread-safe name → validator map.
///
/// Besides plain lookup, the registry hands out forward references
/// ([`SchemaRegistry::reference`]) so declarations can name types that
/// are registered later.
#[derive(Default)]
pub struct SchemaRegistry {
    validators: DashMap<String, Validator>,
}

impl SchemaRegistry {
    /// Create a new empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new empty registry behind an `Arc`, ready for references
    #[must_use]
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Register a validator, replacing any previous one with the same name
    pub fn register(&self, name: impl Into<String>, validator: Validator) {
        let name = name.into();
        if self.validators.insert(name.clone(), validator).is_some() {
            debug!(name = %name, "replaced registered validator");
        } else {
            trace!(name = %name, "registered validator");
        }
    }

    /// Get a validator by name
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Validator> {
        self.validators.get(name).map(|entry| entry.value().clone())
    }

    /// Get a validator by name, failing when it is missing
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` when no validator has that name.
    pub fn require(&self, name: &str) -> Result<Validator> {
        self.get(name).ok_or_else(|| Error::NotFound(name.to_string()))
    }

    /// Check if a validator exists
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .validators
            .iter()
            .map(|entry| entry.key().clone())
            .collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// Forward reference to `name`, looked up when first used.
    ///
    /// The reference holds the registry weakly. A successful lookup is
    /// memoized; a miss is not, so a use before `register` reports
    /// `UnresolvedReference` and a later use resolves normally.
    pub fn reference(self: &Arc<Self>, name: impl Into<String>) -> Validator {
        Validator::new(ReferenceCodec::new(Arc::downgrade(self), name.into()))
    }
}

/// Lazily looked-up registry entry
pub struct ReferenceCodec {
    name: String,
    registry: Weak<SchemaRegistry>,
    resolved: OnceCell<Validator>,
    missing: Validator,
}

impl ReferenceCodec {
    fn new(registry: Weak<SchemaRegistry>, name: String) -> Self {
        Self {
            missing: unresolved(name.as_str()),
            name,
            registry,
            resolved: OnceCell::new(),
        }
    }

    fn target(&self) -> &Validator {
        if let Some(target) = self.resolved.get() {
            return target;
        }
        match self
            .registry
            .upgrade()
            .and_then(|registry| registry.get(&self.name))
        {
            Some(found) => {
                debug!(name = %self.name, "resolved registry reference");
                self.resolved.get_or_init(move || found)
            }
            None => &self.missing,
        }
    }
}

impl Codec for ReferenceCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        self.target().validate(input, ctx)
    }

    fn encode(&self, value: &Value) -> Value {
        self.target().encode(value)
    }

    fn is(&self, value: &Value) -> bool {
        self.target().is(value)
    }

    fn as_record(&self) -> Option<&dyn RecordCodec> {
        self.target().as_record()
    }
}
