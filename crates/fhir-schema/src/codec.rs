//! The validator abstraction

use crate::context::{Context, ContextKey, DecodeOptions};
use crate::error::Validation;
use crate::record::RecordCodec;
use fhir_ir::Value;
use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Decode, encode and guard behavior for one type.
///
/// Implementations hold no per-call state, so one instance can serve any
/// number of concurrent decodes.
pub trait Codec: Send + Sync {
    /// Human-readable name used in error trails
    fn name(&self) -> &str;

    /// Decode `input` at the position described by `ctx`.
    ///
    /// The caller has already pushed the entry for this validator.
    ///
    /// # Errors
    ///
    /// Returns the error trail when `input` does not conform.
    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value>;

    /// Convert an in-memory value to its wire form
    fn encode(&self, value: &Value) -> Value;

    /// Type guard over in-memory values
    fn is(&self, value: &Value) -> bool;

    /// Field-level view, for validators that describe records
    fn as_record(&self) -> Option<&dyn RecordCodec> {
        None
    }
}

/// Shared handle to a codec
#[derive(Clone)]
pub struct Validator(Arc<dyn Codec>);

impl Validator {
    /// Wrap a codec
    pub fn new(codec: impl Codec + 'static) -> Self {
        Self(Arc::new(codec))
    }

    /// Decode a root value with the given options
    ///
    /// # Errors
    ///
    /// Returns the error trail when `input` does not conform.
    pub fn decode(&self, input: &Value, options: DecodeOptions) -> Validation<Value> {
        let mut ctx = Context::new(options);
        ctx.with_entry(ContextKey::Root, self.name(), |ctx| self.validate(input, ctx))
    }

    /// True when both handles point at the same codec
    #[must_use]
    pub fn ptr_eq(&self, other: &Validator) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for Validator {
    type Target = dyn Codec;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Validator").field(&self.name()).finish()
    }
}
