//! Ordered sequences of one element type

use crate::codec::{Codec, Validator};
use crate::context::{Context, ContextKey};
use crate::error::{ErrorKind, ErrorTrail, Validation};
use fhir_ir::{Value, ValueKind};

/// Validator for sequences whose elements all satisfy `item`
pub struct ArrayCodec {
    name: String,
    item: Validator,
}

impl ArrayCodec {
    pub fn new(item: Validator) -> Self {
        Self {
            name: format!("Array<{}>", item.name()),
            item,
        }
    }

    #[must_use]
    pub fn item(&self) -> &Validator {
        &self.item
    }
}

impl Codec for ArrayCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        let Value::Array(items) = input else {
            return Err(ctx.failure(
                ErrorKind::type_mismatch(ValueKind::Array, input),
                Some(input),
            ));
        };

        let mut out = Vec::with_capacity(items.len());
        let mut errors = ErrorTrail::new();

        for (index, item) in items.iter().enumerate() {
            match ctx.with_entry(ContextKey::index(index), self.item.name(), |ctx| {
                self.item.validate(item, ctx)
            }) {
                Ok(decoded) => out.push(decoded),
                Err(trail) => {
                    errors.extend(trail);
                    if !ctx.collect_all() {
                        return Err(errors);
                    }
                }
            }
        }

        if errors.is_empty() {
            Ok(Value::Array(out))
        } else {
            Err(errors)
        }
    }

    fn encode(&self, value: &Value) -> Value {
        match value {
            Value::Array(items) => Value::Array(items.iter().map(|v| self.item.encode(v)).collect()),
            other => other.clone(),
        }
    }

    fn is(&self, value: &Value) -> bool {
        match value {
            Value::Array(items) => items.iter().all(|v| self.item.is(v)),
            _ => false,
        }
    }
}

/// Sequence of `item`
pub fn array_of(item: Validator) -> Validator {
    Validator::new(ArrayCodec::new(item))
}
