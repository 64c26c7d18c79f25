//! Field-level record behavior shared by shapes and intersections

use crate::context::{Context, ContextKey, UnknownFields};
use crate::error::{ErrorKind, ErrorTrail, Validation};
use fhir_ir::{Map, Value, ValueKind};

/// Field-level view of a validator that describes records.
///
/// Intersections use this view to merge their members' fields into one
/// output object and to apply the unknown-field policy once, against the
/// fields of every member together.
pub trait RecordCodec: Send + Sync {
    /// Field names this record declares, in declaration order
    fn declared_fields(&self) -> Vec<&str>;

    /// Decode the declared fields of `input` into `out`
    ///
    /// # Errors
    ///
    /// Returns the trail of failing fields (only the first one unless the
    /// context collects all failures).
    fn validate_fields(
        &self,
        input: &Map<String, Value>,
        ctx: &mut Context,
        out: &mut Map<String, Value>,
    ) -> Validation<()>;

    /// Guard the declared fields of an in-memory record
    fn fields_are(&self, value: &Map<String, Value>) -> bool;

    /// Encode the declared fields present in `value` into `out`
    fn encode_fields(&self, value: &Map<String, Value>, out: &mut Map<String, Value>);
}

/// Decode a whole record: kind check, declared fields, then unknown fields
pub(crate) fn validate_record(
    record: &dyn RecordCodec,
    input: &Value,
    ctx: &mut Context,
) -> Validation<Value> {
    let Value::Object(map) = input else {
        return Err(ctx.failure(
            ErrorKind::type_mismatch(ValueKind::Object, input),
            Some(input),
        ));
    };

    let mut out = Map::new();
    let mut errors = ErrorTrail::new();

    if let Err(trail) = record.validate_fields(map, ctx, &mut out) {
        if !ctx.collect_all() {
            return Err(trail);
        }
        errors.extend(trail);
    }

    let declared = record.declared_fields();
    let undeclared = map
        .iter()
        .filter(|(key, _)| !declared.contains(&key.as_str()));

    match ctx.options().unknown_fields {
        UnknownFields::Preserve => {
            for (key, value) in undeclared {
                out.insert(key.clone(), value.clone());
            }
        }
        UnknownFields::Strip => {}
        UnknownFields::Reject => {
            for (key, value) in undeclared {
                let rejected: Validation<()> =
                    ctx.with_entry(ContextKey::field(key.as_str()), "never", |ctx| {
                        Err(ctx.failure(ErrorKind::UnknownField, Some(value)))
                    });
                if let Err(trail) = rejected {
                    errors.extend(trail);
                    if !ctx.collect_all() {
                        break;
                    }
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(Value::Object(out))
    } else {
        Err(errors)
    }
}

/// Guard a whole record
pub(crate) fn record_is(record: &dyn RecordCodec, value: &Value) -> bool {
    match value {
        Value::Object(map) => record.fields_are(map),
        _ => false,
    }
}

/// Encode a whole record, leaving undeclared fields untouched
pub(crate) fn encode_record(record: &dyn RecordCodec, value: &Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut out = map.clone();
            record.encode_fields(map, &mut out);
            Value::Object(out)
        }
        other => other.clone(),
    }
}
