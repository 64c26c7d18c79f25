//! Intersections: one value satisfying every member

use crate::codec::{Codec, Validator};
use crate::context::{Context, ContextKey};
use crate::error::{ErrorTrail, Validation};
use crate::record::{RecordCodec, encode_record, record_is, validate_record};
use fhir_ir::{Map, Value};

/// Validator satisfied when every member is.
///
/// When all members describe records, their fields are decoded into one
/// output object and the unknown-field policy sees the union of their
/// declared fields. Otherwise each member decodes the whole value and
/// object outputs are merged by key.
pub struct IntersectionCodec {
    name: String,
    members: Vec<Validator>,
}

impl IntersectionCodec {
    pub fn new(name: impl Into<String>, members: Vec<Validator>) -> Self {
        Self {
            name: name.into(),
            members,
        }
    }

    #[must_use]
    pub fn members(&self) -> &[Validator] {
        &self.members
    }

    fn is_record(&self) -> bool {
        self.members.iter().all(|member| member.as_record().is_some())
    }

    fn validate_merged(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        let mut outputs = Vec::with_capacity(self.members.len());
        let mut errors = ErrorTrail::new();

        for (index, member) in self.members.iter().enumerate() {
            match ctx.with_entry(ContextKey::Member(index), member.name(), |ctx| {
                member.validate(input, ctx)
            }) {
                Ok(decoded) => outputs.push(decoded),
                Err(trail) => {
                    errors.extend(trail);
                    if !ctx.collect_all() {
                        return Err(errors);
                    }
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }
        Ok(merge_outputs(input, outputs))
    }
}

/// Merge member outputs by key; non-object outputs keep the first one
fn merge_outputs(input: &Value, outputs: Vec<Value>) -> Value {
    if !outputs.iter().all(Value::is_object) {
        return outputs.into_iter().next().unwrap_or_else(|| input.clone());
    }
    let mut merged = Map::new();
    for output in outputs {
        if let Value::Object(map) = output {
            merged.extend(map);
        }
    }
    Value::Object(merged)
}

impl RecordCodec for IntersectionCodec {
    fn declared_fields(&self) -> Vec<&str> {
        self.members
            .iter()
            .filter_map(|member| member.as_record())
            .flat_map(|record| record.declared_fields())
            .collect()
    }

    fn validate_fields(
        &self,
        input: &Map<String, Value>,
        ctx: &mut Context,
        out: &mut Map<String, Value>,
    ) -> Validation<()> {
        let mut errors = ErrorTrail::new();

        for (index, member) in self.members.iter().enumerate() {
            let Some(record) = member.as_record() else {
                continue;
            };
            if let Err(trail) = ctx.with_entry(ContextKey::Member(index), member.name(), |ctx| {
                record.validate_fields(input, ctx, out)
            }) {
                errors.extend(trail);
                if !ctx.collect_all() {
                    break;
                }
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    fn fields_are(&self, value: &Map<String, Value>) -> bool {
        self.members
            .iter()
            .filter_map(|member| member.as_record())
            .all(|record| record.fields_are(value))
    }

    fn encode_fields(&self, value: &Map<String, Value>, out: &mut Map<String, Value>) {
        for record in self.members.iter().filter_map(|member| member.as_record()) {
            record.encode_fields(value, out);
        }
    }
}

impl Codec for IntersectionCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        if self.is_record() {
            validate_record(self, input, ctx)
        } else {
            self.validate_merged(input, ctx)
        }
    }

    fn encode(&self, value: &Value) -> Value {
        if self.is_record() {
            return encode_record(self, value);
        }
        let encoded: Vec<Value> = self.members.iter().map(|m| m.encode(value)).collect();
        merge_outputs(value, encoded)
    }

    fn is(&self, value: &Value) -> bool {
        if self.is_record() {
            record_is(self, value)
        } else {
            self.members.iter().all(|member| member.is(value))
        }
    }

    fn as_record(&self) -> Option<&dyn RecordCodec> {
        if self.is_record() { Some(self) } else { None }
    }
}

/// Record of required fields plus optional fields
pub fn intersect(required: Validator, optional: Validator, debug_name: &str) -> Validator {
    intersection(debug_name, vec![required, optional])
}

/// General intersection of any number of members
pub fn intersection(name: impl Into<String>, members: Vec<Validator>) -> Validator {
    Validator::new(IntersectionCodec::new(name, members))
}
