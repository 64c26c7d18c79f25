//! Required and optional field shapes

use crate::codec::{Codec, Validator};
use crate::context::{Context, ContextKey};
use crate::error::{ErrorKind, ErrorTrail, Validation};
use crate::record::{RecordCodec, encode_record, record_is, validate_record};
use fhir_ir::{Map, Value};

/// Whether a shape's fields must be present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Required,
    Optional,
}

/// A named set of fields, all required or all optional
pub struct ShapeCodec {
    name: String,
    presence: Presence,
    fields: Vec<(String, Validator)>,
}

impl ShapeCodec {
    /// Build a shape; the name is derived from the fields
    pub fn new<N, I>(presence: Presence, fields: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (N, Validator)>,
    {
        let fields: Vec<(String, Validator)> = fields
            .into_iter()
            .map(|(name, codec)| (name.into(), codec))
            .collect();
        let name = shape_name(presence, &fields);
        Self {
            name,
            presence,
            fields,
        }
    }

    #[must_use]
    pub fn presence(&self) -> Presence {
        self.presence
    }

    /// Validator of a declared field
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Validator> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, codec)| codec)
    }
}

fn shape_name(presence: Presence, fields: &[(String, Validator)]) -> String {
    let body = if fields.is_empty() {
        "{}".to_string()
    } else {
        let props: Vec<String> = fields
            .iter()
            .map(|(name, codec)| format!("{name}: {}", codec.name()))
            .collect();
        format!("{{ {} }}", props.join(", "))
    };
    match presence {
        Presence::Required => body,
        Presence::Optional => format!("Partial<{body}>"),
    }
}

impl RecordCodec for ShapeCodec {
    fn declared_fields(&self) -> Vec<&str> {
        self.fields.iter().map(|(name, _)| name.as_str()).collect()
    }

    fn validate_fields(
        &self,
        input: &Map<String, Value>,
        ctx: &mut Context,
        out: &mut Map<String, Value>,
    ) -> Validation<()> {
        let mut errors = ErrorTrail::new();

        for (name, codec) in &self.fields {
            let key = ContextKey::field(name.as_str());
            let result = match input.get(name) {
                Some(value) => ctx.with_entry(key, codec.name(), |ctx| codec.validate(value, ctx)),
                None if self.presence == Presence::Required => {
                    ctx.with_entry(key, codec.name(), |ctx| {
                        Err(ctx.failure(ErrorKind::MissingField, None))
                    })
                }
                None => continue,
            };

            match result {
                Ok(decoded) => {
                    out.insert(name.clone(), decoded);
                }
                Err(trail) => {
                    errors.extend(trail);
                    if !ctx.collect_all() {
                        break;
                    }
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
        self.fields.iter().all(|(name, codec)| match value.get(name) {
            Some(field) => codec.is(field),
            None => self.presence == Presence::Optional,
        })
    }

    fn encode_fields(&self, value: &Map<String, Value>, out: &mut Map<String, Value>) {
        for (name, codec) in &self.fields {
            if let Some(field) = value.get(name) {
                out.insert(name.clone(), codec.encode(field));
            }
        }
    }
}

impl Codec for ShapeCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        validate_record(self, input, ctx)
    }

    fn encode(&self, value: &Value) -> Value {
        encode_record(self, value)
    }

    fn is(&self, value: &Value) -> bool {
        record_is(self, value)
    }

    fn as_record(&self) -> Option<&dyn RecordCodec> {
        Some(self)
    }
}

/// Shape whose fields must all be present and valid
pub fn required_shape<N, I>(fields: I) -> Validator
where
    N: Into<String>,
    I: IntoIterator<Item = (N, Validator)>,
{
    Validator::new(ShapeCodec::new(Presence::Required, fields))
}

/// Shape whose fields may be absent but must be valid when present
pub fn optional_shape<N, I>(fields: I) -> Validator
where
    N: Into<String>,
    I: IntoIterator<Item = (N, Validator)>,
{
    Validator::new(ShapeCodec::new(Presence::Optional, fields))
}
