//! Leaf validators built from plain functions

use crate::codec::{Codec, Validator};
use crate::context::Context;
use crate::error::{ErrorKind, Validation};
use fhir_ir::Value;

type Guard = Box<dyn Fn(&Value) -> bool + Send + Sync>;
type Decoder = Box<dyn Fn(&Value) -> Result<Value, ErrorKind> + Send + Sync>;
type Encoder = Box<dyn Fn(&Value) -> Value + Send + Sync>;

/// Validator defined by a guard, a decode function and an encode function
pub struct PrimitiveCodec {
    name: String,
    is: Guard,
    decode: Decoder,
    encode: Encoder,
}

impl Codec for PrimitiveCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        (self.decode)(input).map_err(|kind| ctx.failure(kind, Some(input)))
    }

    fn encode(&self, value: &Value) -> Value {
        (self.encode)(value)
    }

    fn is(&self, value: &Value) -> bool {
        (self.is)(value)
    }
}

/// Build a leaf validator.
///
/// `decode` maps a wire value to its in-memory form or names the failure;
/// `is` guards in-memory values; `encode` maps back to the wire form.
pub fn primitive<I, D, E>(name: impl Into<String>, is: I, decode: D, encode: E) -> Validator
where
    I: Fn(&Value) -> bool + Send + Sync + 'static,
    D: Fn(&Value) -> Result<Value, ErrorKind> + Send + Sync + 'static,
    E: Fn(&Value) -> Value + Send + Sync + 'static,
{
    Validator::new(PrimitiveCodec {
        name: name.into(),
        is: Box::new(is),
        decode: Box::new(decode),
        encode: Box::new(encode),
    })
}

/// Validator that rejects everything, reporting `name` as unresolved
pub fn unresolved(name: impl Into<String>) -> Validator {
    let name = name.into();
    let reported = name.clone();
    primitive(
        name,
        |_| false,
        move |_| {
            Err(ErrorKind::UnresolvedReference {
                name: reported.clone(),
            })
        },
        Value::clone,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DecodeOptions;
    use fhir_ir::ValueKind;
    use serde_json::json;

    /// Wire form is a decimal string, in-memory form is a number
    fn integer_from_string() -> Validator {
        primitive(
            "IntegerFromString",
            |v| v.as_i64().is_some(),
            |v| match v {
                Value::String(s) => s
                    .parse::<i64>()
                    .map(Value::from)
                    .map_err(|_| ErrorKind::format("decimal integer string")),
                other => Err(ErrorKind::type_mismatch(ValueKind::String, other)),
            },
            |v| Value::String(v.to_string()),
        )
    }

    #[test]
    fn test_transforming_primitive() {
        let codec = integer_from_string();
        let decoded = codec.decode(&json!("42"), DecodeOptions::default()).unwrap();
        assert_eq!(decoded, json!(42));
        assert_eq!(codec.encode(&decoded), json!("42"));
        assert!(codec.is(&json!(42)));
        assert!(!codec.is(&json!("42")));
    }

    #[test]
    fn test_primitive_failure_names_validator_and_value() {
        let codec = integer_from_string();
        let trail = codec.decode(&json!("4x"), DecodeOptions::default()).unwrap_err();
        assert_eq!(trail.len(), 1);
        assert_eq!(
            trail.messages(),
            vec!["Invalid value \"4x\" supplied to : IntegerFromString"]
        );
    }

    #[test]
    fn test_unresolved() {
        let codec = unresolved("Missing");
        let trail = codec.decode(&json!({}), DecodeOptions::default()).unwrap_err();
        assert_eq!(
            trail.first().map(|e| e.kind.clone()),
            Some(ErrorKind::UnresolvedReference {
                name: "Missing".to_string()
            })
        );
        assert!(!codec.is(&json!({})));
    }
}
