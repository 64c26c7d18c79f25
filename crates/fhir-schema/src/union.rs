//! Unions: the first matching alternative wins

use crate::codec::{Codec, Validator};
use crate::context::{Context, ContextKey};
use crate::error::{ErrorKind, ErrorTrail, Validation};
use fhir_ir::Value;

/// Validator that accepts any one of its members, tried in declaration order
pub struct UnionCodec {
    name: String,
    members: Vec<Validator>,
}

impl UnionCodec {
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
}

impl Codec for UnionCodec {
    fn name(&self) -> &str {
        &self.name
    }

    /// Returns the first member's success. When every member fails the
    /// trail holds each member's failures in declaration order, whatever
    /// the error mode.
    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        if self.members.is_empty() {
            return Err(ctx.failure(ErrorKind::NoAlternative, Some(input)));
        }

        let mut errors = ErrorTrail::new();
        for (index, member) in self.members.iter().enumerate() {
            match ctx.with_entry(ContextKey::Member(index), member.name(), |ctx| {
                member.validate(input, ctx)
            }) {
                Ok(decoded) => return Ok(decoded),
                Err(trail) => errors.extend(trail),
            }
        }
        Err(errors)
    }

    fn encode(&self, value: &Value) -> Value {
        self.members
            .iter()
            .find(|member| member.is(value))
            .map_or_else(|| value.clone(), |member| member.encode(value))
    }

    fn is(&self, value: &Value) -> bool {
        self.members.iter().any(|member| member.is(value))
    }
}

/// Union named `(A | B | ...)` after its members
pub fn union_of(members: Vec<Validator>) -> Validator {
    let names: Vec<&str> = members.iter().map(|member| member.name()).collect();
    let name = format!("({})", names.join(" | "));
    union_named(name, members)
}

/// Union with an explicit name
pub fn union_named(name: impl Into<String>, members: Vec<Validator>) -> Validator {
    Validator::new(UnionCodec::new(name, members))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::DecodeOptions;
    use crate::primitive::primitive;
    use crate::shape::required_shape;
    use fhir_ir::ValueKind;
    use serde_json::json;

    fn tagged_string(name: &'static str) -> Validator {
        primitive(
            name,
            Value::is_string,
            move |v| match v {
                Value::String(s) => Ok(json!({ "via": name, "value": s })),
                other => Err(ErrorKind::type_mismatch(ValueKind::String, other)),
            },
            Value::clone,
        )
    }

    fn number() -> Validator {
        primitive(
            "number",
            Value::is_number,
            |v| match v {
                Value::Number(_) => Ok(v.clone()),
                other => Err(ErrorKind::type_mismatch(ValueKind::Number, other)),
            },
            Value::clone,
        )
    }

    #[test]
    fn test_name() {
        assert_eq!(union_of(vec![number(), tagged_string("A")]).name(), "(number | A)");
    }

    #[test]
    fn test_first_match_wins() {
        let ab = union_of(vec![tagged_string("A"), tagged_string("B")]);
        let ba = union_of(vec![tagged_string("B"), tagged_string("A")]);
        let input = json!("x");
        assert_eq!(
            ab.decode(&input, DecodeOptions::default()).unwrap(),
            json!({"via": "A", "value": "x"})
        );
        assert_eq!(
            ba.decode(&input, DecodeOptions::default()).unwrap(),
            json!({"via": "B", "value": "x"})
        );
    }

    #[test]
    fn test_later_member_matches() {
        let codec = union_of(vec![required_shape([("a", number())]), number()]);
        assert_eq!(codec.decode(&json!(7), DecodeOptions::default()).unwrap(), json!(7));
    }

    #[test]
    fn test_aggregates_all_failures() {
        let codec = union_of(vec![number(), required_shape([("a", number())])]);
        let trail = codec.decode(&json!("x"), DecodeOptions::default()).unwrap_err();
        assert_eq!(
            trail.messages(),
            vec![
                "Invalid value \"x\" supplied to : (number | { a: number })/0: number",
                "Invalid value \"x\" supplied to : (number | { a: number })/1: { a: number }",
            ]
        );
    }

    #[test]
    fn test_empty_union() {
        let codec = union_named("Never", vec![]);
        let trail = codec.decode(&json!(1), DecodeOptions::default()).unwrap_err();
        assert_eq!(trail.first().unwrap().kind, ErrorKind::NoAlternative);
        assert!(!codec.is(&json!(1)));
    }

    #[test]
    fn test_encode_picks_guarded_member() {
        let codec = union_of(vec![number(), required_shape([("a", number())])]);
        assert_eq!(codec.encode(&json!(3)), json!(3));
        assert_eq!(codec.encode(&json!({"a": 1})), json!({"a": 1}));
        assert!(codec.is(&json!({"a": 1})));
        assert!(!codec.is(&json!(null)));
    }
}
