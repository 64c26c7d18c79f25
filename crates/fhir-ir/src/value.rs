//! Value model for the codec engine

use serde::{Deserialize, Serialize};
use std::fmt;

pub use serde_json::{Map, Number, Value};

/// Runtime kind of a JSON value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueKind {
    /// `null`
    Null,
    /// `true` / `false`
    Boolean,
    /// Any JSON number
    Number,
    /// JSON string
    String,
    /// Ordered sequence
    Array,
    /// Record of named fields
    Object,
}

impl ValueKind {
    /// Classify a value by its runtime kind
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Boolean,
            Value::Number(_) => Self::Number,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }

    /// Lowercase name used in messages
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render a possibly-absent value for error messages.
///
/// Present values render as compact JSON; an absent value renders as
/// `undefined`.
#[must_use]
pub fn stringify(value: Option<&Value>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "undefined".to_string(),
    }
}

/// Whether a JSON number has no fractional part.
///
/// Floats such as `3.0` count as whole; non-finite values never do.
#[must_use]
pub fn is_whole_number(number: &Number) -> bool {
    if number.is_i64() || number.is_u64() {
        return true;
    }
    number
        .as_f64()
        .is_some_and(|f| f.is_finite() && f.fract() == 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_of() {
        assert_eq!(ValueKind::of(&json!(null)), ValueKind::Null);
        assert_eq!(ValueKind::of(&json!(true)), ValueKind::Boolean);
        assert_eq!(ValueKind::of(&json!(1.5)), ValueKind::Number);
        assert_eq!(ValueKind::of(&json!("x")), ValueKind::String);
        assert_eq!(ValueKind::of(&json!([])), ValueKind::Array);
        assert_eq!(ValueKind::of(&json!({})), ValueKind::Object);
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ValueKind::Boolean.to_string(), "boolean");
        assert_eq!(ValueKind::Object.to_string(), "object");
    }

    #[test]
    fn test_kind_serde() {
        let json = serde_json::to_string(&ValueKind::Array).unwrap();
        assert_eq!(json, "\"array\"");
    }

    #[test]
    fn test_stringify() {
        assert_eq!(stringify(Some(&json!(2))), "2");
        assert_eq!(stringify(Some(&json!("08/23"))), "\"08/23\"");
        assert_eq!(stringify(Some(&json!({"a": [1]}))), "{\"a\":[1]}");
        assert_eq!(stringify(None), "undefined");
    }

    #[test]
    fn test_whole_numbers() {
        assert!(is_whole_number(&Number::from(3)));
        assert!(is_whole_number(&Number::from(-7)));
        assert!(is_whole_number(&Number::from(u64::MAX)));
        assert!(is_whole_number(&Number::from_f64(4.0).unwrap()));
        assert!(!is_whole_number(&Number::from_f64(4.25).unwrap()));
    }
}
