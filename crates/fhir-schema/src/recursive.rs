//! Lazily-resolved validators for self- and mutually-referential types

use crate::codec::{Codec, Validator};
use crate::context::Context;
use crate::error::Validation;
use crate::record::RecordCodec;
use fhir_ir::Value;
use once_cell::sync::OnceCell;
use tracing::debug;

type Thunk = Box<dyn Fn() -> Validator + Send + Sync>;

/// Named placeholder whose definition is produced on first use.
///
/// Construction never calls the thunk, so validators that reference each
/// other can be declared in any order. The first decode, encode, guard or
/// field lookup resolves the definition and memoizes it. Two threads
/// racing on the first use may both run the thunk; only one result is
/// kept. A thunk must not use its own validator before returning.
pub struct RecursiveCodec {
    name: String,
    thunk: Thunk,
    resolved: OnceCell<Validator>,
}

impl RecursiveCodec {
    pub fn new<F>(name: impl Into<String>, thunk: F) -> Self
    where
        F: Fn() -> Validator + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            thunk: Box::new(thunk),
            resolved: OnceCell::new(),
        }
    }

    /// Whether the definition has been produced yet
    #[must_use]
    pub fn is_resolved(&self) -> bool {
        self.resolved.get().is_some()
    }

    /// The definition, producing it on first call
    pub fn force(&self) -> &Validator {
        if let Some(definition) = self.resolved.get() {
            return definition;
        }
        debug!(name = %self.name, "resolving recursive validator");
        let definition = (self.thunk)();
        self.resolved.get_or_init(move || definition)
    }
}

impl Codec for RecursiveCodec {
    fn name(&self) -> &str {
        &self.name
    }

    fn validate(&self, input: &Value, ctx: &mut Context) -> Validation<Value> {
        self.force().validate(input, ctx)
    }

    fn encode(&self, value: &Value) -> Value {
        self.force().encode(value)
    }

    fn is(&self, value: &Value) -> bool {
        self.force().is(value)
    }

    fn as_record(&self) -> Option<&dyn RecordCodec> {
        self.force().as_record()
    }
}

/// Declare a validator whose definition `thunk` produces on first use
pub fn recursive<F>(name: impl Into<String>, thunk: F) -> Validator
where
    F: Fn() -> Validator + Send + Sync + 'static,
{
    Validator::new(RecursiveCodec::new(name, thunk))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::array::array_of;
    use crate::context::{DecodeOptions, ErrorMode};
    use crate::error::ErrorKind;
    use crate::intersection::intersect;
    use crate::primitive::primitive;
    use crate::shape::{optional_shape, required_shape};
    use fhir_ir::ValueKind;
    use once_cell::sync::Lazy;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn string() -> Validator {
        primitive(
            "string",
            Value::is_string,
            |v| match v {
                Value::String(_) => Ok(v.clone()),
                other => Err(ErrorKind::type_mismatch(ValueKind::String, other)),
            },
            Value::clone,
        )
    }

    static NODE_THUNK_CALLS: AtomicUsize = AtomicUsize::new(0);

    static NODE: Lazy<Validator> = Lazy::new(|| {
        recursive("Node", || {
            NODE_THUNK_CALLS.fetch_add(1, Ordering::SeqCst);
            intersect(
                required_shape([("label", string())]),
                optional_shape([("children", array_of(NODE.clone()))]),
                "Node",
            )
        })
    });

    #[test]
    fn test_construction_does_not_force() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let codec = RecursiveCodec::new("Lazy", move || {
            counter.fetch_add(1, Ordering::SeqCst);
            string()
        });
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!codec.is_resolved());
        assert_eq!(codec.name(), "Lazy");
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(codec.is(&json!("x")));
        assert!(codec.is_resolved());
        assert!(codec.is(&json!("y")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_self_reference() {
        let tree = json!({
            "label": "root",
            "children": [
                {"label": "a"},
                {"label": "b", "children": [{"label": "c"}]}
            ]
        });
        assert_eq!(NODE.decode(&tree, DecodeOptions::default()).unwrap(), tree);
        assert_eq!(NODE_THUNK_CALLS.load(Ordering::SeqCst), 1);

        let trail = NODE
            .decode(
                &json!({"label": "root", "children": [{"label": 1}]}),
                DecodeOptions::default(),
            )
            .unwrap_err();
        assert_eq!(trail.first().unwrap().path().to_string(), "children/0/label");
    }

    #[test]
    fn test_mutual_reference() {
        static PING: Lazy<Validator> = Lazy::new(|| {
            recursive("Ping", || optional_shape([("pong", PONG.clone())]))
        });
        static PONG: Lazy<Validator> = Lazy::new(|| {
            recursive("Pong", || optional_shape([("ping", PING.clone())]))
        });

        let value = json!({"pong": {"ping": {"pong": {}}}});
        assert_eq!(PING.decode(&value, DecodeOptions::default()).unwrap(), value);
        assert!(PONG.decode(&json!({"ping": 3}), DecodeOptions::default()).is_err());
    }

    #[test]
    fn test_depth_limit_stops_deep_input() {
        let mut deep = json!({"label": "leaf"});
        for _ in 0..50 {
            deep = json!({"label": "n", "children": [deep]});
        }
        let options = DecodeOptions {
            max_depth: 20,
            error_mode: ErrorMode::FirstError,
            ..DecodeOptions::default()
        };
        static DEEP: Lazy<Validator> = Lazy::new(|| {
            recursive("Deep", || {
                intersect(
                    required_shape([("label", string())]),
                    optional_shape([("children", array_of(DEEP.clone()))]),
                    "Deep",
                )
            })
        });

        let trail = DEEP.decode(&deep, options).unwrap_err();
        assert_eq!(
            trail.first().unwrap().kind,
            ErrorKind::DepthExceeded { limit: 20 }
        );
        assert!(DEEP.decode(&deep, DecodeOptions::default()).is_ok());
    }

    #[test]
    fn test_record_view_forwards() {
        let codec = recursive("Wrapped", || required_shape([("a", string())]));
        let fields = codec.as_record().map(|record| record.declared_fields());
        assert_eq!(fields, Some(vec!["a"]));
    }
}
