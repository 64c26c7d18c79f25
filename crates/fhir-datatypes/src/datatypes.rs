//! General-purpose datatypes
//!
//! Every datatype carries the element fields `id` and `extension`.
//! `Extension` refers to itself, and `Identifier` and `Reference` refer to
//! each other, so those three are declared with [`recursive`].

use fhir_schema::{Validator, array_of, intersect, optional_shape, recursive, required_shape};
use fhir_validation::primitives as p;
use once_cell::sync::Lazy;

type Fields = Vec<(&'static str, Validator)>;

/// Record of `required` fields plus `optional` and element fields
pub(crate) fn element(name: &str, required: Fields, optional: Fields) -> Validator {
    let mut fields: Fields = vec![("id", p::string()), ("extension", array_of(EXTENSION.clone()))];
    fields.extend(optional);
    intersect(required_shape(required), optional_shape(fields), name)
}

pub static EXTENSION: Lazy<Validator> = Lazy::new(|| {
    recursive("Extension", || {
        element(
            "Extension",
            vec![("url", p::uri())],
            vec![
                ("valueBoolean", p::boolean()),
                ("valueCode", p::code()),
                ("valueDateTime", p::date_time()),
                ("valueDecimal", p::decimal()),
                ("valueInteger", p::integer()),
                ("valueString", p::string()),
                ("valueUri", p::uri()),
                ("valueCoding", CODING.clone()),
                ("valueCodeableConcept", CODEABLE_CONCEPT.clone()),
                ("valueQuantity", QUANTITY.clone()),
                ("valueReference", REFERENCE.clone()),
            ],
        )
    })
});

pub static CODING: Lazy<Validator> = Lazy::new(|| {
    element(
        "Coding",
        vec![],
        vec![
            ("system", p::uri()),
            ("version", p::string()),
            ("code", p::code()),
            ("display", p::string()),
            ("userSelected", p::boolean()),
        ],
    )
});

pub static CODEABLE_CONCEPT: Lazy<Validator> = Lazy::new(|| {
    element(
        "CodeableConcept",
        vec![],
        vec![("coding", array_of(CODING.clone())), ("text", p::string())],
    )
});

pub static QUANTITY: Lazy<Validator> = Lazy::new(|| {
    element(
        "Quantity",
        vec![],
        vec![
            ("value", p::decimal()),
            ("comparator", p::code()),
            ("unit", p::string()),
            ("system", p::uri()),
            ("code", p::code()),
        ],
    )
});

pub static RANGE: Lazy<Validator> = Lazy::new(|| {
    element(
        "Range",
        vec![],
        vec![("low", QUANTITY.clone()), ("high", QUANTITY.clone())],
    )
});

pub static PERIOD: Lazy<Validator> = Lazy::new(|| {
    element(
        "Period",
        vec![],
        vec![("start", p::date_time()), ("end", p::date_time())],
    )
});

pub static IDENTIFIER: Lazy<Validator> = Lazy::new(|| {
    recursive("Identifier", || {
        element(
            "Identifier",
            vec![],
            vec![
                ("use", p::code()),
                ("type", CODEABLE_CONCEPT.clone()),
                ("system", p::uri()),
                ("value", p::string()),
                ("period", PERIOD.clone()),
                ("assigner", REFERENCE.clone()),
            ],
        )
    })
});

pub static REFERENCE: Lazy<Validator> = Lazy::new(|| {
    recursive("Reference", || {
        element(
            "Reference",
            vec![],
            vec![
                ("reference", p::string()),
                ("type", p::uri()),
                ("identifier", IDENTIFIER.clone()),
                ("display", p::string()),
            ],
        )
    })
});

pub static NARRATIVE: Lazy<Validator> = Lazy::new(|| {
    element(
        "Narrative",
        vec![("status", p::code()), ("div", p::xhtml())],
        vec![],
    )
});

pub static ANNOTATION: Lazy<Validator> = Lazy::new(|| {
    element(
        "Annotation",
        vec![("text", p::markdown())],
        vec![
            ("authorReference", REFERENCE.clone()),
            ("authorString", p::string()),
            ("time", p::date_time()),
        ],
    )
});
