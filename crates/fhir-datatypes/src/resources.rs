//! Resources and backbone elements

use crate::datatypes::{
    ANNOTATION, CODEABLE_CONCEPT, EXTENSION, IDENTIFIER, NARRATIVE, PERIOD, QUANTITY, RANGE,
    REFERENCE, element,
};
use fhir_schema::{
    Validator, array_of, intersect, optional_shape, recursive, required_shape, union_of,
};
use fhir_validation::primitives as p;
use once_cell::sync::Lazy;

type Fields = Vec<(&'static str, Validator)>;

/// Record with the common resource fields added to `optional`
fn resource(name: &str, required: Fields, optional: Fields) -> Validator {
    let mut fields: Fields = vec![
        ("resourceType", p::code()),
        ("id", p::id()),
        ("text", NARRATIVE.clone()),
        ("extension", array_of(EXTENSION.clone())),
    ];
    fields.extend(optional);
    intersect(required_shape(required), optional_shape(fields), name)
}

/// `CodeableConcept | boolean | Quantity | Range | Reference`
pub static CHARACTERISTIC_VALUE: Lazy<Validator> = Lazy::new(|| {
    union_of(vec![
        CODEABLE_CONCEPT.clone(),
        p::boolean(),
        QUANTITY.clone(),
        RANGE.clone(),
        REFERENCE.clone(),
    ])
});

pub static GROUP_CHARACTERISTIC: Lazy<Validator> = Lazy::new(|| {
    element(
        "GroupCharacteristic",
        vec![
            ("code", CODEABLE_CONCEPT.clone()),
            ("value", CHARACTERISTIC_VALUE.clone()),
            ("exclude", p::boolean()),
        ],
        vec![("period", PERIOD.clone())],
    )
});

pub static COMPOSITION_SECTION: Lazy<Validator> = Lazy::new(|| {
    recursive("CompositionSection", || {
        element(
            "CompositionSection",
            vec![],
            vec![
                ("title", p::string()),
                ("code", CODEABLE_CONCEPT.clone()),
                ("author", array_of(REFERENCE.clone())),
                ("text", NARRATIVE.clone()),
                ("entry", array_of(REFERENCE.clone())),
                ("section", array_of(COMPOSITION_SECTION.clone())),
            ],
        )
    })
});

pub static OBSERVATION: Lazy<Validator> = Lazy::new(|| {
    resource(
        "Observation",
        vec![("status", p::code()), ("code", CODEABLE_CONCEPT.clone())],
        vec![
            ("identifier", array_of(IDENTIFIER.clone())),
            ("subject", REFERENCE.clone()),
            ("effectiveDateTime", p::date_time()),
            ("issued", p::instant()),
            ("valueQuantity", QUANTITY.clone()),
            ("valueCodeableConcept", CODEABLE_CONCEPT.clone()),
            ("valueString", p::string()),
            ("valueBoolean", p::boolean()),
            ("note", array_of(ANNOTATION.clone())),
        ],
    )
});

pub static COMPOSITION: Lazy<Validator> = Lazy::new(|| {
    resource(
        "Composition",
        vec![
            ("status", p::code()),
            ("type", CODEABLE_CONCEPT.clone()),
            ("date", p::date_time()),
            ("author", array_of(REFERENCE.clone())),
            ("title", p::string()),
        ],
        vec![
            ("identifier", IDENTIFIER.clone()),
            ("subject", REFERENCE.clone()),
            ("section", array_of(COMPOSITION_SECTION.clone())),
        ],
    )
});
