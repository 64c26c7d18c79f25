//! Primitive validator catalog
//!
//! Every kind decodes to the value it was given and encodes as the
//! identity. String kinds are checked against anchored FHIR R4 patterns;
//! `url`, `canonical` and `oid` are `uri` narrowed by one more pattern.

use fhir_ir::{Number, Value, ValueKind, is_whole_number};
use fhir_schema::{ErrorKind, Validator, primitive};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use std::str::FromStr;

/// Kinds of constrained scalar values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Boolean,
    Integer,
    PositiveInt,
    UnsignedInt,
    Decimal,
    Id,
    Code,
    Uri,
    Url,
    Canonical,
    Oid,
    Uuid,
    Date,
    DateTime,
    Time,
    Instant,
    Markdown,
    Base64Binary,
    String,
    Xhtml,
}

const YEAR: &str = r"([0-9]([0-9]([0-9][1-9]|[1-9]0)|[1-9]00)|[1-9]000)";
const CLOCK: &str = r"([01][0-9]|2[0-3]):[0-5][0-9]:([0-5][0-9]|60)(\.[0-9]+)?";
const ZONE: &str = r"(Z|(\+|-)((0[0-9]|1[0-3]):[0-5][0-9]|14:00))";
const MONTH: &str = r"(0[1-9]|1[0-2])";
const DAY: &str = r"(0[1-9]|[1-2][0-9]|3[0-1])";

fn anchored(pattern: &str) -> Regex {
    Regex::new(&format!("^(?:{pattern})$")).expect("primitive pattern must compile")
}

static ID_RE: Lazy<Regex> = Lazy::new(|| anchored(r"[A-Za-z0-9.-]{1,64}"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| anchored(r"[^\s]+(\s[^\s]+)*"));
static URI_RE: Lazy<Regex> = Lazy::new(|| anchored(r"\S*"));
// FHIR R4 publishes the same pattern for url as for uri, so this stage
// narrows nothing; relative references stay valid urls.
static URL_RE: Lazy<Regex> = Lazy::new(|| anchored(r"\S*"));
static CANONICAL_RE: Lazy<Regex> = Lazy::new(|| anchored(r"[^\s|]*(\|[^\s|]+)?"));
static OID_RE: Lazy<Regex> = Lazy::new(|| anchored(r"urn:oid:[0-2](\.(0|[1-9][0-9]*))+"));
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    anchored(r"urn:uuid:[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
});
static DATE_RE: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{YEAR}(-{MONTH}(-{DAY})?)?")));
static DATE_TIME_RE: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{YEAR}(-{MONTH}(-{DAY}(T{CLOCK}{ZONE})?)?)?")));
static TIME_RE: Lazy<Regex> = Lazy::new(|| anchored(CLOCK));
static INSTANT_RE: Lazy<Regex> =
    Lazy::new(|| anchored(&format!("{YEAR}-{MONTH}-{DAY}T{CLOCK}{ZONE}")));
static MARKDOWN_RE: Lazy<Regex> = Lazy::new(|| anchored(r"\s*(\S|\s)*"));
static BASE64_RE: Lazy<Regex> = Lazy::new(|| anchored(r"(\s*([0-9a-zA-Z+=/]){4}\s*)+"));
static STRING_RE: Lazy<Regex> = Lazy::new(|| anchored(r"[ \r\n\t\S]+"));
static XHTML_RE: Lazy<Regex> = Lazy::new(|| anchored(r"(?s)\s*<div[\s>].*</div>\s*"));

static CATALOG: Lazy<Vec<Validator>> = Lazy::new(|| {
    PrimitiveKind::ALL
        .iter()
        .map(|kind| kind.build())
        .collect()
});

impl PrimitiveKind {
    /// Every kind, in declaration order
    pub const ALL: [PrimitiveKind; 20] = [
        PrimitiveKind::Boolean,
        PrimitiveKind::Integer,
        PrimitiveKind::PositiveInt,
        PrimitiveKind::UnsignedInt,
        PrimitiveKind::Decimal,
        PrimitiveKind::Id,
        PrimitiveKind::Code,
        PrimitiveKind::Uri,
        PrimitiveKind::Url,
        PrimitiveKind::Canonical,
        PrimitiveKind::Oid,
        PrimitiveKind::Uuid,
        PrimitiveKind::Date,
        PrimitiveKind::DateTime,
        PrimitiveKind::Time,
        PrimitiveKind::Instant,
        PrimitiveKind::Markdown,
        PrimitiveKind::Base64Binary,
        PrimitiveKind::String,
        PrimitiveKind::Xhtml,
    ];

    /// Validator name, as used in error trails
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            PrimitiveKind::Boolean => "boolean",
            PrimitiveKind::Integer => "integer",
            PrimitiveKind::PositiveInt => "positiveInt",
            PrimitiveKind::UnsignedInt => "unsignedInt",
            PrimitiveKind::Decimal => "decimal",
            PrimitiveKind::Id => "id",
            PrimitiveKind::Code => "code",
            PrimitiveKind::Uri => "uri",
            PrimitiveKind::Url => "url",
            PrimitiveKind::Canonical => "canonical",
            PrimitiveKind::Oid => "oid",
            PrimitiveKind::Uuid => "uuid",
            PrimitiveKind::Date => "date",
            PrimitiveKind::DateTime => "dateTime",
            PrimitiveKind::Time => "time",
            PrimitiveKind::Instant => "instant",
            PrimitiveKind::Markdown => "markdown",
            PrimitiveKind::Base64Binary => "base64Binary",
            PrimitiveKind::String => "string",
            PrimitiveKind::Xhtml => "xhtml",
        }
    }

    /// Base kind a derived kind narrows
    #[must_use]
    pub fn base(self) -> Option<PrimitiveKind> {
        match self {
            PrimitiveKind::Url | PrimitiveKind::Canonical | PrimitiveKind::Oid => {
                Some(PrimitiveKind::Uri)
            }
            _ => None,
        }
    }

    /// Pattern of a string kind
    #[must_use]
    pub fn pattern(self) -> Option<&'static Regex> {
        let pattern: &'static Lazy<Regex> = match self {
            PrimitiveKind::Boolean
            | PrimitiveKind::Integer
            | PrimitiveKind::PositiveInt
            | PrimitiveKind::UnsignedInt
            | PrimitiveKind::Decimal => return None,
            PrimitiveKind::Id => &ID_RE,
            PrimitiveKind::Code => &CODE_RE,
            PrimitiveKind::Uri => &URI_RE,
            PrimitiveKind::Url => &URL_RE,
            PrimitiveKind::Canonical => &CANONICAL_RE,
            PrimitiveKind::Oid => &OID_RE,
            PrimitiveKind::Uuid => &UUID_RE,
            PrimitiveKind::Date => &DATE_RE,
            PrimitiveKind::DateTime => &DATE_TIME_RE,
            PrimitiveKind::Time => &TIME_RE,
            PrimitiveKind::Instant => &INSTANT_RE,
            PrimitiveKind::Markdown => &MARKDOWN_RE,
            PrimitiveKind::Base64Binary => &BASE64_RE,
            PrimitiveKind::String => &STRING_RE,
            PrimitiveKind::Xhtml => &XHTML_RE,
        };
        Some(Lazy::force(pattern))
    }

    /// Check a raw value against this kind
    ///
    /// # Errors
    ///
    /// Returns `TypeMismatch` for the wrong runtime kind and `Format` for a
    /// failed pattern or range.
    pub fn check(self, value: &Value) -> Result<(), ErrorKind> {
        match self {
            PrimitiveKind::Boolean => match value {
                Value::Bool(_) => Ok(()),
                other => Err(ErrorKind::type_mismatch(ValueKind::Boolean, other)),
            },
            PrimitiveKind::Decimal => number(value).map(|_| ()),
            PrimitiveKind::Integer => whole_number(value).map(|_| ()),
            PrimitiveKind::PositiveInt => {
                let n = whole_number(value)?;
                if n.as_f64().is_some_and(|f| f >= 1.0) {
                    Ok(())
                } else {
                    Err(ErrorKind::format("positive integer (>= 1)"))
                }
            }
            PrimitiveKind::UnsignedInt => {
                let n = whole_number(value)?;
                if n.as_f64().is_some_and(|f| f >= 0.0) {
                    Ok(())
                } else {
                    Err(ErrorKind::format("unsigned integer (>= 0)"))
                }
            }
            _ => {
                if let Some(base) = self.base() {
                    base.check(value)?;
                }
                self.check_pattern(value)
            }
        }
    }

    fn check_pattern(self, value: &Value) -> Result<(), ErrorKind> {
        let Value::String(s) = value else {
            return Err(ErrorKind::type_mismatch(ValueKind::String, value));
        };
        match self.pattern() {
            Some(re) if !re.is_match(s) => Err(ErrorKind::format(format!(
                "{} pattern {}",
                self.name(),
                re.as_str()
            ))),
            _ => Ok(()),
        }
    }

    fn build(self) -> Validator {
        primitive(
            self.name(),
            move |v| self.check(v).is_ok(),
            move |v| self.check(v).map(|()| v.clone()),
            Value::clone,
        )
    }

    /// Shared validator for this kind
    #[must_use]
    pub fn validator(self) -> Validator {
        CATALOG[self as usize].clone()
    }
}

fn number(value: &Value) -> Result<&Number, ErrorKind> {
    match value {
        Value::Number(n) => Ok(n),
        other => Err(ErrorKind::type_mismatch(ValueKind::Number, other)),
    }
}

fn whole_number(value: &Value) -> Result<&Number, ErrorKind> {
    let n = number(value)?;
    if is_whole_number(n) {
        Ok(n)
    } else {
        Err(ErrorKind::format("whole number"))
    }
}

impl fmt::Display for PrimitiveKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PrimitiveKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        PrimitiveKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| crate::Error::UnknownKind(s.to_string()))
    }
}

pub fn boolean() -> Validator {
    PrimitiveKind::Boolean.validator()
}

pub fn integer() -> Validator {
    PrimitiveKind::Integer.validator()
}

pub fn positive_int() -> Validator {
    PrimitiveKind::PositiveInt.validator()
}

pub fn unsigned_int() -> Validator {
    PrimitiveKind::UnsignedInt.validator()
}

pub fn decimal() -> Validator {
    PrimitiveKind::Decimal.validator()
}

pub fn id() -> Validator {
    PrimitiveKind::Id.validator()
}

pub fn code() -> Validator {
    PrimitiveKind::Code.validator()
}

pub fn uri() -> Validator {
    PrimitiveKind::Uri.validator()
}

pub fn url() -> Validator {
    PrimitiveKind::Url.validator()
}

pub fn canonical() -> Validator {
    PrimitiveKind::Canonical.validator()
}

pub fn oid() -> Validator {
    PrimitiveKind::Oid.validator()
}

pub fn uuid() -> Validator {
    PrimitiveKind::Uuid.validator()
}

pub fn date() -> Validator {
    PrimitiveKind::Date.validator()
}

pub fn date_time() -> Validator {
    PrimitiveKind::DateTime.validator()
}

pub fn time() -> Validator {
    PrimitiveKind::Time.validator()
}

pub fn instant() -> Validator {
    PrimitiveKind::Instant.validator()
}

pub fn markdown() -> Validator {
    PrimitiveKind::Markdown.validator()
}

pub fn base64_binary() -> Validator {
    PrimitiveKind::Base64Binary.validator()
}

pub fn string() -> Validator {
    PrimitiveKind::String.validator()
}

pub fn xhtml() -> Validator {
    PrimitiveKind::Xhtml.validator()
}
