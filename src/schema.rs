//! Fixed-schema validation for candidate catalog records.
//!
//! Runs before any persistence I/O on create and full-update paths.
//! Returns the first offending field only, in schema order.

use std::error::Error;
use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::{Map, Value};

/// Expected shape of a schema field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Str,
    Date,
    Number,
    Bool,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldKind::Str => write!(f, "string"),
            FieldKind::Date => write!(f, "date"),
            FieldKind::Number => write!(f, "number"),
            FieldKind::Bool => write!(f, "boolean"),
        }
    }
}

/// Required fields of a candidate record. `id` is store-assigned and the
/// timestamps are optional, so none of them appear here.
const REQUIRED: &[(&str, FieldKind)] = &[
    ("Type", FieldKind::Str),
    ("SubType", FieldKind::Str),
    ("Name", FieldKind::Str),
    ("ReleaseDate", FieldKind::Date),
    ("Price", FieldKind::Number),
    ("Version", FieldKind::Number),
    ("Available", FieldKind::Bool),
];

/// Optional fields that still must be the right shape when present.
const OPTIONAL: &[(&str, FieldKind)] = &[
    ("createdAt", FieldKind::Str),
    ("updatedAt", FieldKind::Str),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field is absent.
    Missing(&'static str),
    /// A field is present but not the expected shape.
    WrongType {
        field: &'static str,
        expected: FieldKind,
    },
    /// The record passed the field checks but does not deserialize into an
    /// item. Not reachable through the public store API.
    Shape(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Missing(field) => write!(f, "\"{}\" is required", field),
            ValidationError::WrongType { field, expected } => {
                write!(f, "\"{}\" must be a {}", field, expected)
            }
            ValidationError::Shape(detail) => {
                write!(f, "record does not fit the item shape: {}", detail)
            }
        }
    }
}

impl Error for ValidationError {}

/// Check a candidate record against the fixed schema. Does not mutate the
/// input; fails on the first offending field.
pub fn validate(candidate: &Map<String, Value>) -> Result<(), ValidationError> {
    for (field, kind) in REQUIRED {
        let value = candidate
            .get(*field)
            .ok_or(ValidationError::Missing(field))?;
        if !matches_kind(value, *kind) {
            return Err(ValidationError::WrongType {
                field,
                expected: *kind,
            });
        }
    }
    for (field, kind) in OPTIONAL {
        if let Some(value) = candidate.get(*field) {
            if !matches_kind(value, *kind) {
                return Err(ValidationError::WrongType {
                    field,
                    expected: *kind,
                });
            }
        }
    }
    Ok(())
}

fn matches_kind(value: &Value, kind: FieldKind) -> bool {
    match kind {
        FieldKind::Str => value.is_string(),
        FieldKind::Date => value.as_str().is_some_and(is_date_like),
        FieldKind::Number => value.is_number(),
        FieldKind::Bool => value.is_boolean(),
    }
}

fn is_date_like(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
}
