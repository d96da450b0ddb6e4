//! Shape checks for incoming book JSON.
//!
//! Every violation in a body is collected, so a client sees the full list in one
//! response rather than the first field serde happens to trip over.

use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Number, Value};

use crate::error::ApiError;
use crate::models::{Book, BookPatch};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Integer,
}

impl FieldType {
    fn name(self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Integer => "integer",
        }
    }
}

/// Required fields of a book and their JSON types, in reporting order.
pub const BOOK_FIELDS: &[(&str, FieldType)] = &[
    ("isbn", FieldType::String),
    ("amazon_url", FieldType::String),
    ("author", FieldType::String),
    ("language", FieldType::String),
    ("pages", FieldType::Integer),
    ("publisher", FieldType::String),
    ("title", FieldType::String),
    ("year", FieldType::Integer),
];

/// A JSON body shape that can list its own violations.
pub trait Shape {
    fn violations(value: &Value) -> Vec<String>;
}

impl Shape for Book {
    fn violations(value: &Value) -> Vec<String> {
        let Some(object) = value.as_object() else {
            return vec![not_an_object()];
        };

        let mut violations = type_violations(object, BOOK_FIELDS.iter());
        violations.extend(
            BOOK_FIELDS
                .iter()
                .filter(|(field, _)| !object.contains_key(*field))
                .map(|(field, _)| format!("instance requires property \"{field}\"")),
        );
        violations
    }
}

impl Shape for BookPatch {
    fn violations(value: &Value) -> Vec<String> {
        let Some(object) = value.as_object() else {
            return vec![not_an_object()];
        };

        // the isbn comes from the path, so it is not patchable
        type_violations(
            object,
            BOOK_FIELDS.iter().filter(|(field, _)| *field != "isbn"),
        )
    }
}

fn not_an_object() -> String {
    "instance is not of a type(s) object".to_string()
}

fn type_violations<'a>(
    object: &Map<String, Value>,
    fields: impl Iterator<Item = &'a (&'static str, FieldType)>,
) -> Vec<String> {
    fields
        .filter_map(|(field, expected)| {
            let value = object.get(*field)?;
            check_type(field, *expected, value)
        })
        .collect()
}

fn check_type(field: &str, expected: FieldType, value: &Value) -> Option<String> {
    let wrong_type = || {
        Some(format!(
            "instance.{field} is not of a type(s) {}",
            expected.name()
        ))
    };

    match (expected, value) {
        (FieldType::String, Value::String(_)) => None,
        (FieldType::Integer, Value::Number(number)) => match as_integer(number) {
            Integer::Fits(_) => None,
            Integer::OutOfRange => Some(format!("instance.{field} must be a 32-bit integer")),
            Integer::Fractional => wrong_type(),
        },
        _ => wrong_type(),
    }
}

enum Integer {
    Fits(i32),
    OutOfRange,
    Fractional,
}

/// Any number without a fractional part is an integer, so `11.0` and `2.011e3` qualify.
fn as_integer(number: &Number) -> Integer {
    if let Some(n) = number.as_i64() {
        return i32::try_from(n).map_or(Integer::OutOfRange, Integer::Fits);
    }
    if number.is_u64() {
        return Integer::OutOfRange;
    }

    match number.as_f64() {
        Some(f) if f.fract() == 0.0 => {
            if f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX) {
                Integer::Fits(f as i32)
            } else {
                Integer::OutOfRange
            }
        }
        _ => Integer::Fractional,
    }
}

/// Rewrite whole-number floats in integer fields so serde reads them as `i32`.
fn normalize_integers(value: &mut Value) {
    let Some(object) = value.as_object_mut() else {
        return;
    };

    for (field, expected) in BOOK_FIELDS {
        if *expected != FieldType::Integer {
            continue;
        }
        let n = match object.get(*field) {
            Some(Value::Number(number)) => match as_integer(number) {
                Integer::Fits(n) => n,
                _ => continue,
            },
            _ => continue,
        };
        object.insert(field.to_string(), Value::from(n));
    }
}

/// JSON body extractor that rejects with the full list of shape violations.
#[derive(Debug)]
pub struct Validated<T>(pub T);

impl<S, T> FromRequest<S> for Validated<T>
where
    S: Send + Sync,
    T: Shape + DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(mut value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| {
                ApiError::rejected(rejection.status(), rejection.body_text())
            })?;

        let violations = T::violations(&value);
        if !violations.is_empty() {
            return Err(ApiError::Validation(violations));
        }
        normalize_integers(&mut value);

        serde_json::from_value(value)
            .map(Validated)
            .map_err(|e| ApiError::Validation(vec![e.to_string()]))
    }
}
