use serde_json::Value;

use crate::{
    error::{AppError, AppResult},
    validation::value::as_text,
};

pub mod categories;
pub mod payload;
pub mod products;

/// Text attribute that may be cleared by sending null. Blank strings count
/// as null.
pub(crate) fn nullable_text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        other => as_text(other),
    }
}

/// Required text attribute. Null and blank strings leave it unset.
pub(crate) fn required_text(field: &str, value: Option<&Value>) -> AppResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(value) => as_text(value)
            .map(Some)
            .ok_or_else(|| AppError::BadRequest(format!("{field} must be a scalar value"))),
    }
}
