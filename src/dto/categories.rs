use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    dto::{nullable_text, required_text},
    error::AppResult,
    models::Category,
    response::{FieldError, Meta},
    validation::{ValidationErrors, value::as_number},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CategoryRequest {
    pub name: Option<String>,
    pub alias: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub parent_id: Option<i64>,
    pub order: Option<i32>,
    pub status: Option<i32>,
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryInput {
    pub name: Option<String>,
    pub alias: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub parent_id: Option<Option<i64>>,
    pub order: Option<i32>,
    pub status: Option<i32>,
}

impl CategoryInput {
    pub fn from_payload(payload: &Map<String, Value>) -> AppResult<Self> {
        Ok(Self {
            name: required_text("name", payload.get("name"))?,
            alias: payload.get("alias").map(nullable_text),
            image: payload.get("image").map(nullable_text),
            description: payload.get("description").map(nullable_text),
            parent_id: payload
                .get("parent_id")
                .map(|value| as_number(value).map(|n| n.trunc() as i64)),
            order: integer_column(payload, "order")?,
            status: integer_column(payload, "status")?,
        })
    }
}

/// Truncates a numeric attribute to `i32`, refusing values outside its range.
fn integer_column(payload: &Map<String, Value>, field: &str) -> AppResult<Option<i32>> {
    let Some(number) = payload.get(field).and_then(as_number) else {
        return Ok(None);
    };
    let truncated = number.trunc();
    if truncated < f64::from(i32::MIN) || truncated > f64::from(i32::MAX) {
        let mut errors = ValidationErrors::default();
        errors.push(FieldError::new(
            field,
            format!("The {field} must be between {} and {}.", i32::MIN, i32::MAX),
        ));
        return Err(errors.into());
    }
    Ok(i32::try_from(truncated as i64).ok())
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryRead {
    pub category: Category,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CategoryBrowse {
    pub categories: Vec<Category>,
    pub meta: Meta,
}
