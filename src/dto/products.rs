use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::{
    dto::{nullable_text, required_text},
    error::AppResult,
    models::Product,
    response::Meta,
    validation::value::as_number,
};

/// Documented shape of a product create/update body. Handlers read the body as
/// a free-form payload so that type mismatches surface as validation errors.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ProductRequest {
    pub title: Option<String>,
    pub alias: Option<String>,
    pub image: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    #[schema(value_type = Option<Vec<Object>>)]
    pub galleries: Option<Value>,
}

/// Attributes taken from a validated payload. The outer `Option` is "not
/// submitted", the inner one "submitted as null".
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ProductInput {
    pub title: Option<String>,
    pub alias: Option<Option<String>>,
    pub image: Option<Option<String>>,
    pub description: Option<Option<String>>,
    pub price: Option<Option<f64>>,
    pub galleries: Option<Option<Value>>,
}

impl ProductInput {
    pub fn from_payload(payload: &Map<String, Value>) -> AppResult<Self> {
        Ok(Self {
            title: required_text("title", payload.get("title"))?,
            alias: payload.get("alias").map(nullable_text),
            image: payload.get("image").map(nullable_text),
            description: payload.get("description").map(nullable_text),
            price: payload.get("price").map(as_number),
            galleries: payload.get("galleries").map(|value| match value {
                Value::Null => None,
                other => Some(other.clone()),
            }),
        })
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductRead {
    pub product: Product,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductBrowse {
    pub products: Vec<Product>,
    pub meta: Meta,
}
