use std::collections::HashMap;

use axum::{
    Form,
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use serde_json::{Map, Value};

use crate::error::AppError;

/// Request body as a loose attribute map. JSON objects and urlencoded forms
/// are accepted; an empty body is an empty map.
#[derive(Debug, Default, Clone)]
pub struct Payload(pub Map<String, Value>);

impl<S> FromRequest<S> for Payload
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_form = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/x-www-form-urlencoded"));

        if is_form {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|err| AppError::BadRequest(err.body_text()))?;
            let map = fields
                .into_iter()
                .map(|(key, value)| (key, Value::String(value)))
                .collect();
            return Ok(Payload(map));
        }

        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|err| AppError::BadRequest(err.body_text()))?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Payload(Map::new()));
        }

        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(map)) => Ok(Payload(map)),
            Ok(_) => Err(AppError::BadRequest(
                "request body must be a JSON object".to_string(),
            )),
            Err(err) => Err(AppError::BadRequest(format!("malformed JSON body: {err}"))),
        }
    }
}
