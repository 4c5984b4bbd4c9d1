#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use shoppingcart_api::{routes::create_app, state::AppState};
use tower::ServiceExt;

pub fn app() -> Router {
    create_app(AppState::in_memory())
}

/// Sends one request and returns the status with the decoded JSON body,
/// `None` when the body is empty.
pub async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Option<Value>) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    let request = builder.body(body).expect("request");

    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    if bytes.is_empty() {
        return (status, None);
    }
    let json = serde_json::from_slice(&bytes).expect("json body");
    (status, Some(json))
}

pub async fn get(app: &Router, uri: &str) -> (StatusCode, Option<Value>) {
    send(app, Method::GET, uri, None).await
}

pub async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Option<Value>) {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put(app: &Router, uri: &str, body: Value) -> (StatusCode, Option<Value>) {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn delete(app: &Router, uri: &str) -> (StatusCode, Option<Value>) {
    send(app, Method::DELETE, uri, None).await
}

/// Messages reported for `field` in a 400 envelope.
pub fn messages_for(body: &Option<Value>, field: &str) -> Vec<String> {
    body.as_ref()
        .and_then(|b| b["errors"].as_array())
        .map(|errors| {
            errors
                .iter()
                .filter(|e| e["field"] == field)
                .filter_map(|e| e["message"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}
