mod common;

use axum::http::StatusCode;
use shoppingcart_api::routes::health::health_check;

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.status, "ok");
}

#[tokio::test]
async fn unknown_route_is_404_with_null_body() {
    let app = common::app();
    let (status, body) = common::get(&app, "/nope").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, Some(serde_json::Value::Null));
}
