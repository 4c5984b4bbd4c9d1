use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        payload::Payload,
        products::{ProductBrowse, ProductRead, ProductRequest},
    },
    error::AppResult,
    response::ErrorEnvelope,
    routes::params::ProductBrowseQuery,
    services::product_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route(
            "/{id}",
            get(get_product)
                .put(update_product)
                .patch(update_product)
                .delete(delete_product),
        )
}

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("limit" = Option<i64>, Query, description = "Page size, default 25; zero or invalid values use the default"),
        ("cursor" = Option<String>, Query, description = "Continuation token from `meta.cursor`"),
    ),
    responses(
        (status = 200, description = "List products, newest first", body = ProductBrowse)
    ),
    tag = "Products"
)]
pub async fn list_products(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<ProductBrowse>> {
    let query = ProductBrowseQuery::from_params(&params);
    let resp = product_service::list_products(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductRequest,
    responses(
        (status = 201, description = "Create product", body = ProductRead),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
    ),
    tag = "Products"
)]
pub async fn create_product(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<ProductRead>)> {
    let resp = product_service::create_product(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(
        ("id" = String, Path, description = "Product id or alias")
    ),
    responses(
        (status = 200, description = "Get product", body = ProductRead),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ProductRead>> {
    let resp = product_service::get_product(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    method(put, patch),
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    request_body = ProductRequest,
    responses(
        (status = 200, description = "Updated product", body = ProductRead),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 404, description = "Product not found"),
    ),
    tag = "Products"
)]
pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload,
) -> AppResult<Json<ProductRead>> {
    let resp = product_service::update_product(&state, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(
        ("id" = i64, Path, description = "Product ID")
    ),
    responses(
        (status = 204, description = "Deleted product"),
        (status = 404, description = "Product not found"),
        (status = 500, description = "Store failed to delete"),
    ),
    tag = "Products"
)]
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    product_service::delete_product(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
