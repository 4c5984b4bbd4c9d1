use std::collections::HashMap;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::{
        categories::{CategoryBrowse, CategoryRead, CategoryRequest},
        payload::Payload,
    },
    error::AppResult,
    response::ErrorEnvelope,
    routes::params::CategoryBrowseQuery,
    services::category_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route(
            "/{id}",
            get(get_category)
                .put(update_category)
                .patch(update_category)
                .delete(delete_category),
        )
}

#[utoipa::path(
    get,
    path = "/api/categories",
    params(
        ("sort" = Option<String>, Query, description = "Column to order by, default `id`"),
        ("direction" = Option<String>, Query, description = "`asc` or `desc`, default `desc`"),
        ("limit" = Option<i64>, Query, description = "Page size, default 25; zero or invalid values use the default"),
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("cursor" = Option<String>, Query, description = "Continuation token from `meta.cursor`"),
    ),
    responses(
        (status = 200, description = "List categories; any other query key naming a column filters by equality", body = CategoryBrowse)
    ),
    tag = "Categories"
)]
pub async fn list_categories(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> AppResult<Json<CategoryBrowse>> {
    let query = CategoryBrowseQuery::from_params(params);
    let resp = category_service::list_categories(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/categories",
    request_body = CategoryRequest,
    responses(
        (status = 201, description = "Create category", body = CategoryRead),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
    ),
    tag = "Categories"
)]
pub async fn create_category(
    State(state): State<AppState>,
    Payload(payload): Payload,
) -> AppResult<(StatusCode, Json<CategoryRead>)> {
    let resp = category_service::create_category(&state, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/categories/{id}",
    params(
        ("id" = String, Path, description = "Category id or alias")
    ),
    responses(
        (status = 200, description = "Get category", body = CategoryRead),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn get_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<CategoryRead>> {
    let resp = category_service::get_category(&state, &id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    method(put, patch),
    path = "/api/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    request_body = CategoryRequest,
    responses(
        (status = 200, description = "Updated category", body = CategoryRead),
        (status = 400, description = "Validation failed", body = ErrorEnvelope),
        (status = 404, description = "Category not found"),
    ),
    tag = "Categories"
)]
pub async fn update_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload(payload): Payload,
) -> AppResult<Json<CategoryRead>> {
    let resp = category_service::update_category(&state, &id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/categories/{id}",
    params(
        ("id" = i64, Path, description = "Category ID")
    ),
    responses(
        (status = 204, description = "Deleted category"),
        (status = 404, description = "Category not found"),
        (status = 500, description = "Store failed to delete"),
    ),
    tag = "Categories"
)]
pub async fn delete_category(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<StatusCode> {
    category_service::delete_category(&state, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
