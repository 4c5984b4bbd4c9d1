use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::{
    response::{ErrorEnvelope, FieldError},
    validation::ValidationErrors,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Validation failed")]
    Validation(ValidationErrors),

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Store failed to complete the operation")]
    StoreFailure,

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::NotFound => (StatusCode::NOT_FOUND, Json(serde_json::Value::Null)).into_response(),
            AppError::Validation(errors) => {
                let body = ErrorEnvelope {
                    errors: errors.into_inner(),
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::BadRequest(message) => {
                let body = ErrorEnvelope {
                    errors: vec![FieldError::new("body", message)],
                };
                (StatusCode::BAD_REQUEST, Json(body)).into_response()
            }
            AppError::StoreFailure => {
                tracing::warn!("store reported failure");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::Value::Null)).into_response()
            }
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "orm error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::Value::Null)).into_response()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::Value::Null)).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
