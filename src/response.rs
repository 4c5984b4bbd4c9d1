use serde::Serialize;
use utoipa::ToSchema;

/// Paging details attached to every browse envelope.
#[derive(Debug, Serialize, ToSchema, Clone, PartialEq)]
pub struct Meta {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
    pub total: Option<u64>,
    /// Pass back as `cursor` to continue after the last row of this page.
    pub cursor: Option<String>,
}

impl Meta {
    pub fn new(page: Option<u64>, per_page: u64, total: u64, cursor: Option<String>) -> Self {
        Self {
            page,
            per_page: Some(per_page),
            total: Some(total),
            cursor,
        }
    }
}

#[derive(Debug, Serialize, ToSchema, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Body of every 400 response.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorEnvelope {
    pub errors: Vec<FieldError>,
}
