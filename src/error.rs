//! Error types for Bookshelf server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Map, Value};
use thiserror::Error;
use validator::ValidationErrors;

use crate::models::{Genre, SortField};

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid genre filter: {0}")]
    InvalidFilter(String),

    #[error("Limit and page must be positive numbers (limit={limit}, page={page})")]
    InvalidPagination { limit: String, page: String },

    #[error("Invalid sort field: {0}")]
    InvalidSortField(String),

    /// Identifier that is not structurally valid
    #[error("{0}")]
    InvalidId(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Request body or query string that could not be decoded
    #[error("Malformed request: {0}")]
    MalformedRequest(String),

    #[error("Not enough copies available (requested {requested}, available {available})")]
    InsufficientCopies { requested: i32, available: i32 },

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Storage failure tagged with the operation that hit it
    #[error("{message}: {cause}")]
    Storage { message: &'static str, cause: String },
}

impl AppError {
    /// Attach an operation message to unclassified storage failures.
    /// Classified errors are returned unchanged.
    pub fn context(self, message: &'static str) -> Self {
        match self {
            AppError::Database(e) => AppError::Storage {
                message,
                cause: e.to_string(),
            },
            other => other,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidFilter(_)
            | AppError::InvalidPagination { .. }
            | AppError::InvalidSortField(_)
            | AppError::InvalidId(_)
            | AppError::Validation(_)
            | AppError::MalformedRequest(_)
            | AppError::InsufficientCopies { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Database(_) | AppError::Storage { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body, the failure side of the response envelope
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub error: Option<Value>,
}

impl ErrorResponse {
    fn new(message: impl Into<String>, error: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let body = match self {
            AppError::InvalidFilter(_) => ErrorResponse::new(
                "Invalid genre filter",
                Some(json!({ "validGenres": Genre::codes() })),
            ),
            AppError::InvalidPagination { limit, page } => ErrorResponse::new(
                "Limit and page must be positive numbers",
                Some(json!({
                    "received": { "limit": limit, "page": page },
                    "expected": "Positive integers",
                })),
            ),
            AppError::InvalidSortField(received) => ErrorResponse::new(
                "Invalid sort field",
                Some(json!({
                    "received": received,
                    "validSortFields": SortField::param_names(),
                })),
            ),
            AppError::InvalidId(msg) | AppError::NotFound(msg) | AppError::Conflict(msg) => {
                ErrorResponse::new(msg, None)
            }
            AppError::Validation(errors) => validation_error_response(&errors),
            AppError::MalformedRequest(detail) => {
                ErrorResponse::new("Malformed request", Some(Value::String(detail)))
            }
            AppError::InsufficientCopies { requested, available } => ErrorResponse::new(
                "Not enough copies available",
                Some(json!({ "requested": requested, "available": available })),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                ErrorResponse::new("Database error", Some(Value::String(e.to_string())))
            }
            AppError::Storage { message, cause } => {
                tracing::error!("{}: {}", message, cause);
                ErrorResponse::new(message, Some(Value::String(cause)))
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Translate field-level validation failures into the shared error body:
/// `{ name: "ValidationError", errors: { <field>: { message, kind, path, value } } }`.
///
/// Only the first failure of each field is reported.
pub fn validation_error_response(errors: &ValidationErrors) -> ErrorResponse {
    let mut fields = Map::new();

    for (field, field_errors) in errors.field_errors() {
        let Some(first) = field_errors.first() else {
            continue;
        };
        let field = field.to_string();
        let message = first
            .message
            .as_deref()
            .map(str::to_string)
            .unwrap_or_else(|| format!("Path `{}` is invalid", field));

        let mut detail = Map::new();
        detail.insert("message".into(), Value::String(message));
        detail.insert("kind".into(), Value::String(first.code.to_string()));
        detail.insert("path".into(), Value::String(field.clone()));
        if let Some(value) = first.params.get("value") {
            detail.insert("value".into(), value.clone());
        }
        fields.insert(field, Value::Object(detail));
    }

    ErrorResponse::new(
        "Validation failed",
        Some(json!({ "name": "ValidationError", "errors": fields })),
    )
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::MalformedRequest(rejection.body_text())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
