//! API error type and its HTTP mapping
//!
//! Validation and not-found failures carry their message to the caller.
//! Storage failures are logged and replaced by a generic message.

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or missing input (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// No row matches the target id (404)
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Missing or invalid session, wrong password (401)
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Server-side condition safe to describe to the caller (500)
    #[error("Internal server error: {0}")]
    Internal(String),

    /// Database or I/O failure (500, message not exposed)
    #[error("Storage error: {0}")]
    Storage(#[source] fij_common::Error),
}

impl From<fij_common::Error> for ApiError {
    fn from(err: fij_common::Error) -> Self {
        match err {
            fij_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            fij_common::Error::NotFound(msg) => ApiError::NotFound(msg),
            other => ApiError::Storage(other),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg),
            ApiError::Storage(err) => {
                error!("Storage failure: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
