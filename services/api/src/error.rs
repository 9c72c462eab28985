//! Custom error types for the platform service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the platform service
///
/// Absent records, wrong-status operations, and ownership/role failures are
/// user-facing rejections, not faults; only `InternalServerError` maps to a
/// 5xx.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Referenced novel/user/order does not resolve
    #[error("Not found: {0}")]
    NotFound(String),

    /// Operation attempted against a record not in the expected status
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Ownership or role check failed
    #[error("Permission denied")]
    PermissionDenied,

    /// Missing or invalid credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error
    #[error("Internal server error")]
    InternalServerError,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InvalidState(msg) => (StatusCode::CONFLICT, msg),
            ApiError::PermissionDenied => {
                (StatusCode::FORBIDDEN, "Permission denied".to_string())
            }
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InternalServerError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
