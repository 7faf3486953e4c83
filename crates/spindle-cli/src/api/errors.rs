//! API error types and HTTP status mapping.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use spindle_core::SpindleError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// Client sent something unusable.
    BadRequest(String),
    NotFound(String),
    MethodNotAllowed,
    /// Pool is shutting down and refused the task.
    Unavailable(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                "method not allowed".to_string(),
            ),
            ApiError::Unavailable(msg) => (StatusCode::SERVICE_UNAVAILABLE, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<SpindleError> for ApiError {
    fn from(err: SpindleError) -> Self {
        match err {
            SpindleError::TaskNotFound(_) => ApiError::NotFound(err.to_string()),
            SpindleError::QueueClosed => ApiError::Unavailable(err.to_string()),
            SpindleError::InvalidTransition { .. } | SpindleError::AlreadyStarted => {
                ApiError::Internal(err.to_string())
            }
        }
    }
}
