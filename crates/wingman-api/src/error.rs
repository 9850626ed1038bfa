//! HTTP error mapping.
//!
//! Every failure surfaces as `{"error": "<message>"}` with the status
//! code the pipeline stage dictates. The message is the diagnostic the
//! stage produced; nothing internal (queries, stack traces) leaks.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};

#[derive(Debug)]
pub enum ApiError {
    Unauthorized(String),
    Forbidden(String),
    BadRequest(String),
    NotFound(String),
    /// Upstream analysis reached a terminal failure.
    AnalysisFailed(String),
    /// Awaiting the upstream operation exceeded the ceiling.
    Timeout(String),
    /// Persistence or other internal failure.
    Internal(String),
}

impl From<wingman_core::Error> for ApiError {
    fn from(err: wingman_core::Error) -> Self {
        match &err {
            wingman_core::Error::Unauthorized(msg) => ApiError::Unauthorized(msg.clone()),
            wingman_core::Error::Forbidden(msg) => ApiError::Forbidden(msg.clone()),
            wingman_core::Error::InvalidInput(msg) => ApiError::BadRequest(msg.clone()),
            wingman_core::Error::NotFound(msg) => ApiError::NotFound(msg.clone()),
            wingman_core::Error::AnalysisFailed(msg) => ApiError::AnalysisFailed(msg.clone()),
            wingman_core::Error::Timeout { .. } => ApiError::Timeout(err.to_string()),
            _ => ApiError::Internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::AnalysisFailed(msg) => (StatusCode::BAD_GATEWAY, msg),
            ApiError::Timeout(msg) => (StatusCode::GATEWAY_TIMEOUT, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(serde_json::json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
