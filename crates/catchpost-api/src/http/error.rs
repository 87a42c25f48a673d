//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Request-level failures. Processing failures of a well-formed update are
/// not errors at this level; they are logged by the dispatcher.
#[derive(Debug)]
pub enum AppError {
    /// Missing or wrong webhook secret.
    Unauthorized(String),
    /// Body is not a decodable update.
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
        };

        let body = json!({
            "ok": false,
            "error": {
                "code": code,
                "message": message,
            },
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });

        (status, axum::Json(body)).into_response()
    }
}
