//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`subseek_core::Error`] so that route
//! handlers can use `?` on core results.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::middleware::request_id::current_request_id;

/// Wrapper so we can implement `IntoResponse` for an external type.
///
/// The body's `request_id` is taken from the request-id middleware when the
/// error is rendered inside a request.
pub struct AppError {
    inner: subseek_core::Error,
}

impl AppError {
    pub fn new(inner: subseek_core::Error) -> Self {
        Self { inner }
    }
}

impl From<subseek_core::Error> for AppError {
    fn from(e: subseek_core::Error) -> Self {
        Self::new(e)
    }
}

impl From<tokio::task::JoinError> for AppError {
    fn from(e: tokio::task::JoinError) -> Self {
        Self::new(subseek_core::Error::Internal(format!("Blocking task failed: {e}")))
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        }

        let code = match &self.inner {
            subseek_core::Error::NotFound { .. } => "not_found",
            subseek_core::Error::Validation(_) => "validation_error",
            subseek_core::Error::Decode { .. } => "decode_error",
            subseek_core::Error::Database { .. } => "database_error",
            subseek_core::Error::Io { .. } => "io_error",
            subseek_core::Error::Tool { .. } => "tool_error",
            subseek_core::Error::Unavailable(_) => "unavailable",
            subseek_core::Error::Internal(_) => "internal_error",
        };

        let body = json!({
            "error": self.inner.to_string(),
            "code": code,
            "request_id": current_request_id(),
        });

        (status, axum::Json(body)).into_response()
    }
}
