//! Application error type mapping to HTTP status codes and envelope format.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use botsmith_types::error::EmbedError;

use crate::http::response::{ApiResponse, new_request_id};

#[derive(Debug)]
pub enum AppError {
    /// The token did not decode to a usable bot configuration.
    NoDeployedConfig(EmbedError),
    SessionNotFound(String),
    Validation(String),
    Internal(String),
}

impl From<EmbedError> for AppError {
    fn from(e: EmbedError) -> Self {
        AppError::NoDeployedConfig(e)
    }
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NoDeployedConfig(e) => (
                StatusCode::NOT_FOUND,
                "NO_DEPLOYED_CONFIG",
                format!("No deployed bot configuration found: {e}"),
            ),
            AppError::SessionNotFound(id) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                format!("Session '{id}' not found"),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        if status.is_server_error() {
            tracing::error!(code, %message, "request failed");
        }
        (status, Json(ApiResponse::error(code, &message, new_request_id()))).into_response()
    }
}
