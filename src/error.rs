//! HTTP error taxonomy.
//!
//! Client mistakes render as `{error, message?}` with a 4xx status; engine failures
//! render as `{error, detail}` with 500 and the underlying error text.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use http::StatusCode;
use serde_json::json;

use crate::engine::EngineError;

pub const SUPPORTED_ROUTES: [&str; 3] = ["GET /", "POST /", "POST /v1/chat/completions"];

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid JSON body")]
    InvalidJson,
    #[error("`text` must be a string")]
    TextNotString,
    #[error("`messages` must be a non-empty array")]
    InvalidFormat,
    #[error("{0}")]
    InvalidMessage(&'static str),
    #[error("{method} is not supported on {path}; use POST")]
    MethodNotAllowed { method: String, path: String },
    #[error("No route for {method} {path}")]
    NotFound { method: String, path: String },
    #[error("Initialization failed: {0}")]
    Initialization(EngineError),
    #[error("Conversion failed: {0}")]
    Conversion(EngineError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidJson
            | ApiError::TextNotString
            | ApiError::InvalidFormat
            | ApiError::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            ApiError::MethodNotAllowed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Initialization(_) | ApiError::Conversion(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> serde_json::Value {
        match self {
            ApiError::InvalidJson | ApiError::TextNotString => json!({ "error": self.to_string() }),
            ApiError::InvalidFormat => json!({
                "error": "Invalid format",
                "message": self.to_string(),
            }),
            ApiError::InvalidMessage(msg) => json!({
                "error": "Invalid message",
                "message": msg,
            }),
            ApiError::MethodNotAllowed { .. } => json!({
                "error": "Method Not Allowed",
                "message": self.to_string(),
            }),
            ApiError::NotFound { .. } => json!({
                "error": "Not Found",
                "message": format!("{}. Supported routes: {}", self, SUPPORTED_ROUTES.join(", ")),
                "routes": SUPPORTED_ROUTES,
            }),
            ApiError::Initialization(e) => json!({
                "error": "Initialization failed",
                "detail": e.to_string(),
            }),
            ApiError::Conversion(e) => json!({
                "error": "Conversion failed",
                "detail": e.to_string(),
            }),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }
        (status, Json(self.body())).into_response()
    }
}
