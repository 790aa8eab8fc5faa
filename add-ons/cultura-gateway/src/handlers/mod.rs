//! HTTP handlers, grouped by area.

pub(crate) mod chat;
pub(crate) mod knowledge;
pub(crate) mod regions;
pub(crate) mod translate;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cultura_core::{ChatError, ConfigurationError, GeoError};

/// Error body for every failing handler: `{ "error": "..." }`.
#[derive(Debug)]
pub(crate) enum ApiError {
    BadRequest(String),
    NotFound(String),
    Conflict(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(m) => (StatusCode::BAD_REQUEST, m),
            ApiError::NotFound(m) => (StatusCode::NOT_FOUND, m),
            ApiError::Conflict(m) => (StatusCode::CONFLICT, m),
        };
        (status, axum::Json(serde_json::json!({ "error": message }))).into_response()
    }
}

impl From<ConfigurationError> for ApiError {
    fn from(e: ConfigurationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<ChatError> for ApiError {
    fn from(e: ChatError) -> Self {
        match e {
            ChatError::EmptyMessage => ApiError::BadRequest(e.to_string()),
            ChatError::SubmissionPending => ApiError::Conflict(e.to_string()),
        }
    }
}

impl From<GeoError> for ApiError {
    fn from(e: GeoError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
