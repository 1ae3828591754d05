//! Error types for jts-search HTTP handlers

use std::collections::BTreeMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Request fields failed validation (400)
    #[error("Validation failed: {0:?}")]
    Validation(BTreeMap<String, String>),

    /// Request could not be parsed (400)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Service error; status depends on the kind
    #[error(transparent)]
    Service(#[from] jts_common::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let timestamp = Utc::now().to_rfc3339();

        let (status, body) = match self {
            ApiError::Validation(field_errors) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "timestamp": timestamp,
                    "status": StatusCode::BAD_REQUEST.as_u16(),
                    "error": "Validation Failed",
                    "field_errors": field_errors,
                }),
            ),
            ApiError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": { "code": "BAD_REQUEST", "message": message },
                    "timestamp": timestamp,
                }),
            ),
            ApiError::Service(err) => {
                let status = match err {
                    jts_common::Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                if status.is_server_error() {
                    tracing::error!(code = err.code(), "Request failed: {}", err);
                }
                (
                    status,
                    json!({
                        "error": { "code": err.code(), "message": err.to_string() },
                        "timestamp": timestamp,
                    }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
