//! Mapping from runtime errors to API responses.
//!
//! Every failure surfaces as JSON `{error, kind}` where `kind` is a stable
//! machine-readable code, so callers can distinguish a bad upload from a
//! backend outage without parsing the message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::error;

use urbanwatch_core::UrbanError;

#[derive(Debug)]
pub enum ApiError {
    /// Malformed request: missing multipart field, non-numeric coordinate.
    BadRequest(String),
    /// Pipeline failure, carrying its error kind.
    Runtime(UrbanError),
}

impl From<UrbanError> for ApiError {
    fn from(e: UrbanError) -> Self {
        ApiError::Runtime(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            ApiError::Runtime(e) => {
                let status = match e {
                    UrbanError::InvalidImage(_) => StatusCode::BAD_REQUEST,
                    UrbanError::Detector(_) => StatusCode::BAD_GATEWAY,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                };
                (status, e.kind(), e.to_string())
            }
        };
        error!(kind, error = %message, "Request failed");
        (status, Json(json!({ "error": message, "kind": kind }))).into_response()
    }
}
