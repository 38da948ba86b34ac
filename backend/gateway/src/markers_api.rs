//! Marker collection endpoints: the durable collection as JSON, and the
//! filtered marker summary as a PDF.

use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use urbanwatch_core::Marker;

use crate::api_error::ApiError;
use crate::server::AppState;

/// Handler for `GET /markers.json` — the full collection, insertion order.
pub async fn download_markers(State(state): State<AppState>) -> Json<Vec<Marker>> {
    Json(state.store.all().await)
}

/// Handler for `POST /generate_report` — render a line-per-marker summary
/// of the caller-supplied records and return the PDF bytes.
pub async fn generate_report(
    State(state): State<AppState>,
    Json(markers): Json<Vec<Marker>>,
) -> Result<Response, ApiError> {
    let pdf = state.renderer.render_marker_summary(&markers).await?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, "application/pdf".parse().unwrap());
    headers.insert(
        header::CONTENT_DISPOSITION,
        "attachment; filename=\"filtered_report.pdf\"".parse().unwrap(),
    );
    Ok((StatusCode::OK, headers, pdf).into_response())
}
