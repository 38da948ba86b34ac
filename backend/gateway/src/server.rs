//! Main HTTP gateway server: routing and shared state.

use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use urbanwatch_core::GeocodeProvider;
use urbanwatch_detect::DetectionAdapter;
use urbanwatch_report::ReportRenderer;
use urbanwatch_store::MarkerStore;

use crate::{analyze, markers_api, reports};

/// Upload cap for the multipart body. Smartphone photos routinely exceed
/// axum's 2 MiB default, so the analyze route needs its own limit.
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<MarkerStore>,
    pub detector: Arc<DetectionAdapter>,
    pub geocoder: Arc<dyn GeocodeProvider>,
    pub renderer: Arc<ReportRenderer>,
    pub reports_dir: Arc<PathBuf>,
    /// Externally reachable base URL, used to build report URLs.
    pub public_url: Arc<String>,
}

/// Build the Axum router with all API routes.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/analyze",
            post(analyze::analyze).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/markers.json", get(markers_api::download_markers))
        .route("/generate_report", post(markers_api::generate_report))
        .route("/reports/:filename", get(reports::serve_report))
        .route("/api/health", get(health))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "urbanwatch",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
