//! Serves rendered report artifacts from the reports directory.

use axum::extract::{Path, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use tokio::fs;
use tracing::{debug, warn};

use crate::server::AppState;

/// Handler for `GET /reports/:filename` — stream a rendered report.
pub async fn serve_report(
    Path(filename): Path<String>,
    State(state): State<AppState>,
) -> Response {
    // Basic path sanitization: reject traversal.
    if filename.contains("..") || filename.contains('/') || filename.contains('\\') {
        warn!(filename = %filename, "Rejected suspicious report path");
        return (StatusCode::BAD_REQUEST, "Invalid filename").into_response();
    }

    let path = state.reports_dir.join(&filename);
    debug!(path = %path.display(), "Serving report artifact");

    match fs::read(&path).await {
        Ok(bytes) => {
            let mut headers = HeaderMap::new();
            headers.insert(header::CONTENT_TYPE, "application/pdf".parse().unwrap());
            // Artifact names are uuid-generated ASCII, but a hand-placed
            // file with exotic bytes must not panic the handler.
            let disposition = format!("inline; filename=\"{filename}\"")
                .parse()
                .unwrap_or_else(|_| header::HeaderValue::from_static("inline"));
            headers.insert(header::CONTENT_DISPOSITION, disposition);
            (StatusCode::OK, headers, bytes).into_response()
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            (StatusCode::NOT_FOUND, "Report not found").into_response()
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to read report artifact");
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to read report").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::State;

    use crate::test_support::test_state;

    async fn state_with_artifact(
        dir: &std::path::Path,
        filename: &str,
        bytes: &[u8],
    ) -> crate::server::AppState {
        let state = test_state(dir, vec![], None).await;
        std::fs::create_dir_all(state.reports_dir.as_path()).unwrap();
        std::fs::write(state.reports_dir.join(filename), bytes).unwrap();
        state
    }

    #[tokio::test]
    async fn existing_artifact_is_served_as_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_artifact(dir.path(), "report-abc.pdf", b"%PDF-1.4").await;

        let resp = serve_report(Path("report-abc.pdf".to_string()), State(state)).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            "application/pdf"
        );
    }

    #[tokio::test]
    async fn traversal_filenames_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), vec![], None).await;

        for filename in ["../markers.json", "a/b.pdf", "a\\b.pdf"] {
            let resp = serve_report(Path(filename.to_string()), State(state.clone())).await;
            assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{filename}");
        }
    }

    #[tokio::test]
    async fn missing_artifact_is_404() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), vec![], None).await;

        let resp = serve_report(Path("report-missing.pdf".to_string()), State(state)).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn non_ascii_artifact_name_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let state = state_with_artifact(dir.path(), "repört.pdf", b"%PDF-1.4").await;

        let resp = serve_report(Path("repört.pdf".to_string()), State(state)).await;

        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers().get(header::CONTENT_DISPOSITION).unwrap(),
            "inline"
        );
    }
}
