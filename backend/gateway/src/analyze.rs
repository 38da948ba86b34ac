//! The analyze orchestrator: one linear pipeline per upload.
//!
//! receive → detect → suggest → geocode → render → record → respond.
//! Any failure aborts the whole request; a request that fails after
//! detection appends no markers.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use tracing::{info, instrument};

use urbanwatch_core::suggest::suggestions_for;
use urbanwatch_core::{Detection, Marker};

use crate::api_error::ApiError;
use crate::server::AppState;

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub detections: Vec<Detection>,
    pub suggestions: String,
    pub report_url: String,
    pub address: String,
    pub city: String,
}

/// Handler for `POST /analyze` (multipart: `image`, `lat`, `lon`).
pub async fn analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, ApiError> {
    let upload = AnalyzeUpload::from_multipart(multipart).await?;
    let response = run_analysis(&state, &upload.image, upload.lat, upload.lon).await?;
    Ok(Json(response))
}

/// Parsed multipart input for one analyze request.
struct AnalyzeUpload {
    image: Vec<u8>,
    lat: f64,
    lon: f64,
}

impl AnalyzeUpload {
    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut image: Option<Vec<u8>> = None;
        let mut lat: Option<f64> = None;
        let mut lon: Option<f64> = None;

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::BadRequest(format!("malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "image" => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::BadRequest(format!("failed to read image: {e}")))?;
                    image = Some(bytes.to_vec());
                }
                "lat" => lat = Some(parse_coord(field, "lat").await?),
                "lon" => lon = Some(parse_coord(field, "lon").await?),
                other => {
                    return Err(ApiError::BadRequest(format!(
                        "unexpected multipart field: {other}"
                    )))
                }
            }
        }

        Ok(Self {
            image: image.ok_or_else(|| ApiError::BadRequest("missing field: image".into()))?,
            lat: lat.ok_or_else(|| ApiError::BadRequest("missing field: lat".into()))?,
            lon: lon.ok_or_else(|| ApiError::BadRequest("missing field: lon".into()))?,
        })
    }
}

async fn parse_coord(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<f64, ApiError> {
    let text = field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read {name}: {e}")))?;
    text.trim()
        .parse::<f64>()
        .map_err(|_| ApiError::BadRequest(format!("{name} is not numeric: {text}")))
}

/// Run the full pipeline for one validated upload.
#[instrument(skip(state, image), fields(image_bytes = image.len()))]
pub async fn run_analysis(
    state: &AppState,
    image: &[u8],
    lat: f64,
    lon: f64,
) -> Result<AnalyzeResponse, ApiError> {
    let detections = state.detector.detect(image).await?;
    let suggestions = suggestions_for(&detections);

    let location = state.geocoder.reverse(lat, lon).await;

    let filename = state
        .renderer
        .render_analysis(&detections, &suggestions, &location.address)
        .await?;

    let markers = Marker::batch(lat, lon, &location.city, &detections);
    let appended = markers.len();
    state.store.append_and_persist(markers).await?;

    info!(
        detections = detections.len(),
        markers = appended,
        city = %location.city,
        "Analyze request recorded"
    );

    Ok(AnalyzeResponse {
        detections,
        suggestions,
        report_url: format!("{}/reports/{}", state.public_url, filename),
        address: location.address,
        city: location.city,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use tower::ServiceExt;
    use urbanwatch_core::{IssueLabel, ResolvedLocation, UrbanError};

    use crate::server::build_router;
    use crate::test_support::{large_png_fixture, png_fixture, test_state};

    fn two_detections() -> Vec<Detection> {
        vec![
            Detection {
                label: IssueLabel::Pothole,
                confidence: 0.9,
            },
            Detection {
                label: IssueLabel::Graffiti,
                confidence: 0.6,
            },
        ]
    }

    #[tokio::test]
    async fn markers_appended_equal_detections_returned() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(
            dir.path(),
            two_detections(),
            Some(ResolvedLocation {
                address: "Via Roma 1, Milan".into(),
                city: "Milan".into(),
            }),
        )
        .await;

        let resp = run_analysis(&state, &png_fixture(), 45.0, 9.0).await.unwrap();

        assert_eq!(resp.detections.len(), 2);
        assert_eq!(state.store.len().await, 2);
        assert_eq!(resp.city, "Milan");
        assert!(resp.report_url.starts_with("http://localhost:8000/reports/report-"));
        assert!(resp.report_url.ends_with(".pdf"));
    }

    #[tokio::test]
    async fn geocode_fallback_still_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), two_detections(), None).await;

        let resp = run_analysis(&state, &png_fixture(), 0.0, 0.0).await.unwrap();

        assert_eq!(resp.address, "Unknown location");
        assert_eq!(resp.city, "Unknown");
        let markers = state.store.all().await;
        assert!(markers.iter().all(|m| m.city == "Unknown"));
    }

    #[tokio::test]
    async fn invalid_image_appends_no_markers() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), two_detections(), None).await;

        let err = run_analysis(&state, b"", 45.0, 9.0).await.unwrap_err();

        assert!(matches!(
            err,
            ApiError::Runtime(UrbanError::InvalidImage(_))
        ));
        assert!(state.store.is_empty().await);
    }

    fn multipart_request(image: &[u8], lat: &str, lon: &str) -> Request<Body> {
        let boundary = "urbanwatch-test-boundary";
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{boundary}\r\nContent-Disposition: form-data; name=\"image\"; \
                 filename=\"photo.png\"\r\nContent-Type: image/png\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(image);
        body.extend_from_slice(
            format!(
                "\r\n--{boundary}\r\nContent-Disposition: form-data; name=\"lat\"\r\n\r\n{lat}\
                 \r\n--{boundary}\r\nContent-Disposition: form-data; name=\"lon\"\r\n\r\n{lon}\
                 \r\n--{boundary}--\r\n"
            )
            .as_bytes(),
        );
        Request::builder()
            .method("POST")
            .uri("/analyze")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn photo_larger_than_two_mebibytes_is_analyzed() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), two_detections(), None).await;
        let app = build_router(state.clone());

        let png = large_png_fixture(3 * 1024 * 1024);
        assert!(png.len() > 2 * 1024 * 1024);

        let response = app
            .oneshot(multipart_request(&png, "45.0", "9.0"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(state.store.len().await, 2);
    }

    #[tokio::test]
    async fn concurrent_requests_keep_both_batches() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path(), two_detections(), None).await;

        let image = png_fixture();
        let (a, b) = tokio::join!(
            run_analysis(&state, &image, 45.0, 9.0),
            run_analysis(&state, &image, 46.0, 10.0),
        );
        a.unwrap();
        b.unwrap();

        assert_eq!(state.store.len().await, 4);
    }
}
