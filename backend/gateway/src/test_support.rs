//! Shared fixtures for gateway tests: stub collaborators and state builders.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;

use urbanwatch_core::{
    Detection, GeocodeProvider, InferenceBackend, NormalizedImage, PdfEngine, ResolvedLocation,
    UrbanError,
};
use urbanwatch_detect::DetectionAdapter;
use urbanwatch_report::ReportRenderer;
use urbanwatch_store::MarkerStore;

use crate::server::AppState;

pub struct StubBackend {
    pub detections: Vec<Detection>,
}

#[async_trait]
impl InferenceBackend for StubBackend {
    fn name(&self) -> &str {
        "stub"
    }
    async fn infer(&self, _image: &NormalizedImage) -> Result<Vec<Detection>, UrbanError> {
        Ok(self.detections.clone())
    }
}

pub struct StubGeocoder {
    pub location: Option<ResolvedLocation>,
}

#[async_trait]
impl GeocodeProvider for StubGeocoder {
    async fn reverse(&self, _lat: f64, _lon: f64) -> ResolvedLocation {
        self.location
            .clone()
            .unwrap_or_else(ResolvedLocation::unknown)
    }
}

pub struct StubEngine;

#[async_trait]
impl PdfEngine for StubEngine {
    async fn render(&self, html: &str) -> Result<Vec<u8>, UrbanError> {
        Ok(html.as_bytes().to_vec())
    }
}

/// Build an [`AppState`] over a temp directory with stubbed collaborators.
pub async fn test_state(
    dir: &Path,
    detections: Vec<Detection>,
    location: Option<ResolvedLocation>,
) -> AppState {
    let reports_dir: PathBuf = dir.join("reports");
    let store = MarkerStore::open(dir.join("markers.json")).await.unwrap();
    AppState {
        store: Arc::new(store),
        detector: Arc::new(DetectionAdapter::new(Arc::new(StubBackend { detections }))),
        geocoder: Arc::new(StubGeocoder { location }),
        renderer: Arc::new(ReportRenderer::new(Arc::new(StubEngine), &reports_dir)),
        reports_dir: Arc::new(reports_dir),
        public_url: Arc::new("http://localhost:8000".to_string()),
    }
}

/// Small solid-color PNG that decodes cleanly.
pub fn png_fixture() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(8, 8, image::Rgb([90, 90, 90]));
    encode_png(img)
}

/// Hash-noise PNG larger than the given byte size; noise defeats the PNG
/// filter compression so the encoded size stays close to the raw size.
pub fn large_png_fixture(min_bytes: usize) -> Vec<u8> {
    let mut side = 1024u32;
    loop {
        let img = image::RgbImage::from_fn(side, side, |x, y| {
            let mut v = x.wrapping_mul(0x9E37_79B9) ^ y.wrapping_mul(0x85EB_CA6B);
            v ^= v >> 15;
            v = v.wrapping_mul(0x2C1B_3C6D);
            v ^= v >> 12;
            image::Rgb([v as u8, (v >> 8) as u8, (v >> 16) as u8])
        });
        let bytes = encode_png(img);
        if bytes.len() > min_bytes {
            return bytes;
        }
        side *= 2;
    }
}

fn encode_png(img: image::RgbImage) -> Vec<u8> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut std::io::Cursor::new(&mut bytes), image::ImageFormat::Png)
        .unwrap();
    bytes
}
