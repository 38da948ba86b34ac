//! Urbanwatch Detection Adapter
//!
//! Normalizes uploaded photos into the detector's input contract: decode,
//! scale to the working resolution, hand pixels to the inference backend,
//! and round confidences for presentation. Detection order is whatever the
//! model yields; it is not sorted here.

use std::sync::Arc;

use image::imageops::FilterType;
use tracing::{debug, info};

use urbanwatch_core::{Detection, InferenceBackend, NormalizedImage, UrbanError};

pub mod http_backend;

pub use http_backend::HttpInferenceBackend;

/// Edge length the model was trained at. Implementation parameter, not part
/// of the external contract.
const WORKING_RESOLUTION: u32 = 640;

/// Wraps the black-box detector with the system's input/output contract.
pub struct DetectionAdapter {
    backend: Arc<dyn InferenceBackend>,
}

impl DetectionAdapter {
    pub fn new(backend: Arc<dyn InferenceBackend>) -> Self {
        Self { backend }
    }

    /// Decode an upload, run inference, and return presentation-ready
    /// detections.
    ///
    /// Empty or undecodable input fails with [`UrbanError::InvalidImage`].
    pub async fn detect(&self, image_bytes: &[u8]) -> Result<Vec<Detection>, UrbanError> {
        if image_bytes.is_empty() {
            return Err(UrbanError::InvalidImage("empty upload".to_string()));
        }
        let decoded = image::load_from_memory(image_bytes)
            .map_err(|e| UrbanError::InvalidImage(e.to_string()))?;
        debug!(
            width = decoded.width(),
            height = decoded.height(),
            "Decoded upload"
        );

        let normalized = normalize(&decoded);
        let mut detections = self.backend.infer(&normalized).await?;
        for d in &mut detections {
            d.confidence = round2(d.confidence);
        }
        info!(
            backend = self.backend.name(),
            count = detections.len(),
            "Detection complete"
        );
        Ok(detections)
    }
}

/// Scale to the working resolution and flatten to tightly packed RGB8.
fn normalize(decoded: &image::DynamicImage) -> NormalizedImage {
    let resized = decoded.resize_exact(WORKING_RESOLUTION, WORKING_RESOLUTION, FilterType::Triangle);
    let rgb = resized.to_rgb8();
    NormalizedImage {
        width: rgb.width(),
        height: rgb.height(),
        pixels: rgb.into_raw(),
    }
}

fn round2(value: f32) -> f32 {
    (value * 100.0).round() / 100.0
}
