use async_trait::async_trait;

use crate::error::UrbanError;
use crate::types::{Detection, NormalizedImage, ResolvedLocation};

/// Seam to the object-detection model.
///
/// The adapter in `urbanwatch-detect` handles decoding and normalization;
/// implementations only see pixels at the working resolution and return raw
/// detections in whatever order the model yields them.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Backend name (e.g. "http", "stub"), for logging.
    fn name(&self) -> &str;

    /// Run inference on a normalized image.
    async fn infer(&self, image: &NormalizedImage) -> Result<Vec<Detection>, UrbanError>;
}

/// Seam to the reverse-geocoding provider.
///
/// Infallible by contract: implementations degrade to
/// [`ResolvedLocation::unknown`] on any provider failure instead of
/// returning an error.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    async fn reverse(&self, lat: f64, lon: f64) -> ResolvedLocation;
}

/// Seam to the document-rendering engine: HTML in, PDF bytes out.
#[async_trait]
pub trait PdfEngine: Send + Sync {
    async fn render(&self, html: &str) -> Result<Vec<u8>, UrbanError>;
}
