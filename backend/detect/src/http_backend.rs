//! HTTP inference backend.
//!
//! The detection model runs out of process behind a small inference server;
//! this backend ships it normalized pixels and parses the detections it
//! returns. The endpoint URL (and with it the model weights) is deployment
//! configuration.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine};
use serde::Deserialize;
use tracing::debug;

use urbanwatch_core::{Detection, InferenceBackend, NormalizedImage, UrbanError};

pub struct HttpInferenceBackend {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Deserialize)]
struct InferResponse {
    detections: Vec<Detection>,
}

impl HttpInferenceBackend {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl InferenceBackend for HttpInferenceBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn infer(&self, image: &NormalizedImage) -> Result<Vec<Detection>, UrbanError> {
        let body = serde_json::json!({
            "width": image.width,
            "height": image.height,
            "pixels": STANDARD.encode(&image.pixels),
        });
        debug!(endpoint = %self.endpoint, "Sending frame to inference server");

        let resp = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| UrbanError::Detector(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(UrbanError::Detector(format!(
                "inference server returned {}",
                resp.status()
            )));
        }

        let parsed: InferResponse = resp
            .json()
            .await
            .map_err(|e| UrbanError::Detector(format!("bad inference response: {e}")))?;
        Ok(parsed.detections)
    }
}
