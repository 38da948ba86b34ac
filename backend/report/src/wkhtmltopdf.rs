//! PDF engine backed by the wkhtmltopdf binary.
//!
//! HTML goes in on stdin, PDF bytes come out on stdout. The binary location
//! is deployment configuration.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use urbanwatch_core::{PdfEngine, UrbanError};

pub struct WkhtmltopdfEngine {
    binary: String,
}

impl WkhtmltopdfEngine {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

#[async_trait]
impl PdfEngine for WkhtmltopdfEngine {
    async fn render(&self, html: &str) -> Result<Vec<u8>, UrbanError> {
        debug!(binary = %self.binary, bytes = html.len(), "Rendering HTML to PDF");

        // "-" for both input and output: stdin HTML, stdout PDF.
        let mut child = tokio::process::Command::new(&self.binary)
            .args(["--quiet", "-", "-"])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| UrbanError::Render(format!("failed to spawn {}: {e}", self.binary)))?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| UrbanError::Render("wkhtmltopdf stdin unavailable".to_string()))?;
        stdin
            .write_all(html.as_bytes())
            .await
            .map_err(|e| UrbanError::Render(format!("failed to feed wkhtmltopdf: {e}")))?;
        drop(stdin);

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| UrbanError::Render(format!("wkhtmltopdf did not exit cleanly: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(UrbanError::Render(format!(
                "wkhtmltopdf exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }
        Ok(output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn missing_binary_is_a_render_error() {
        let engine = WkhtmltopdfEngine::new("/nonexistent/wkhtmltopdf");
        let err = engine.render("<p>hi</p>").await.unwrap_err();
        assert!(matches!(err, UrbanError::Render(_)));
    }
}
