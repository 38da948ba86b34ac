//! Urbanwatch Report Renderer
//!
//! Builds the HTML report documents and pipes them through the PDF engine.
//! Analysis reports are written under the reports directory with a unique
//! per-request name so concurrent requests never clobber each other's
//! artifact.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use tokio::fs;
use tracing::info;
use uuid::Uuid;

use urbanwatch_core::{Detection, Marker, PdfEngine, UrbanError};

pub mod wkhtmltopdf;

pub use wkhtmltopdf::WkhtmltopdfEngine;

pub struct ReportRenderer {
    engine: Arc<dyn PdfEngine>,
    reports_dir: PathBuf,
}

impl ReportRenderer {
    pub fn new(engine: Arc<dyn PdfEngine>, reports_dir: impl Into<PathBuf>) -> Self {
        Self {
            engine,
            reports_dir: reports_dir.into(),
        }
    }

    /// Render the per-upload analysis report and write it under the reports
    /// directory. Returns the artifact filename.
    pub async fn render_analysis(
        &self,
        detections: &[Detection],
        suggestions: &str,
        address: &str,
    ) -> Result<String, UrbanError> {
        let html = analysis_html(detections, suggestions, address);
        let pdf = self.engine.render(&html).await?;

        let filename = format!("report-{}.pdf", Uuid::new_v4());
        let write = async {
            fs::create_dir_all(&self.reports_dir)
                .await
                .with_context(|| format!("failed to create {}", self.reports_dir.display()))?;
            let path = self.reports_dir.join(&filename);
            fs::write(&path, pdf)
                .await
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok::<_, anyhow::Error>(())
        };
        write
            .await
            .map_err(|e| UrbanError::Render(format!("{e:#}")))?;

        info!(filename = %filename, "Analysis report written");
        Ok(filename)
    }

    /// Render the line-per-marker summary document and return its bytes.
    pub async fn render_marker_summary(&self, markers: &[Marker]) -> Result<Vec<u8>, UrbanError> {
        let html = summary_html(markers);
        self.engine.render(&html).await
    }
}

fn analysis_html(detections: &[Detection], suggestions: &str, address: &str) -> String {
    let items: String = detections
        .iter()
        .map(|d| format!("<li>{} ({:.2})</li>", d.label, d.confidence))
        .collect();
    format!(
        "<h1>Urban Maintenance Report</h1>\n\
         <p><strong>Location:</strong> {}</p>\n\
         <h2>Detected Issues:</h2>\n\
         <ul>{}</ul>\n\
         <h2>Suggested Actions:</h2>\n\
         <p>{}</p>",
        escape_html(address),
        items,
        escape_html(suggestions),
    )
}

fn summary_html(markers: &[Marker]) -> String {
    let lines: String = markers
        .iter()
        .map(|m| {
            format!(
                "<p>{} - {} in {}</p>\n",
                escape_html(&m.timestamp),
                m.label.as_str().to_uppercase(),
                escape_html(&m.city),
            )
        })
        .collect();
    format!("<h1>Marker Summary</h1>\n{lines}")
}

/// Minimal escaping for text interpolated into the report markup.
fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
