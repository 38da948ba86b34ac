use serde::Deserialize;

/// Urbanwatch runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Durable marker file path
    pub markers_file: String,
    /// Directory for rendered report artifacts
    pub reports_dir: String,
    /// Externally reachable base URL, used to build report URLs
    pub public_url: String,
    /// Inference server endpoint (the model weights live behind it)
    pub detector_url: Option<String>,
    /// wkhtmltopdf binary location
    pub wkhtmltopdf: String,
    /// Nominatim instance base URL
    pub nominatim_url: String,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            markers_file: "markers.json".to_string(),
            reports_dir: "reports".to_string(),
            public_url: "http://localhost:8000".to_string(),
            detector_url: None,
            wkhtmltopdf: "wkhtmltopdf".to_string(),
            nominatim_url: "https://nominatim.openstreetmap.org".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("URBANWATCH_BIND")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("URBANWATCH_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            markers_file: std::env::var("URBANWATCH_MARKERS_FILE")
                .unwrap_or_else(|_| "markers.json".to_string()),
            reports_dir: std::env::var("URBANWATCH_REPORTS_DIR")
                .unwrap_or_else(|_| "reports".to_string()),
            public_url: std::env::var("URBANWATCH_PUBLIC_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            detector_url: std::env::var("URBANWATCH_DETECTOR_URL").ok(),
            wkhtmltopdf: std::env::var("URBANWATCH_WKHTMLTOPDF")
                .unwrap_or_else(|_| "wkhtmltopdf".to_string()),
            nominatim_url: std::env::var("URBANWATCH_NOMINATIM_URL")
                .unwrap_or_else(|_| "https://nominatim.openstreetmap.org".to_string()),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
