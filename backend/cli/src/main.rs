mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::info;

use urbanwatch_detect::{DetectionAdapter, HttpInferenceBackend};
use urbanwatch_gateway::{build_router, AppState};
use urbanwatch_geocode::NominatimGeocoder;
use urbanwatch_report::{ReportRenderer, WkhtmltopdfEngine};
use urbanwatch_store::MarkerStore;

use config::Config;

#[derive(Parser)]
#[command(name = "urbanwatch")]
#[command(about = "Urbanwatch — urban maintenance issue reporting backend")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the urbanwatch HTTP server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Show current server status
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env();

    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            let config = Config {
                port: port.unwrap_or(config.port),
                ..config
            };
            run_server(config).await?;
        }
        Commands::Status => {
            let client = reqwest::Client::new();
            match client
                .get(format!("http://localhost:{}/api/health", config.port))
                .send()
                .await
            {
                Ok(resp) => {
                    let body: serde_json::Value = resp.json().await?;
                    println!("{}", serde_json::to_string_pretty(&body)?);
                }
                Err(_) => {
                    println!("urbanwatch is not running on port {}", config.port);
                }
            }
        }
    }

    Ok(())
}

async fn run_server(config: Config) -> Result<()> {
    info!(
        port = config.port,
        bind = %config.bind_address,
        markers = %config.markers_file,
        reports = %config.reports_dir,
        "Starting urbanwatch"
    );

    let detector_url = config
        .detector_url
        .clone()
        .context("URBANWATCH_DETECTOR_URL must be set to the inference server endpoint")?;

    let store = MarkerStore::open(&config.markers_file).await?;
    let detector = DetectionAdapter::new(Arc::new(HttpInferenceBackend::new(detector_url)));
    let geocoder = NominatimGeocoder::with_base_url(&config.nominatim_url);
    let engine = WkhtmltopdfEngine::new(&config.wkhtmltopdf);
    let reports_dir = PathBuf::from(&config.reports_dir);
    let renderer = ReportRenderer::new(Arc::new(engine), &reports_dir);

    let state = AppState {
        store: Arc::new(store),
        detector: Arc::new(detector),
        geocoder: Arc::new(geocoder),
        renderer: Arc::new(renderer),
        reports_dir: Arc::new(reports_dir),
        public_url: Arc::new(config.public_url.clone()),
    };

    let app = build_router(state).layer(CorsLayer::permissive());
    let addr = format!("{}:{}", config.bind_address, config.port);

    info!(addr = %addr, "HTTP API listening");

    let listener = TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
