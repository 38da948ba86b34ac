use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the urbanwatch runtime.
#[derive(Debug, Error)]
pub enum UrbanError {
    #[error("invalid image upload: {0}")]
    InvalidImage(String),

    #[error("marker store at {} is corrupt", .0.display())]
    CorruptStore(PathBuf),

    #[error("report rendering failed: {0}")]
    Render(String),

    #[error("detector backend error: {0}")]
    Detector(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl UrbanError {
    /// Stable machine-readable code, surfaced to API callers so they can
    /// distinguish failure kinds without parsing the message.
    pub fn kind(&self) -> &'static str {
        match self {
            UrbanError::InvalidImage(_) => "invalid_image",
            UrbanError::CorruptStore(_) => "corrupt_store",
            UrbanError::Render(_) => "render",
            UrbanError::Detector(_) => "detector",
            UrbanError::Storage(_) => "storage",
            UrbanError::Other(_) => "internal",
        }
    }
}
