//! Urbanwatch Marker Store
//!
//! Durable, ordered collection of issue markers mirrored to a flat JSON
//! file. The whole file is rewritten on every mutation; writes go through a
//! temp file + rename so a crash mid-write never corrupts prior data. All
//! mutating access is serialized behind one mutex, so concurrent analyze
//! requests cannot lose each other's batch.

use std::path::{Path, PathBuf};

use anyhow::Context;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info};

use urbanwatch_core::{Marker, UrbanError};

/// Flat-file-backed marker collection, insertion order = arrival order.
#[derive(Debug)]
pub struct MarkerStore {
    path: PathBuf,
    markers: Mutex<Vec<Marker>>,
}

impl MarkerStore {
    /// Open the store, loading the durable file if present.
    ///
    /// A missing file yields an empty store; a present but unparseable file
    /// fails with [`UrbanError::CorruptStore`] rather than silently
    /// discarding prior records.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, UrbanError> {
        let path = path.into();
        let markers = match fs::read_to_string(&path).await {
            Ok(raw) => serde_json::from_str::<Vec<Marker>>(&raw)
                .map_err(|_| UrbanError::CorruptStore(path.clone()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                return Err(UrbanError::Storage(format!(
                    "failed to read {}: {e}",
                    path.display()
                )))
            }
        };
        info!(path = %path.display(), count = markers.len(), "Marker store opened");
        Ok(Self {
            path,
            markers: Mutex::new(markers),
        })
    }

    /// Append a batch and rewrite the durable file from the full sequence.
    ///
    /// The mutex is held across append + rewrite; two concurrent callers
    /// serialize here instead of racing on the file.
    pub async fn append_and_persist(&self, batch: Vec<Marker>) -> Result<(), UrbanError> {
        let mut markers = self.markers.lock().await;
        markers.extend(batch);
        persist(&self.path, &markers).await?;
        debug!(total = markers.len(), "Marker store persisted");
        Ok(())
    }

    /// Snapshot of the full sequence in insertion order.
    pub async fn all(&self) -> Vec<Marker> {
        self.markers.lock().await.clone()
    }

    /// Number of markers currently recorded.
    pub async fn len(&self) -> usize {
        self.markers.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Serialize the full sequence, write to a temp file, then rename over the
/// store file so readers never observe a partial write.
async fn persist(path: &Path, markers: &[Marker]) -> Result<(), UrbanError> {
    let run = async {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)
                    .await
                    .with_context(|| format!("failed to create {}", parent.display()))?;
            }
        }
        let json = serde_json::to_string(markers).context("failed to serialize markers")?;
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .await
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path)
            .await
            .with_context(|| format!("failed to rename {} over {}", tmp.display(), path.display()))?;
        Ok::<_, anyhow::Error>(())
    };
    run.await.map_err(|e| UrbanError::Storage(format!("{e:#}")))
}
