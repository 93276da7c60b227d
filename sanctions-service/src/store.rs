//! Single-slot snapshot persistence
//!
//! The slot holds the latest snapshot as pretty-printed JSON. Every save
//! replaces the previous content; nothing is versioned or appended.

use crate::error::{Result, ServiceError};
use crate::types::Snapshot;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the slot; `Ok(None)` when nothing was ever saved
    pub async fn load(&self) -> Result<Option<Snapshot>> {
        let raw = match tokio::fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No snapshot at {}", self.path.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let snapshot: Snapshot = serde_json::from_slice(&raw)?;
        snapshot
            .check_consistency()
            .map_err(ServiceError::CorruptSnapshot)?;

        info!(
            "📂 Loaded snapshot from {} ({} entities)",
            self.path.display(),
            snapshot.total_entities
        );
        Ok(Some(snapshot))
    }

    /// Overwrite the slot. The file is written beside the slot and renamed
    /// over it, so a reader sees either the old or the new snapshot.
    pub async fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }

        let json = serde_json::to_vec_pretty(snapshot)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;

        debug!("Wrote {} bytes to {}", json.len(), self.path.display());
        Ok(())
    }
}
