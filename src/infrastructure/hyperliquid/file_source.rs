use super::wire::decode_snapshot;
use crate::domain::market::types::SpotSnapshot;
use crate::domain::ports::SnapshotSource;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::Value;
use std::path::PathBuf;
use tracing::info;

/// Reads a saved `spotMetaAndAssetCtxs` response from disk.
pub struct FileSnapshotSource {
    path: PathBuf,
}

impl FileSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SnapshotSource for FileSnapshotSource {
    async fn fetch_snapshot(&self) -> Result<SpotSnapshot> {
        let content = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read snapshot file {:?}", self.path))?;
        let payload: Value =
            serde_json::from_str(&content).context("Failed to parse snapshot JSON")?;

        info!("Loaded snapshot from {:?}", self.path);
        Ok(decode_snapshot(payload, Utc::now())?)
    }

    fn describe(&self) -> String {
        format!("snapshot file {}", self.path.display())
    }
}
