use crate::domain::market::types::SpotSnapshot;
use anyhow::Result;
use async_trait::async_trait;

// Need async_trait for async functions in traits
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    /// Fetches one point-in-time spot snapshot. Called at most once per run.
    async fn fetch_snapshot(&self) -> Result<SpotSnapshot>;

    /// Human-readable origin, for logs.
    fn describe(&self) -> String;
}
