//! Hyperliquid Info Client
//!
//! Fetches the spot snapshot with a single `spotMetaAndAssetCtxs` request.
//! The request is never retried.

use super::wire::decode_snapshot;
use crate::domain::market::types::SpotSnapshot;
use crate::domain::ports::SnapshotSource;
use crate::infrastructure::core::http_client_factory::HttpClientFactory;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, info};

pub struct HyperliquidInfoClient {
    client: Client,
    info_url: String,
}

impl HyperliquidInfoClient {
    pub fn new(info_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: HttpClientFactory::create_client(timeout)?,
            info_url: info_url.into(),
        })
    }
}

#[async_trait]
impl SnapshotSource for HyperliquidInfoClient {
    async fn fetch_snapshot(&self) -> Result<SpotSnapshot> {
        info!(
            "HyperliquidInfoClient: Fetching spotMetaAndAssetCtxs from {}",
            self.info_url
        );

        let response = self
            .client
            .post(&self.info_url)
            .json(&json!({ "type": "spotMetaAndAssetCtxs" }))
            .send()
            .await
            .context("Failed to fetch spotMetaAndAssetCtxs from Hyperliquid")?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            anyhow::bail!("Hyperliquid info request failed ({}): {}", status, error_text);
        }

        let payload: Value = response
            .json()
            .await
            .context("Failed to parse Hyperliquid info response")?;
        debug!("HyperliquidInfoClient: response received");

        Ok(decode_snapshot(payload, Utc::now())?)
    }

    fn describe(&self) -> String {
        format!("Hyperliquid info API ({})", self.info_url)
    }
}
