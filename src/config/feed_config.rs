//! Snapshot feed configuration parsing from environment variables.

use anyhow::{Context, Result};
use std::env;
use std::time::Duration;
use url::Url;

pub const DEFAULT_INFO_URL: &str = "https://api.hyperliquid.xyz/info";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;

/// Feed endpoint settings
#[derive(Debug, Clone)]
pub struct FeedEnvConfig {
    pub info_url: String,
    pub fetch_timeout: Duration,
}

impl Default for FeedEnvConfig {
    fn default() -> Self {
        Self {
            info_url: DEFAULT_INFO_URL.to_string(),
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
        }
    }
}

impl FeedEnvConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_values(
            env::var("HYPERLIQUID_INFO_URL").ok(),
            env::var("FETCH_TIMEOUT_SECS").ok(),
        )
    }

    /// Builds the config from optional raw values, applying defaults.
    pub fn from_values(info_url: Option<String>, timeout_secs: Option<String>) -> Result<Self> {
        let info_url = info_url.unwrap_or_else(|| DEFAULT_INFO_URL.to_string());
        Url::parse(&info_url)
            .with_context(|| format!("Invalid HYPERLIQUID_INFO_URL: {}", info_url))?;

        let timeout_secs = match timeout_secs {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("Invalid FETCH_TIMEOUT_SECS: {}", raw))?,
            None => DEFAULT_FETCH_TIMEOUT_SECS,
        };
        if timeout_secs == 0 {
            anyhow::bail!("FETCH_TIMEOUT_SECS must be greater than zero");
        }

        Ok(Self {
            info_url,
            fetch_timeout: Duration::from_secs(timeout_secs),
        })
    }
}
