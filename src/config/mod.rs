//! Configuration module for spotrank.
//!
//! Feed settings come from environment variables; the ranking tables come
//! from their built-in defaults, optionally overridden by a TOML file.

mod feed_config;

pub use feed_config::{DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_INFO_URL, FeedEnvConfig};

use crate::domain::config::RankingTables;
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

pub const DEFAULT_QUOTE_SYMBOL: &str = "USDC";

/// Main application configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub info_url: String,
    pub fetch_timeout: Duration,
    pub quote_symbol: String,
    /// TOML file overriding the built-in ranking tables
    pub ranking_tables_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let feed = FeedEnvConfig::default();
        Self {
            info_url: feed.info_url,
            fetch_timeout: feed.fetch_timeout,
            quote_symbol: DEFAULT_QUOTE_SYMBOL.to_string(),
            ranking_tables_path: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let feed = FeedEnvConfig::from_env().context("Failed to load feed config")?;

        let quote_symbol = env::var("QUOTE_SYMBOL")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|_| DEFAULT_QUOTE_SYMBOL.to_string());
        if quote_symbol.is_empty() {
            anyhow::bail!("QUOTE_SYMBOL must not be empty");
        }

        let ranking_tables_path = env::var("RANKING_TABLES_PATH")
            .ok()
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);

        Ok(Self {
            info_url: feed.info_url,
            fetch_timeout: feed.fetch_timeout,
            quote_symbol,
            ranking_tables_path,
        })
    }
}

/// Built-in tables, or `path` parsed as a (partial) TOML override.
pub fn load_ranking_tables(path: Option<&Path>) -> Result<RankingTables> {
    let Some(path) = path else {
        return Ok(RankingTables::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read ranking tables: {}", path.display()))?;
    let tables = parse_ranking_tables(&content)
        .with_context(|| format!("Invalid ranking tables in {}", path.display()))?;

    info!(
        "Config: loaded ranking tables from {} ({} overrides, {} reference entries)",
        path.display(),
        tables.symbol_overrides.len(),
        tables.reference_ranking.len()
    );
    Ok(tables)
}

/// Parse and validate a TOML tables document. Missing keys keep their defaults.
pub fn parse_ranking_tables(content: &str) -> Result<RankingTables> {
    let parsed: RankingTables = toml::from_str(content).context("Failed to parse TOML")?;
    let declared = parsed.reference_ranking.len();

    let tables = parsed
        .validated()
        .map_err(|e| anyhow::anyhow!("Invalid ranking tables: {}", e))?;

    if tables.reference_ranking.len() != declared {
        warn!(
            "Config: dropped {} duplicate reference ranking entries",
            declared - tables.reference_ranking.len()
        );
    }
    Ok(tables)
}
