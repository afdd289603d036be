//! Spot market entities parsed from a `spotMetaAndAssetCtxs` snapshot.
//!
//! All numeric feed fields arrive loosely typed (number, numeric string, null,
//! or garbage), so they are carried as `Option<RawNumber>` until the metrics
//! stage coerces them.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A spot token as listed in the snapshot metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub index: u32,
    pub symbol: String,
    pub full_name: String,
}

/// A tradable pair definition from the spot universe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairDefinition {
    pub index: u32,
    pub raw_name: String,
    pub base_token_index: u32,
    pub quote_token_index: u32,
    /// Canonical pairs are keyed by the base symbol in the context feed,
    /// others by `@{index}`.
    pub is_canonical: bool,
}

/// A numeric feed value before coercion.
#[derive(Debug, Clone, PartialEq)]
pub enum RawNumber {
    Number(f64),
    Text(String),
    /// Present in the payload but neither a number nor a string.
    Unsupported,
}

impl RawNumber {
    /// The raw textual representation, if the feed sent a string.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RawNumber::Text(s) => Some(s),
            _ => None,
        }
    }
}

/// Live market data for one coin key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarketContext {
    pub coin_key: String,
    pub mid_price: Option<RawNumber>,
    pub prev_day_price: Option<RawNumber>,
    pub day_volume: Option<RawNumber>,
    pub circulating_supply: Option<RawNumber>,
}

/// One parsed snapshot of spot metadata plus asset contexts.
#[derive(Debug, Clone)]
pub struct SpotSnapshot {
    pub tokens: Vec<Token>,
    pub pairs: Vec<PairDefinition>,
    pub contexts: Vec<MarketContext>,
    pub fetched_at: DateTime<Utc>,
}

/// A pair bound to its live context with derived metrics.
///
/// Built once per run and never mutated afterwards. The diagnostic fields
/// (`context_found`, `tried_keys`, `coin_key_used`) are always populated.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedMarketRow {
    pub display_symbol: String,
    /// `{display_symbol}/{quote}`, or the raw pair name when no display symbol exists.
    pub pair_name: String,
    pub price: Option<f64>,
    pub price_raw: Option<String>,
    pub price_decimals: u32,
    pub change_abs: Option<f64>,
    pub change_pct: Option<f64>,
    pub volume: Option<f64>,
    pub market_cap: Option<f64>,
    pub circulating_supply: Option<f64>,
    pub coin_key_used: String,
    pub context_found: bool,
    pub tried_keys: Vec<String>,
    pub base_symbol_raw: String,
    pub base_full_name: String,
    pub pair_index: u32,
    pub is_canonical: bool,
}

impl ResolvedMarketRow {
    /// The base half of the display pair name.
    pub fn display_base(&self) -> &str {
        self.pair_name
            .split_once('/')
            .map(|(base, _)| base)
            .unwrap_or(&self.pair_name)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub fn row(pair_name: &str, volume: Option<f64>) -> ResolvedMarketRow {
        let display_symbol = pair_name.split('/').next().unwrap_or_default().to_string();
        ResolvedMarketRow {
            display_symbol: display_symbol.clone(),
            pair_name: pair_name.to_string(),
            price: Some(1.0),
            price_raw: Some("1.0".to_string()),
            price_decimals: 1,
            change_abs: None,
            change_pct: None,
            volume,
            market_cap: None,
            circulating_supply: Some(1_000.0),
            coin_key_used: display_symbol.clone(),
            context_found: true,
            tried_keys: vec![display_symbol.clone()],
            base_symbol_raw: display_symbol,
            base_full_name: String::new(),
            pair_index: 0,
            is_canonical: true,
        }
    }
}
