//! Ranking Tables Domain Value Object
//!
//! Every lookup table the ranking pipeline consults: display-symbol
//! overrides, stable-asset disambiguation markers, wrapped-asset names,
//! default exclusions, the stable allow-list, and the reference ranking.
//!
//! # Design Principles
//!
//! - **Immutability**: Built once at startup and passed by reference into
//!   the components that need it
//! - **Overridable**: Any subset may be replaced from a TOML file; missing
//!   keys keep the built-in values (`#[serde(default)]`)
//! - **Self-Validation**: `validated()` rejects tables the rule chain cannot use

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use thiserror::Error;

/// Error type for RankingTables validation
#[derive(Debug, Error, PartialEq)]
pub enum RankingTablesError {
    #[error("Invalid minimum capitalized run length: {value}. Must be positive")]
    InvalidRunLength { value: usize },

    #[error("Stable marker for {display} has no substrings to match")]
    EmptyStableMarker { display: String },

    #[error("Invalid {field}: must not be empty")]
    EmptyField { field: String },
}

/// One entry of the generic-stable disambiguation list.
///
/// If any of `needles` occurs (case-insensitively) in the token's full name,
/// the token displays as `display`. Entries are tried in list order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StableMarker {
    pub needles: Vec<String>,
    pub display: String,
}

impl StableMarker {
    fn new(needles: &[&str], display: &str) -> Self {
        Self {
            needles: needles.iter().map(|n| n.to_string()).collect(),
            display: display.to_string(),
        }
    }
}

/// Lookup tables driving symbol mapping, filtering, and reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingTables {
    /// Raw token symbol -> display symbol. Checked before every heuristic.
    pub symbol_overrides: BTreeMap<String, String>,

    /// The raw symbol shared by several distinct stable assets.
    pub stable_placeholder: String,

    /// Ordered disambiguation markers for `stable_placeholder` tokens.
    pub stable_markers: Vec<StableMarker>,

    /// Full-name prefix of wrapped assets (e.g. "Unit Bitcoin").
    pub wrapped_prefix: String,

    /// Underlying full name -> display symbol, used after `wrapped_prefix`.
    pub wrapped_names: BTreeMap<String, String>,

    /// Marker character preceding a ticker in full names (e.g. `$PEPE`).
    pub ticker_marker: char,

    /// Minimum length of an all-caps run to be taken as a ticker.
    pub min_capitalized_run: usize,

    /// Raw base symbols dropped from the ranking unless defaults are disabled.
    pub default_exclusions: Vec<String>,

    /// Display pair names kept in heuristic mode despite having no supply.
    pub stable_allow_list: Vec<String>,

    /// Authoritative display-pair order used for reconciliation.
    pub reference_ranking: Vec<String>,
}

impl Default for RankingTables {
    fn default() -> Self {
        let symbol_overrides = [
            ("UBTC", "BTC"),
            ("UETH", "ETH"),
            ("USOL", "SOL"),
            ("UPUMP", "PUMP"),
            ("UBONK", "BONK"),
            ("UMON", "MON"),
            ("MON", "MONPRO"),
            ("UFART", "FARTCOIN"),
            ("UXPL", "XPL"),
            ("UENA", "ENA"),
            ("HPENGU", "PENGU"),
            ("UDZ", "2Z"),
            ("FXRP", "XRP"),
            ("USDE", "USDE"),
            ("FEUSD", "FEUSD"),
            ("USDHL", "USDHL"),
            ("MMOVE", "MOVE"),
            ("USDT0", "USDT"),
            ("XAUT0", "XAUT"),
            ("LINK0", "LINK"),
            ("TRX0", "TRX"),
            ("AAVE0", "AAVE"),
            ("AVAX0", "AVAX"),
            ("PEPE0", "PEPE"),
            ("BNB1", "BNB"),
            ("XMR1", "XMR"),
        ]
        .into_iter()
        .map(|(raw, display)| (raw.to_string(), display.to_string()))
        .collect();

        let wrapped_names = [
            ("Bitcoin", "BTC"),
            ("Ethereum", "ETH"),
            ("Solana", "SOL"),
            ("Pump Fun", "PUMP"),
            ("Bonk", "BONK"),
        ]
        .into_iter()
        .map(|(name, display)| (name.to_string(), display.to_string()))
        .collect();

        Self {
            symbol_overrides,
            stable_placeholder: "USD".to_string(),
            stable_markers: vec![
                StableMarker::new(&["USDE", "ETHENA"], "USDE"),
                StableMarker::new(&["FEUSD"], "FEUSD"),
                StableMarker::new(&["USDH"], "USDHL"),
            ],
            wrapped_prefix: "Unit ".to_string(),
            wrapped_names,
            ticker_marker: '$',
            min_capitalized_run: 3,
            default_exclusions: ["XMR1", "NOCEX", "FXRP", "BZEC", "PUP", "AAVE0", "LINK0"]
                .into_iter()
                .map(String::from)
                .collect(),
            stable_allow_list: [
                "USDH/USDC",
                "USDT/USDC",
                "USDE/USDC",
                "FEUSD/USDC",
                "USDHL/USDC",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            reference_ranking: default_reference_ranking(),
        }
    }
}

impl RankingTables {
    /// Validate the tables and normalize the reference ranking.
    ///
    /// # Errors
    ///
    /// Returns `RankingTablesError` if the rule chain cannot use the tables.
    pub fn validated(mut self) -> Result<Self, RankingTablesError> {
        if self.min_capitalized_run == 0 {
            return Err(RankingTablesError::InvalidRunLength {
                value: self.min_capitalized_run,
            });
        }
        if self.stable_placeholder.is_empty() {
            return Err(RankingTablesError::EmptyField {
                field: "stable_placeholder".to_string(),
            });
        }
        if let Some(marker) = self
            .stable_markers
            .iter()
            .find(|m| m.needles.iter().all(|n| n.is_empty()))
        {
            return Err(RankingTablesError::EmptyStableMarker {
                display: marker.display.clone(),
            });
        }

        self.reference_ranking = dedup_preserving_order(self.reference_ranking);
        Ok(self)
    }
}

/// Keeps the first occurrence of each entry.
pub fn dedup_preserving_order(entries: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(entries.len());
    entries
        .into_iter()
        .filter(|entry| seen.insert(entry.clone()))
        .collect()
}

/// Spot -> USDC market order as displayed by the exchange web UI.
fn default_reference_ranking() -> Vec<String> {
    [
        "HYPE/USDC",
        "BTC/USDC",
        "USDH/USDC",
        "ETH/USDC",
        "SOL/USDC",
        "PUMP/USDC",
        "PURR/USDC",
        "USDT/USDC",
        "XAUT/USDC",
        "FARTCOIN/USDC",
        "USDE/USDC",
        "XPL/USDC",
        "FEUSD/USDC",
        "HFUN/USDC",
        "MON/USDC",
        "JEFF/USDC",
        "ENA/USDC",
        "SPX/USDC",
        "HAR/USDC",
        "PENGU/USDC",
        "2Z/USDC",
        "PIP/USDC",
        "USDHL/USDC",
        "ATEHUN/USDC",
        "CATBAL/USDC",
        "LIQD/USDC",
        "BONK/USDC",
        "SEDA/USDC",
        "BUDDY/USDC",
        "STABLE/USDC",
        "POINTS/USDC",
        "SCHIZO/USDC",
        "RUB/USDC",
        "MOVE/USDC",
        "OMNIX/USDC",
        "SOLV/USDC",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let tables = RankingTables::default().validated().unwrap();
        assert_eq!(tables.symbol_overrides["UBTC"], "BTC");
        assert_eq!(tables.stable_markers[0].display, "USDE");
        assert_eq!(tables.reference_ranking.first().unwrap(), "HYPE/USDC");
        assert_eq!(tables.reference_ranking.len(), 36);
    }

    #[test]
    fn test_validated_dedups_reference_ranking() {
        let tables = RankingTables {
            reference_ranking: vec![
                "BTC/USDC".to_string(),
                "ETH/USDC".to_string(),
                "BTC/USDC".to_string(),
            ],
            ..Default::default()
        }
        .validated()
        .unwrap();

        assert_eq!(tables.reference_ranking, vec!["BTC/USDC", "ETH/USDC"]);
    }

    #[test]
    fn test_zero_run_length_rejected() {
        let result = RankingTables {
            min_capitalized_run: 0,
            ..Default::default()
        }
        .validated();

        assert_eq!(
            result.unwrap_err(),
            RankingTablesError::InvalidRunLength { value: 0 }
        );
    }

    #[test]
    fn test_marker_without_needles_rejected() {
        let result = RankingTables {
            stable_markers: vec![StableMarker {
                needles: vec![String::new()],
                display: "USDX".to_string(),
            }],
            ..Default::default()
        }
        .validated();

        assert!(matches!(
            result,
            Err(RankingTablesError::EmptyStableMarker { ref display }) if display == "USDX"
        ));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let tables: RankingTables = toml::from_str(
            r#"
            default_exclusions = ["SPAM"]

            [symbol_overrides]
            UBTC = "XBT"
            "#,
        )
        .unwrap();

        assert_eq!(tables.default_exclusions, vec!["SPAM"]);
        assert_eq!(tables.symbol_overrides.len(), 1);
        assert_eq!(tables.ticker_marker, '$');
        assert_eq!(tables.stable_placeholder, "USD");
    }
}
