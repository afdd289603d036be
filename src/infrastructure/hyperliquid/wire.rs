//! Wire format of the `spotMetaAndAssetCtxs` info response.
//!
//! ```text
//! [ {"tokens": [...], "universe": [...]}, [ {"coin": ..., "midPx": ...}, ... ] ]
//! ```
//!
//! Only the top-level shape is fatal. Individual tokens, pairs, and contexts
//! that fail to decode are skipped.

use crate::domain::errors::SnapshotError;
use crate::domain::market::types::{MarketContext, PairDefinition, RawNumber, SpotSnapshot, Token};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde::de::IgnoredAny;
use serde_json::Value;
use tracing::{debug, info, warn};

#[derive(Debug, Deserialize)]
struct SpotMeta {
    tokens: Vec<Value>,
    universe: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TokenEntry {
    index: Option<u32>,
    name: Option<String>,
    #[serde(rename = "fullName")]
    full_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UniverseEntry {
    index: Option<u32>,
    name: Option<String>,
    tokens: Option<Vec<u32>>,
    #[serde(rename = "isCanonical")]
    is_canonical: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireNumber {
    Number(f64),
    Text(String),
    Other(IgnoredAny),
}

impl From<WireNumber> for RawNumber {
    fn from(value: WireNumber) -> Self {
        match value {
            WireNumber::Number(n) => RawNumber::Number(n),
            WireNumber::Text(s) => RawNumber::Text(s),
            WireNumber::Other(_) => RawNumber::Unsupported,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssetCtxEntry {
    coin: Option<String>,
    #[serde(rename = "midPx", default)]
    mid_px: Option<WireNumber>,
    #[serde(rename = "prevDayPx", default)]
    prev_day_px: Option<WireNumber>,
    #[serde(rename = "dayNtlVlm", default)]
    day_ntl_vlm: Option<WireNumber>,
    #[serde(rename = "circulatingSupply", default)]
    circulating_supply: Option<WireNumber>,
}

/// Decodes a raw info payload into a domain snapshot.
pub fn decode_snapshot(
    payload: Value,
    fetched_at: DateTime<Utc>,
) -> Result<SpotSnapshot, SnapshotError> {
    let (meta, contexts): (SpotMeta, Vec<Value>) =
        serde_json::from_value(payload).map_err(|e| SnapshotError::MalformedSnapshot {
            reason: format!("expected [spotMeta, assetCtxs]: {}", e),
        })?;

    let tokens: Vec<Token> = meta.tokens.into_iter().filter_map(decode_token).collect();
    let pairs: Vec<PairDefinition> = meta.universe.into_iter().filter_map(decode_pair).collect();

    let raw_ctx_count = contexts.len();
    let contexts: Vec<MarketContext> = contexts.into_iter().filter_map(decode_context).collect();
    if contexts.len() < raw_ctx_count {
        warn!(
            "Snapshot: skipped {} asset contexts without a usable coin key",
            raw_ctx_count - contexts.len()
        );
    }

    info!(
        "Snapshot: decoded {} tokens, {} pairs, {} asset contexts",
        tokens.len(),
        pairs.len(),
        contexts.len()
    );

    Ok(SpotSnapshot {
        tokens,
        pairs,
        contexts,
        fetched_at,
    })
}

fn decode_token(value: Value) -> Option<Token> {
    let entry: TokenEntry = serde_json::from_value(value)
        .inspect_err(|e| debug!("Snapshot: skipping undecodable token: {}", e))
        .ok()?;
    let Some(index) = entry.index else {
        debug!("Snapshot: skipping token without index ({:?})", entry.name);
        return None;
    };

    Some(Token {
        index,
        symbol: entry.name.unwrap_or_default(),
        full_name: entry.full_name.unwrap_or_default(),
    })
}

fn decode_pair(value: Value) -> Option<PairDefinition> {
    let entry: UniverseEntry = serde_json::from_value(value)
        .inspect_err(|e| debug!("Snapshot: skipping undecodable pair: {}", e))
        .ok()?;

    let raw_name = entry.name.filter(|n| !n.is_empty());
    match (entry.index, raw_name, entry.tokens.as_deref()) {
        (Some(index), Some(raw_name), Some(&[base, quote])) => Some(PairDefinition {
            index,
            raw_name,
            base_token_index: base,
            quote_token_index: quote,
            is_canonical: entry.is_canonical.unwrap_or(false),
        }),
        (index, name, tokens) => {
            debug!(
                "Snapshot: skipping pair definition (index: {:?}, name: {:?}, tokens: {:?})",
                index, name, tokens
            );
            None
        }
    }
}

fn decode_context(value: Value) -> Option<MarketContext> {
    let entry: AssetCtxEntry = serde_json::from_value(value).ok()?;
    let coin_key = entry.coin.filter(|c| !c.is_empty())?;

    Some(MarketContext {
        coin_key,
        mid_price: entry.mid_px.map(RawNumber::from),
        prev_day_price: entry.prev_day_px.map(RawNumber::from),
        day_volume: entry.day_ntl_vlm.map(RawNumber::from),
        circulating_supply: entry.circulating_supply.map(RawNumber::from),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload() -> Value {
        json!([
            {
                "tokens": [
                    {"index": 0, "name": "USDC", "fullName": null},
                    {"index": 1, "name": "PURR", "fullName": "Purr"},
                    {"name": "NOINDEX"}
                ],
                "universe": [
                    {"index": 0, "name": "PURR/USDC", "tokens": [1, 0], "isCanonical": true},
                    {"index": 5, "name": "@5", "tokens": [1]},
                    {"index": 6, "name": "", "tokens": [1, 0]},
                    {"index": 7, "name": "@7", "tokens": [2, 0]}
                ]
            },
            [
                {
                    "coin": "PURR",
                    "midPx": "0.2",
                    "prevDayPx": 0.19,
                    "dayNtlVlm": "1000.5",
                    "circulatingSupply": true
                },
                {"coin": "@7", "midPx": null},
                {"midPx": "1.0"},
                "garbage"
            ]
        ])
    }

    #[test]
    fn test_decode_keeps_usable_entries() {
        let snapshot = decode_snapshot(payload(), Utc::now()).unwrap();

        assert_eq!(snapshot.tokens.len(), 2);
        assert_eq!(snapshot.tokens[0].full_name, "");

        let pair_indices: Vec<u32> = snapshot.pairs.iter().map(|p| p.index).collect();
        assert_eq!(pair_indices, vec![0, 7]);
        assert!(snapshot.pairs[0].is_canonical);
        assert!(!snapshot.pairs[1].is_canonical);

        assert_eq!(snapshot.contexts.len(), 2);
        let purr = &snapshot.contexts[0];
        assert_eq!(purr.mid_price, Some(RawNumber::Text("0.2".to_string())));
        assert_eq!(purr.prev_day_price, Some(RawNumber::Number(0.19)));
        assert_eq!(purr.circulating_supply, Some(RawNumber::Unsupported));
        assert_eq!(snapshot.contexts[1].mid_price, None);
    }

    #[test]
    fn test_wrong_top_level_shape_is_fatal() {
        let err = decode_snapshot(json!({"tokens": []}), Utc::now()).unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedSnapshot { .. }));

        let err = decode_snapshot(json!([{"tokens": [], "universe": []}]), Utc::now()).unwrap_err();
        assert!(matches!(err, SnapshotError::MalformedSnapshot { .. }));
    }

    #[test]
    fn test_missing_universe_is_fatal() {
        let err = decode_snapshot(json!([{"tokens": []}, []]), Utc::now()).unwrap_err();
        assert!(err.to_string().contains("universe"));
    }
}
