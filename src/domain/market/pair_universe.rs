//! Quote-filtered pair universe with context-feed key candidates.

use crate::domain::market::token_index::TokenIndex;
use crate::domain::market::types::PairDefinition;
use tracing::debug;

/// A pair quoted in the target stablecoin, with its ordered coin-key candidates.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidatePair {
    pub definition: PairDefinition,
    /// Primary, then alternate, then raw key. Never contains duplicates.
    pub coin_keys: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct PairUniverse {
    pairs: Vec<CandidatePair>,
}

impl PairUniverse {
    /// Keeps pairs whose quote token is `quote_index`, preserving source order.
    pub fn new(definitions: &[PairDefinition], tokens: &TokenIndex, quote_index: u32) -> Self {
        let pairs: Vec<CandidatePair> = definitions
            .iter()
            .filter(|def| def.quote_token_index == quote_index)
            .map(|def| {
                let (base_symbol, _) = tokens.lookup(def.base_token_index);
                CandidatePair {
                    definition: def.clone(),
                    coin_keys: coin_key_candidates(def, base_symbol),
                }
            })
            .collect();

        debug!(
            "PairUniverse: {} of {} pair definitions quoted in token {}",
            pairs.len(),
            definitions.len(),
            quote_index
        );

        Self { pairs }
    }

    pub fn iter(&self) -> impl Iterator<Item = &CandidatePair> {
        self.pairs.iter()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

/// Builds the ordered key list used to find a pair's market context.
///
/// Canonical pairs are keyed by the base symbol (falling back to the raw
/// name's base half when the token is unknown), everything else by `@{index}`.
pub fn coin_key_candidates(def: &PairDefinition, base_symbol: &str) -> Vec<String> {
    let index_key = format!("@{}", def.index);

    let primary = if def.is_canonical {
        if base_symbol.is_empty() {
            def.raw_name
                .split('/')
                .next()
                .unwrap_or_default()
                .to_string()
        } else {
            base_symbol.to_string()
        }
    } else {
        index_key.clone()
    };

    let mut keys = vec![primary];
    if !keys.contains(&index_key) {
        keys.push(index_key);
    }
    if !def.raw_name.is_empty() && !keys.contains(&def.raw_name) {
        keys.push(def.raw_name.clone());
    }
    keys
}
