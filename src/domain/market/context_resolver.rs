use crate::domain::market::types::MarketContext;
use std::collections::HashMap;
use tracing::warn;

/// Outcome of binding a pair to its market context.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextResolution {
    /// The matched context, or an empty one when nothing matched.
    pub context: MarketContext,
    /// The winning key; the first candidate when nothing matched.
    pub used_key: String,
    pub found: bool,
    /// Every candidate key, in the order they are consulted.
    pub tried_keys: Vec<String>,
}

/// Indexes contexts by coin key. Duplicate keys resolve last-write-wins.
pub fn index_contexts(contexts: Vec<MarketContext>) -> HashMap<String, MarketContext> {
    let mut by_key = HashMap::with_capacity(contexts.len());
    for ctx in contexts {
        if let Some(previous) = by_key.insert(ctx.coin_key.clone(), ctx) {
            warn!(
                "ContextResolver: duplicate context for coin key {}, keeping the later entry",
                previous.coin_key
            );
        }
    }
    by_key
}

/// Looks up `candidates` in order; the first key present wins.
pub fn resolve(
    candidates: &[String],
    contexts_by_key: &HashMap<String, MarketContext>,
) -> ContextResolution {
    let tried_keys = candidates.to_vec();

    match candidates
        .iter()
        .find_map(|key| contexts_by_key.get(key).map(|ctx| (key, ctx)))
    {
        Some((key, ctx)) => ContextResolution {
            context: ctx.clone(),
            used_key: key.clone(),
            found: true,
            tried_keys,
        },
        None => ContextResolution {
            context: MarketContext::default(),
            used_key: candidates.first().cloned().unwrap_or_default(),
            found: false,
            tried_keys,
        },
    }
}
