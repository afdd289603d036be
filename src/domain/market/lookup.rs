use crate::domain::market::ranking::RankedMarketList;
use crate::domain::market::types::ResolvedMarketRow;

/// Coin keys reported per lookup
pub const MAX_MATCHING_KEYS: usize = 50;

/// Rows shown on each side of a located market.
pub const CONTEXT_WINDOW: usize = 2;

/// A market located in the ranking by its display base symbol.
#[derive(Debug, Clone, PartialEq)]
pub struct MarketLocation<'a> {
    /// 1-based rank by volume
    pub rank: usize,
    pub row: &'a ResolvedMarketRow,
    /// Distinct context-feed coin keys containing the query, sorted.
    pub matching_coin_keys: Vec<String>,
    /// Neighbouring rows as `(rank, row)`, the located row included.
    pub window: Vec<(usize, &'a ResolvedMarketRow)>,
}

/// Finds the first ranked row whose display base equals `base` (case-insensitive).
pub fn locate<'a, I, K>(
    ranked: &'a RankedMarketList,
    coin_keys: I,
    base: &str,
) -> Option<MarketLocation<'a>>
where
    I: IntoIterator<Item = K>,
    K: AsRef<str>,
{
    let needle = base.trim().to_uppercase();
    if needle.is_empty() {
        return None;
    }

    let rows = ranked.rows();
    let idx = rows
        .iter()
        .position(|row| row.display_base().to_uppercase() == needle)?;

    let mut matching_coin_keys: Vec<String> = coin_keys
        .into_iter()
        .filter(|key| key.as_ref().to_uppercase().contains(&needle))
        .map(|key| key.as_ref().to_string())
        .collect();
    matching_coin_keys.sort();
    matching_coin_keys.dedup();
    matching_coin_keys.truncate(MAX_MATCHING_KEYS);

    let lo = idx.saturating_sub(CONTEXT_WINDOW);
    let hi = (idx + CONTEXT_WINDOW + 1).min(rows.len());
    let window = (lo..hi).map(|i| (i + 1, &rows[i])).collect();

    Some(MarketLocation {
        rank: idx + 1,
        row: &rows[idx],
        matching_coin_keys,
        window,
    })
}
