use crate::domain::market::types::ResolvedMarketRow;
use serde::Serialize;
use std::collections::HashSet;
use tracing::{debug, info};

/// Which raw base symbols are dropped before ranking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionPolicy {
    /// Default exclusions plus caller additions.
    Defaults { extra: Vec<String> },
    /// Only the caller additions.
    Disabled { extra: Vec<String> },
}

impl Default for ExclusionPolicy {
    fn default() -> Self {
        ExclusionPolicy::Defaults { extra: Vec::new() }
    }
}

impl ExclusionPolicy {
    /// Resolves the effective exclusion set.
    pub fn resolve(&self, defaults: &[String]) -> HashSet<String> {
        match self {
            ExclusionPolicy::Defaults { extra } => {
                defaults.iter().chain(extra.iter()).cloned().collect()
            }
            ExclusionPolicy::Disabled { extra } => extra.iter().cloned().collect(),
        }
    }
}

/// Volume-descending market list. Ties keep source-universe order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedMarketList {
    rows: Vec<ResolvedMarketRow>,
}

impl RankedMarketList {
    pub fn rows(&self) -> &[ResolvedMarketRow] {
        &self.rows
    }

    /// The first `n` rows (at least one, when any exist).
    pub fn top(&self, n: usize) -> &[ResolvedMarketRow] {
        &self.rows[..n.max(1).min(self.rows.len())]
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Applies exclusions and the optional heuristic filter, then sorts by volume.
pub struct RankingBuilder {
    exclusions: HashSet<String>,
    heuristic_mode: bool,
    stable_allow_list: HashSet<String>,
}

impl RankingBuilder {
    pub fn new(
        exclusions: HashSet<String>,
        heuristic_mode: bool,
        stable_allow_list: HashSet<String>,
    ) -> Self {
        Self {
            exclusions,
            heuristic_mode,
            stable_allow_list,
        }
    }

    pub fn build(&self, rows: Vec<ResolvedMarketRow>) -> RankedMarketList {
        let input_len = rows.len();

        let mut kept: Vec<ResolvedMarketRow> = rows
            .into_iter()
            .filter(|row| {
                if self.exclusions.contains(&row.base_symbol_raw) {
                    debug!(
                        "RankingBuilder: excluding {} (raw base {})",
                        row.pair_name, row.base_symbol_raw
                    );
                    return false;
                }
                !self.heuristic_mode || self.passes_heuristics(row)
            })
            .collect();

        // `sort_by` is stable, so equal volumes keep universe order.
        kept.sort_by(|a, b| {
            let va = a.volume.unwrap_or(0.0);
            let vb = b.volume.unwrap_or(0.0);
            vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
        });

        info!(
            "RankingBuilder: ranked {} of {} rows (heuristic mode: {})",
            kept.len(),
            input_len,
            self.heuristic_mode
        );

        RankedMarketList { rows: kept }
    }

    fn passes_heuristics(&self, row: &ResolvedMarketRow) -> bool {
        if !row.context_found || row.price.is_none() {
            debug!(
                "RankingBuilder: dropping {} (context found: {}, price: {:?})",
                row.pair_name, row.context_found, row.price
            );
            return false;
        }

        if self.stable_allow_list.contains(&row.pair_name) {
            return true;
        }

        match row.circulating_supply {
            Some(supply) if supply > 0.0 => true,
            _ => {
                debug!(
                    "RankingBuilder: dropping {} (circulating supply: {:?})",
                    row.pair_name, row.circulating_supply
                );
                false
            }
        }
    }
}
