//! Spot Ranking Service
//!
//! Runs the full pipeline over one snapshot:
//! - TokenIndex / PairUniverse: quote-filtered pairs with coin-key candidates
//! - ContextResolver: binds each pair to its live market context
//! - SymbolMapper: canonical display symbol for the base token
//! - Metrics: price, change, market cap (null-tolerant)
//! - RankingBuilder: exclusions, heuristic filter, volume sort
//!
//! and exposes reconciliation, reference-ordered views, and lookups over the
//! resulting ranking.

use crate::domain::config::RankingTables;
use crate::domain::errors::SnapshotError;
use crate::domain::market::context_resolver::{index_contexts, resolve};
use crate::domain::market::lookup::{MarketLocation, locate};
use crate::domain::market::metrics::{change_abs, change_pct, market_cap, price_decimals, to_f64};
use crate::domain::market::pair_universe::PairUniverse;
use crate::domain::market::ranking::{ExclusionPolicy, RankedMarketList, RankingBuilder};
use crate::domain::market::reconciliation::{
    ReconciliationReport, ReferenceView, reconcile, reference_view,
};
use crate::domain::market::symbol_mapper::SymbolMapper;
use crate::domain::market::token_index::TokenIndex;
use crate::domain::market::types::{RawNumber, ResolvedMarketRow, SpotSnapshot};
use tracing::{debug, info};

/// Per-run filtering options.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RankingOptions {
    /// Approximate the reference UI: require a context, a price, and supply.
    pub heuristic_mode: bool,
    pub exclusions: ExclusionPolicy,
}

pub struct SpotRankingService {
    tables: RankingTables,
    mapper: SymbolMapper,
    quote_symbol: String,
}

impl SpotRankingService {
    pub fn new(tables: RankingTables, quote_symbol: impl Into<String>) -> Self {
        let mapper = SymbolMapper::from_tables(&tables);
        Self {
            tables,
            mapper,
            quote_symbol: quote_symbol.into(),
        }
    }

    pub fn quote_symbol(&self) -> &str {
        &self.quote_symbol
    }

    /// Builds one row per pair quoted in the configured stablecoin, in universe order.
    ///
    /// # Errors
    ///
    /// Fails only when the quote token is absent from the snapshot metadata.
    pub fn resolve_rows(
        &self,
        snapshot: &SpotSnapshot,
    ) -> Result<Vec<ResolvedMarketRow>, SnapshotError> {
        let tokens = TokenIndex::new(&snapshot.tokens);
        let quote_index = tokens.quote_index(&self.quote_symbol)?;
        let universe = PairUniverse::new(&snapshot.pairs, &tokens, quote_index);
        let contexts = index_contexts(snapshot.contexts.clone());

        info!(
            "SpotRankingService: {} {}-quoted pairs, {} contexts",
            universe.len(),
            self.quote_symbol,
            contexts.len()
        );

        let rows = universe
            .iter()
            .map(|candidate| {
                let def = &candidate.definition;
                let (base_symbol, base_full_name) = tokens.lookup(def.base_token_index);
                let resolution = resolve(&candidate.coin_keys, &contexts);
                if !resolution.found {
                    debug!(
                        "SpotRankingService: no context for {} (tried {:?})",
                        def.raw_name, resolution.tried_keys
                    );
                }

                let ctx = &resolution.context;
                let mid = to_f64(ctx.mid_price.as_ref());
                let prev = to_f64(ctx.prev_day_price.as_ref());
                let supply = to_f64(ctx.circulating_supply.as_ref());
                let price_raw = ctx
                    .mid_price
                    .as_ref()
                    .and_then(RawNumber::as_text)
                    .map(str::to_string);

                let display_symbol = self.mapper.map(base_symbol, base_full_name);
                let pair_name = if display_symbol.is_empty() {
                    def.raw_name.clone()
                } else {
                    format!("{}/{}", display_symbol, self.quote_symbol)
                };

                ResolvedMarketRow {
                    display_symbol,
                    pair_name,
                    price: mid,
                    price_decimals: price_decimals(price_raw.as_deref()),
                    price_raw,
                    change_abs: change_abs(mid, prev),
                    change_pct: change_pct(mid, prev),
                    volume: to_f64(ctx.day_volume.as_ref()),
                    market_cap: market_cap(mid, supply),
                    circulating_supply: supply,
                    coin_key_used: resolution.used_key.clone(),
                    context_found: resolution.found,
                    tried_keys: resolution.tried_keys.clone(),
                    base_symbol_raw: base_symbol.to_string(),
                    base_full_name: base_full_name.to_string(),
                    pair_index: def.index,
                    is_canonical: def.is_canonical,
                }
            })
            .collect();

        Ok(rows)
    }

    /// Resolves, filters, and ranks the snapshot's markets by volume.
    pub fn rank(
        &self,
        snapshot: &SpotSnapshot,
        options: &RankingOptions,
    ) -> Result<RankedMarketList, SnapshotError> {
        let rows = self.resolve_rows(snapshot)?;
        let builder = RankingBuilder::new(
            options.exclusions.resolve(&self.tables.default_exclusions),
            options.heuristic_mode,
            self.tables.stable_allow_list.iter().cloned().collect(),
        );
        Ok(builder.build(rows))
    }

    /// Ranked pair names quoted in the configured stablecoin, first occurrence kept.
    pub fn computed_pair_names(&self, ranked: &RankedMarketList) -> Vec<String> {
        let suffix = format!("/{}", self.quote_symbol);
        let mut names: Vec<String> = Vec::with_capacity(ranked.len());
        for row in ranked.rows() {
            if row.pair_name.ends_with(&suffix) && !names.contains(&row.pair_name) {
                names.push(row.pair_name.clone());
            }
        }
        names
    }

    /// Diffs the ranking against the configured reference ranking.
    pub fn reconcile(
        &self,
        ranked: &RankedMarketList,
        alignment_bound: usize,
    ) -> ReconciliationReport {
        let computed = self.computed_pair_names(ranked);
        let report = reconcile(&computed, &self.tables.reference_ranking, alignment_bound);
        info!(
            "SpotRankingService: reconciliation missing={} extra={} reordered={}",
            report.missing.len(),
            report.extra.len(),
            report.order_mismatches.len()
        );
        report
    }

    pub fn reference_view<'a>(&self, ranked: &'a RankedMarketList) -> ReferenceView<'a> {
        reference_view(ranked, &self.tables.reference_ranking)
    }

    /// Locates a display base symbol in the ranking, probing the snapshot's coin keys.
    pub fn locate<'a>(
        &self,
        ranked: &'a RankedMarketList,
        snapshot: &SpotSnapshot,
        base: &str,
    ) -> Option<MarketLocation<'a>> {
        locate(
            ranked,
            snapshot.contexts.iter().map(|ctx| ctx.coin_key.as_str()),
            base,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::types::{MarketContext, PairDefinition, Token};
    use chrono::Utc;

    fn token(index: u32, symbol: &str, full_name: &str) -> Token {
        Token {
            index,
            symbol: symbol.to_string(),
            full_name: full_name.to_string(),
        }
    }

    fn pair(index: u32, raw_name: &str, base: u32, is_canonical: bool) -> PairDefinition {
        PairDefinition {
            index,
            raw_name: raw_name.to_string(),
            base_token_index: base,
            quote_token_index: 0,
            is_canonical,
        }
    }

    fn ctx(coin: &str, mid: &str, prev: &str, volume: &str, supply: Option<&str>) -> MarketContext {
        let text = |s: &str| Some(RawNumber::Text(s.to_string()));
        MarketContext {
            coin_key: coin.to_string(),
            mid_price: text(mid),
            prev_day_price: text(prev),
            day_volume: text(volume),
            circulating_supply: supply.and_then(text),
        }
    }

    fn snapshot() -> SpotSnapshot {
        SpotSnapshot {
            tokens: vec![
                token(0, "USDC", ""),
                token(1, "PURR", "Purr"),
                token(2, "UBTC", "Unit Bitcoin"),
                token(3, "USD", "Ethena USD"),
                token(4, "XMR1", "Monero"),
            ],
            pairs: vec![
                pair(0, "PURR/USDC", 1, true),
                pair(140, "@140", 2, false),
                pair(150, "@150", 3, false),
                pair(160, "@160", 4, false),
                pair(77, "@77/USDC", 9, false),
            ],
            contexts: vec![
                ctx("PURR", "0.2", "0.25", "5000", Some("600000000")),
                ctx("@140", "97000.5", "95000", "900000", Some("21000")),
                ctx("@150", "1.0001", "1.0", "70000", None),
                ctx("@160", "300", "310", "1000000", Some("10")),
            ],
            fetched_at: Utc::now(),
        }
    }

    fn service() -> SpotRankingService {
        SpotRankingService::new(RankingTables::default(), "USDC")
    }

    #[test]
    fn test_resolve_rows_builds_display_names_and_metrics() {
        let rows = service().resolve_rows(&snapshot()).unwrap();
        assert_eq!(rows.len(), 5);

        let btc = &rows[1];
        assert_eq!(btc.pair_name, "BTC/USDC");
        assert_eq!(btc.coin_key_used, "@140");
        assert_eq!(btc.price_decimals, 1);
        assert_eq!(btc.market_cap, Some(97000.5 * 21000.0));
        assert!((btc.change_abs.unwrap() - 2000.5).abs() < 1e-9);

        assert_eq!(rows[2].pair_name, "USDE/USDC");
        assert_eq!(rows[2].market_cap, None);
    }

    #[test]
    fn test_unknown_base_falls_back_to_raw_pair_name() {
        let rows = service().resolve_rows(&snapshot()).unwrap();
        let unknown = &rows[4];

        assert_eq!(unknown.pair_name, "@77/USDC");
        assert_eq!(unknown.coin_key_used, "@77");
        assert!(!unknown.context_found);
        assert_eq!(unknown.tried_keys, vec!["@77", "@77/USDC"]);
        assert_eq!(unknown.price, None);
        assert_eq!(unknown.price_decimals, 6);
    }

    #[test]
    fn test_missing_quote_token_is_fatal() {
        let service = SpotRankingService::new(RankingTables::default(), "USDT");
        assert!(matches!(
            service.resolve_rows(&snapshot()),
            Err(SnapshotError::QuoteTokenNotFound { .. })
        ));
    }

    #[test]
    fn test_rank_applies_default_exclusions() {
        let ranked = service().rank(&snapshot(), &RankingOptions::default()).unwrap();

        let names = service().computed_pair_names(&ranked);
        assert_eq!(names, vec!["BTC/USDC", "USDE/USDC", "PURR/USDC", "@77/USDC"]);
    }

    #[test]
    fn test_rank_with_defaults_disabled_keeps_excluded_symbols() {
        let options = RankingOptions {
            heuristic_mode: false,
            exclusions: ExclusionPolicy::Disabled { extra: vec![] },
        };
        let ranked = service().rank(&snapshot(), &options).unwrap();
        assert_eq!(ranked.rows()[0].pair_name, "XMR/USDC");
    }

    #[test]
    fn test_heuristic_mode_keeps_allow_listed_stable() {
        let options = RankingOptions {
            heuristic_mode: true,
            exclusions: ExclusionPolicy::default(),
        };
        let ranked = service().rank(&snapshot(), &options).unwrap();
        let names = service().computed_pair_names(&ranked);
        assert_eq!(names, vec!["BTC/USDC", "USDE/USDC", "PURR/USDC"]);
    }

    #[test]
    fn test_locate_uses_snapshot_coin_keys() {
        let service = service();
        let snapshot = snapshot();
        let ranked = service.rank(&snapshot, &RankingOptions::default()).unwrap();

        let found = service.locate(&ranked, &snapshot, "purr").unwrap();
        assert_eq!(found.rank, 3);
        assert_eq!(found.matching_coin_keys, vec!["PURR"]);
    }

    #[test]
    fn test_locate_reports_duplicated_feed_key_once() {
        let service = service();
        let mut snapshot = snapshot();
        snapshot.contexts.push(ctx("PURR", "0.21", "0.25", "5000", Some("600000000")));
        let ranked = service.rank(&snapshot, &RankingOptions::default()).unwrap();

        let found = service.locate(&ranked, &snapshot, "PURR").unwrap();
        assert_eq!(found.matching_coin_keys, vec!["PURR"]);
    }
}
