//! Display-symbol derivation for spot base tokens.
//!
//! Raw token symbols on the feed are frequently wrapped (`UBTC`), suffixed
//! (`USDT0`), or shared between unrelated assets (several stables are all
//! called `USD`). The mapper runs a fixed chain of rules, first hit wins:
//!
//! 1. static override table
//! 2. generic-stable disambiguation by full-name substrings
//! 3. wrapped-asset prefix strip (`Unit Bitcoin` -> `BTC`)
//! 4. `$TICKER` extraction from the full name
//! 5. first all-caps run of the full name
//!
//! and falls back to the raw symbol. Reordering the chain changes output for
//! ambiguous tokens.

use crate::domain::config::ranking_tables::RankingTables;
use std::collections::HashMap;

/// One step of the display-symbol chain.
pub trait SymbolRule: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &str;

    /// Returns the display symbol if this rule decides it.
    fn apply(&self, raw_symbol: &str, full_name: &str) -> Option<String>;
}

/// Rule 1: raw symbol -> display symbol.
pub struct OverrideTableRule {
    overrides: HashMap<String, String>,
}

impl OverrideTableRule {
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }
}

impl SymbolRule for OverrideTableRule {
    fn name(&self) -> &str {
        "override_table"
    }

    fn apply(&self, raw_symbol: &str, _full_name: &str) -> Option<String> {
        self.overrides.get(raw_symbol).cloned()
    }
}

/// Rule 2: picks a stable's display symbol from its full name when the raw
/// symbol is the shared placeholder.
pub struct StableDisambiguationRule {
    placeholder: String,
    /// Uppercased needles paired with the display symbol, in priority order.
    markers: Vec<(Vec<String>, String)>,
}

impl StableDisambiguationRule {
    pub fn new(placeholder: impl Into<String>, markers: Vec<(Vec<String>, String)>) -> Self {
        let markers = markers
            .into_iter()
            .map(|(needles, display)| {
                let needles = needles
                    .into_iter()
                    .filter(|n| !n.is_empty())
                    .map(|n| n.to_uppercase())
                    .collect();
                (needles, display)
            })
            .collect();

        Self {
            placeholder: placeholder.into(),
            markers,
        }
    }
}

impl SymbolRule for StableDisambiguationRule {
    fn name(&self) -> &str {
        "stable_disambiguation"
    }

    fn apply(&self, raw_symbol: &str, full_name: &str) -> Option<String> {
        if raw_symbol != self.placeholder || full_name.is_empty() {
            return None;
        }

        let upper = full_name.to_uppercase();
        self.markers
            .iter()
            .find(|(needles, _)| needles.iter().any(|n| upper.contains(n.as_str())))
            .map(|(_, display)| display.clone())
    }
}

/// Rule 3: `{prefix}{known underlying name}` -> underlying symbol.
pub struct WrappedPrefixRule {
    prefix: String,
    names: HashMap<String, String>,
}

impl WrappedPrefixRule {
    pub fn new(prefix: impl Into<String>, names: HashMap<String, String>) -> Self {
        Self {
            prefix: prefix.into(),
            names,
        }
    }
}

impl SymbolRule for WrappedPrefixRule {
    fn name(&self) -> &str {
        "wrapped_prefix"
    }

    fn apply(&self, _raw_symbol: &str, full_name: &str) -> Option<String> {
        let underlying = full_name.strip_prefix(self.prefix.as_str())?;
        if underlying.is_empty() {
            return None;
        }
        self.names.get(underlying).cloned()
    }
}

/// Rule 4: the uppercase run right after a marker (`$PEPE0` -> `PEPE`).
pub struct TickerMarkerRule {
    marker: char,
}

impl TickerMarkerRule {
    pub fn new(marker: char) -> Self {
        Self { marker }
    }
}

impl SymbolRule for TickerMarkerRule {
    fn name(&self) -> &str {
        "ticker_marker"
    }

    fn apply(&self, _raw_symbol: &str, full_name: &str) -> Option<String> {
        full_name
            .match_indices(self.marker)
            .filter_map(|(pos, m)| {
                let rest = &full_name[pos + m.len()..];
                let run_len = rest
                    .find(|c: char| !is_upper_alnum(c))
                    .unwrap_or(rest.len());
                let ticker = strip_trailing_digits(&rest[..run_len]);
                (!ticker.is_empty()).then(|| ticker.to_string())
            })
            .next()
    }
}

/// Rule 5: the first all-caps run that is still long enough once trailing
/// digits are removed.
pub struct CapitalizedRunRule {
    min_len: usize,
}

impl CapitalizedRunRule {
    pub fn new(min_len: usize) -> Self {
        Self { min_len }
    }
}

impl SymbolRule for CapitalizedRunRule {
    fn name(&self) -> &str {
        "capitalized_run"
    }

    fn apply(&self, _raw_symbol: &str, full_name: &str) -> Option<String> {
        full_name
            .split(|c: char| !is_upper_alnum(c))
            .filter(|run| run.len() >= self.min_len)
            .map(strip_trailing_digits)
            .find(|run| run.len() >= self.min_len)
            .map(str::to_string)
    }
}

fn is_upper_alnum(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit()
}

fn strip_trailing_digits(s: &str) -> &str {
    s.trim_end_matches(|c: char| c.is_ascii_digit())
}

/// Ordered rule chain mapping `(raw symbol, full name)` to a display symbol.
///
/// Pure: the output depends only on the two inputs and the rule tables.
pub struct SymbolMapper {
    rules: Vec<Box<dyn SymbolRule>>,
}

impl SymbolMapper {
    /// Create a mapper that evaluates `rules` in the given order.
    pub fn new(rules: Vec<Box<dyn SymbolRule>>) -> Self {
        Self { rules }
    }

    /// The standard five-rule chain configured from `tables`.
    pub fn from_tables(tables: &RankingTables) -> Self {
        let overrides = tables
            .symbol_overrides
            .iter()
            .map(|(raw, display)| (raw.clone(), display.clone()))
            .collect();
        let markers = tables
            .stable_markers
            .iter()
            .map(|m| (m.needles.clone(), m.display.clone()))
            .collect();
        let wrapped = tables
            .wrapped_names
            .iter()
            .map(|(name, display)| (name.clone(), display.clone()))
            .collect();

        Self::new(vec![
            Box::new(OverrideTableRule::new(overrides)),
            Box::new(StableDisambiguationRule::new(
                tables.stable_placeholder.clone(),
                markers,
            )),
            Box::new(WrappedPrefixRule::new(tables.wrapped_prefix.clone(), wrapped)),
            Box::new(TickerMarkerRule::new(tables.ticker_marker)),
            Box::new(CapitalizedRunRule::new(tables.min_capitalized_run)),
        ])
    }

    pub fn map(&self, raw_symbol: &str, full_name: &str) -> String {
        self.rules
            .iter()
            .find_map(|rule| rule.apply(raw_symbol, full_name))
            .unwrap_or_else(|| raw_symbol.to_string())
    }

    /// Rule names in evaluation order
    pub fn rule_names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name()).collect()
    }
}

impl Default for SymbolMapper {
    fn default() -> Self {
        Self::from_tables(&RankingTables::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mapper() -> SymbolMapper {
        SymbolMapper::default()
    }

    #[test]
    fn test_rule_order() {
        assert_eq!(
            mapper().rule_names(),
            vec![
                "override_table",
                "stable_disambiguation",
                "wrapped_prefix",
                "ticker_marker",
                "capitalized_run"
            ]
        );
    }

    #[test]
    fn test_override_beats_wrapped_prefix() {
        assert_eq!(mapper().map("UBTC", "Unit Bitcoin"), "BTC");
    }

    #[test]
    fn test_override_ignores_full_name() {
        assert_eq!(mapper().map("MON", "Ticker $SOMETHING ELSE"), "MONPRO");
        assert_eq!(mapper().map("USDT0", ""), "USDT");
    }

    #[test]
    fn test_stable_disambiguation_priority() {
        let m = mapper();
        assert_eq!(m.map("USD", "Ethena USD"), "USDE");
        assert_eq!(m.map("USD", "Felix feUSD"), "FEUSD");
        assert_eq!(m.map("USD", "USDH Llama"), "USDHL");
        // Both first and third markers present: the first wins.
        assert_eq!(m.map("USD", "usde wrapped usdh"), "USDE");
    }

    #[test]
    fn test_stable_placeholder_without_full_name_falls_back() {
        assert_eq!(mapper().map("USD", ""), "USD");
    }

    #[test]
    fn test_stable_placeholder_without_marker_falls_through() {
        assert_eq!(mapper().map("USD", "Some Other DOLLAR"), "DOLLAR");
    }

    #[test]
    fn test_wrapped_prefix() {
        let m = mapper();
        assert_eq!(m.map("XYZ", "Unit Solana"), "SOL");
        assert_eq!(m.map("XYZ", "Unit Pump Fun"), "PUMP");
        // Unknown underlying continues down the chain.
        assert_eq!(m.map("ABC", "Unit Dogecoin"), "ABC");
        assert_eq!(m.map("ABC", "Unit "), "ABC");
    }

    #[test]
    fn test_ticker_marker_strips_trailing_digits() {
        assert_eq!(mapper().map("ZZZ", "Ticker is $MOONCAT1000 rising"), "MOONCAT");
    }

    #[test]
    fn test_ticker_marker_skips_all_digit_run() {
        // "$123" strips to nothing, so the all-caps scan decides.
        assert_eq!(mapper().map("K", "$123 Kitty KIT"), "KIT");
    }

    #[test]
    fn test_ticker_marker_uses_later_marker() {
        assert_eq!(mapper().map("K", "$ then $PIP"), "PIP");
    }

    #[test]
    fn test_capitalized_run_first_qualifying_wins() {
        let m = mapper();
        assert_eq!(m.map("X", "hello WORLD123 more FOO"), "WORLD");
        // "AB12" strips below the minimum, scan moves on.
        assert_eq!(m.map("X", "AB12 CDEF"), "CDEF");
        assert_eq!(m.map("X", "end run HFUN"), "HFUN");
    }

    #[test]
    fn test_ultimate_fallback() {
        assert_eq!(mapper().map("purr", "Purr the cat"), "purr");
        assert_eq!(mapper().map("", ""), "");
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let m = mapper();
        let inputs = [
            ("USD", "Ethena USD"),
            ("UBTC", "Unit Bitcoin"),
            ("ZZZ", "Ticker is $MOONCAT1000 rising"),
            ("X", "hello WORLD123"),
        ];
        for (raw, full) in inputs {
            assert_eq!(m.map(raw, full), m.map(raw, full));
            assert_eq!(m.map(raw, full), mapper().map(raw, full));
        }
    }

    #[test]
    fn test_custom_rule_chain() {
        let m = SymbolMapper::new(vec![Box::new(CapitalizedRunRule::new(2))]);
        assert_eq!(m.map("raw", "an OK token"), "OK");
        assert_eq!(m.rule_names(), vec!["capitalized_run"]);
    }
}
