//! Console output for rankings, reconciliation reports, and lookups.
//!
//! `render_*` build the text so it can be tested; `print_*` write it to stdout.

use crate::domain::market::lookup::MarketLocation;
use crate::domain::market::metrics::DEFAULT_PRICE_DECIMALS;
use crate::domain::market::reconciliation::{ReconciliationReport, ReferenceView};
use crate::domain::market::types::ResolvedMarketRow;
use chrono::{DateTime, Utc};

/// Extra entries listed before the report collapses to a count.
pub const MAX_EXTRA_LISTED: usize = 100;

/// Order mismatches listed before the report collapses to a count.
pub const MAX_MISMATCHES_LISTED: usize = 50;

/// Side-by-side rows shown by the reconciliation report.
pub const ALIGNMENT_ROWS: usize = 60;

const TABLE_WIDTH: usize = 72;
const DEBUG_TABLE_WIDTH: usize = 120;

/// Formats `value` with `digits` decimals and comma thousands separators.
pub fn format_number(value: f64, digits: usize) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let fixed = format!("{:.*}", digits, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let mut out = String::new();
    if value < 0.0 {
        out.push('-');
    }
    out.push_str(&grouped);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Like [`format_number`] but always carries a leading `+` or `-`.
pub fn format_signed(value: f64, digits: usize) -> String {
    let sign = if value >= 0.0 { '+' } else { '-' };
    format!("{}{}", sign, format_number(value.abs(), digits))
}

/// Integer-looking prices carry no decimals; they print at the default precision.
fn display_decimals(row: &ResolvedMarketRow) -> usize {
    match row.price_decimals {
        0 => DEFAULT_PRICE_DECIMALS as usize,
        decimals => decimals as usize,
    }
}

fn price_cell(row: &ResolvedMarketRow) -> String {
    row.price
        .map(|p| format_number(p, display_decimals(row)))
        .unwrap_or_else(|| "-".to_string())
}

fn change_cell(row: &ResolvedMarketRow) -> String {
    match (row.change_abs, row.change_pct) {
        (Some(abs), Some(pct)) => format!(
            "{} / {}%",
            format_signed(abs, display_decimals(row)),
            format_signed(pct, 2)
        ),
        _ => "-".to_string(),
    }
}

fn volume_cell(volume: Option<f64>) -> String {
    volume
        .map(|v| format!("${}", format_number(v, 0)))
        .unwrap_or_else(|| "-".to_string())
}

fn diagnostics(row: &ResolvedMarketRow) -> String {
    format!(
        "l1={} full={} uIndex={} canon={} coinKey={}",
        row.base_symbol_raw, row.base_full_name, row.pair_index, row.is_canonical, row.coin_key_used
    )
}

/// Renders ranked markets and lookups for the terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SpotReporter {
    debug: bool,
}

impl SpotReporter {
    /// With `debug`, market rows carry a raw-metadata column.
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn header(&self) -> Vec<String> {
        let columns = format!(
            "{:<16} {:>14} {:>22} {:>14}",
            "SYMBOL", "LAST PRICE", "24H CHANGE", "VOLUME"
        );
        if self.debug {
            vec![format!("{}  RAW", columns), "-".repeat(DEBUG_TABLE_WIDTH)]
        } else {
            vec![columns, "-".repeat(TABLE_WIDTH)]
        }
    }

    fn market_line(&self, row: &ResolvedMarketRow) -> String {
        let line = format!(
            "{:<16} {:>14} {:>22} {:>14}",
            row.pair_name,
            price_cell(row),
            change_cell(row),
            volume_cell(row.volume)
        );
        if self.debug {
            format!("{}  {}", line, diagnostics(row))
        } else {
            line
        }
    }

    pub fn render_top(
        &self,
        rows: &[ResolvedMarketRow],
        quote_symbol: &str,
        fetched_at: DateTime<Utc>,
    ) -> String {
        let mut lines = vec![
            format!(
                "Top {} Spot ({}) by 24h Volume (dayNtlVlm)",
                rows.len(),
                quote_symbol
            ),
            format!("Snapshot fetched at {}", fetched_at.format("%Y-%m-%d %H:%M:%S UTC")),
            String::new(),
        ];
        lines.extend(self.header());
        lines.extend(rows.iter().map(|row| self.market_line(row)));
        lines.join("\n")
    }

    pub fn render_reference_view(&self, view: &ReferenceView<'_>) -> String {
        let mut lines = vec![
            format!("Reference order list ({} markets)", view.entries.len()),
            String::new(),
        ];
        lines.extend(self.header());
        for (name, row) in &view.entries {
            match row {
                Some(row) => lines.push(self.market_line(row)),
                None => lines.push(format!("{:<16} {:>14} {:>22} {:>14}", name, "-", "-", "-")),
            }
        }

        if !view.missing.is_empty() {
            lines.push(String::new());
            lines.push("Missing rows (not found in computed list by display symbol):".to_string());
            lines.extend(view.missing.iter().map(|name| format!("   {}", name)));
        }
        lines.join("\n")
    }

    pub fn render_reconciliation(&self, report: &ReconciliationReport) -> String {
        let mut lines = vec![
            format!("Reference ranking length: {}", report.reference_len),
            format!("Computed ranking length: {}", report.computed_len),
            String::new(),
        ];

        if !report.missing.is_empty() {
            lines.push("Missing from computed list:".to_string());
            lines.extend(report.missing.iter().map(|name| format!("   {}", name)));
            lines.push(String::new());
        }

        if !report.extra.is_empty() {
            lines.push("Extra (present in computed list but not in reference):".to_string());
            lines.extend(
                report
                    .extra
                    .iter()
                    .take(MAX_EXTRA_LISTED)
                    .map(|name| format!("   {}", name)),
            );
            if report.extra.len() > MAX_EXTRA_LISTED {
                lines.push(format!("  ... {} more", report.extra.len() - MAX_EXTRA_LISTED));
            }
            lines.push(String::new());
        }

        lines.push("Order mismatches (reference_rank -> computed_rank):".to_string());
        lines.extend(
            report
                .order_mismatches
                .iter()
                .take(MAX_MISMATCHES_LISTED)
                .map(|m| {
                    format!("  {:<12} {:>3} -> {:<3}", m.name, m.reference_rank, m.computed_rank)
                }),
        );
        if report.order_mismatches.len() > MAX_MISMATCHES_LISTED {
            lines.push(format!(
                "  ... {} more",
                report.order_mismatches.len() - MAX_MISMATCHES_LISTED
            ));
        }
        lines.push(String::new());

        lines.push("Top rows (reference vs computed):".to_string());
        for entry in report.alignment.iter().take(ALIGNMENT_ROWS) {
            let mark = if entry.matches { "==" } else { "!!" };
            lines.push(format!(
                "#{:02} {} ref={:<12}  computed={}",
                entry.position,
                mark,
                entry.reference,
                entry.computed.as_deref().unwrap_or("")
            ));
        }
        lines.join("\n")
    }

    pub fn render_location(&self, location: &MarketLocation<'_>, query: &str) -> String {
        let row = location.row;
        let mut lines = vec![
            format!("Found {} at rank #{} by dayNtlVlm", row.pair_name, location.rank),
            format!(
                "pair={} volume={} price={} {}",
                row.pair_name,
                volume_cell(row.volume),
                row.price_raw.as_deref().unwrap_or("-"),
                diagnostics(row)
            ),
            format!(
                "ctxFound={} ctxTried={:?}",
                row.context_found, row.tried_keys
            ),
        ];

        if location.matching_coin_keys.is_empty() {
            lines.push(format!("No ctx coin keys contain '{}'", query));
        } else {
            lines.push(format!(
                "ctx coin keys containing '{}': {}",
                query,
                location.matching_coin_keys.join(", ")
            ));
        }

        lines.push(String::new());
        lines.push("Context:".to_string());
        for (rank, neighbour) in &location.window {
            lines.push(format!(
                "#{:<4} {:<16} {:>13}",
                rank,
                neighbour.pair_name,
                volume_cell(neighbour.volume)
            ));
        }
        lines.join("\n")
    }

    pub fn print_top(
        &self,
        rows: &[ResolvedMarketRow],
        quote_symbol: &str,
        fetched_at: DateTime<Utc>,
    ) {
        println!("{}", self.render_top(rows, quote_symbol, fetched_at));
    }

    pub fn print_reference_view(&self, view: &ReferenceView<'_>) {
        println!("{}", self.render_reference_view(view));
    }

    pub fn print_reconciliation(&self, report: &ReconciliationReport) {
        println!("{}", self.render_reconciliation(report));
    }

    pub fn print_location(&self, location: &MarketLocation<'_>, query: &str) {
        println!("{}", self.render_location(location, query));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::market::reconciliation::reconcile;
    use crate::domain::market::types::fixtures::row;
    use chrono::TimeZone;

    #[test]
    fn test_format_number_groups_thousands() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1000.0, 0), "1,000");
        assert_eq!(format_number(-12345.5, 1), "-12,345.5");
        assert_eq!(format_number(0.000123, 6), "0.000123");
        assert_eq!(format_number(f64::NAN, 2), "-");
    }

    #[test]
    fn test_format_signed() {
        assert_eq!(format_signed(1500.25, 2), "+1,500.25");
        assert_eq!(format_signed(-3.14159, 3), "-3.142");
        assert_eq!(format_signed(0.0, 2), "+0.00");
    }

    #[test]
    fn test_market_line_with_missing_fields() {
        let mut r = row("ABC/USDC", None);
        r.price = None;
        let line = SpotReporter::new(false).market_line(&r);

        assert!(line.starts_with("ABC/USDC"));
        assert_eq!(line.matches(" -").count(), 3);
    }

    #[test]
    fn test_market_line_formats_change_and_volume() {
        let mut r = row("BTC/USDC", Some(1234567.0));
        r.price = Some(97000.5);
        r.price_decimals = 1;
        r.change_abs = Some(-500.0);
        r.change_pct = Some(-0.51);

        let line = SpotReporter::new(false).market_line(&r);
        assert!(line.contains("97,000.5"));
        assert!(line.contains("-500.0 / -0.51%"));
        assert!(line.contains("$1,234,567"));
    }

    #[test]
    fn test_debug_rows_carry_diagnostics() {
        let r = row("BTC/USDC", Some(1.0));
        let text =
            SpotReporter::new(true).render_top(std::slice::from_ref(&r), "USDC", Utc::now());
        assert!(text.contains("RAW"));
        assert!(text.contains("coinKey="));
    }

    #[test]
    fn test_reconciliation_caps_extra_list() {
        let computed: Vec<String> = (0..MAX_EXTRA_LISTED + 5)
            .map(|i| format!("X{}/USDC", i))
            .collect();
        let report = reconcile(&computed, &["A/USDC".to_string()], ALIGNMENT_ROWS);
        let text = SpotReporter::default().render_reconciliation(&report);

        assert!(text.contains("... 5 more"));
        assert!(text.contains("#01 !! ref=A/USDC"));
    }

    #[test]
    fn test_integer_price_prints_default_precision() {
        let mut r = row("FOO/USDC", Some(10.0));
        r.price = Some(12.0);
        r.price_decimals = 0;
        r.change_abs = Some(1.5);
        r.change_pct = Some(14.29);

        let line = SpotReporter::new(false).market_line(&r);
        assert!(line.contains("12.000000"));
        assert!(line.contains("+1.500000 / +14.29%"));
    }

    #[test]
    fn test_matching_alignment_rows_marked_equal() {
        let names = vec!["A/USDC".to_string(), "B/USDC".to_string()];
        let reference = vec!["A/USDC".to_string(), "C/USDC".to_string()];
        let report = reconcile(&names, &reference, ALIGNMENT_ROWS);
        let text = SpotReporter::default().render_reconciliation(&report);

        assert!(text.contains("#01 == ref=A/USDC"));
        assert!(text.contains("#02 !! ref=C/USDC"));
        assert!(!text.contains(" OK "));
    }

    #[test]
    fn test_top_header_shows_fetch_time() {
        let fetched_at = Utc.with_ymd_and_hms(2026, 3, 1, 12, 30, 5).unwrap();
        let r = row("BTC/USDC", Some(1.0));
        let text =
            SpotReporter::default().render_top(std::slice::from_ref(&r), "USDC", fetched_at);

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Top 1 Spot (USDC) by 24h Volume (dayNtlVlm)");
        assert_eq!(lines[1], "Snapshot fetched at 2026-03-01 12:30:05 UTC");
    }
}
