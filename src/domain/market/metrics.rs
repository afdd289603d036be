//! Null-tolerant market metrics.
//!
//! Every function here returns `None` instead of failing: a missing or
//! malformed feed field degrades only the figures that depend on it.

use crate::domain::market::types::RawNumber;

/// Decimals used when the raw price is absent, not a string, or in exponent form.
pub const DEFAULT_PRICE_DECIMALS: u32 = 6;

/// Decimals used when the raw price string is empty.
pub const EMPTY_PRICE_DECIMALS: u32 = 2;

pub const MAX_PRICE_DECIMALS: u32 = 12;

/// Coerces a feed value to a finite `f64`.
pub fn to_f64(value: Option<&RawNumber>) -> Option<f64> {
    let parsed = match value? {
        RawNumber::Number(n) => *n,
        RawNumber::Text(s) => s.trim().parse::<f64>().ok()?,
        RawNumber::Unsupported => return None,
    };
    parsed.is_finite().then_some(parsed)
}

/// Display precision implied by the feed's raw price string.
pub fn price_decimals(raw_price: Option<&str>) -> u32 {
    let Some(raw) = raw_price else {
        return DEFAULT_PRICE_DECIMALS;
    };
    if raw.is_empty() {
        return EMPTY_PRICE_DECIMALS;
    }
    if raw.contains(['e', 'E']) {
        return DEFAULT_PRICE_DECIMALS;
    }
    match raw.split_once('.') {
        None => 0,
        Some((_, fraction)) => (fraction.chars().count() as u32).min(MAX_PRICE_DECIMALS),
    }
}

/// 24h change in percent; `None` when either side is missing or `prev` is zero.
pub fn change_pct(mid: Option<f64>, prev: Option<f64>) -> Option<f64> {
    match (mid, prev) {
        (Some(mid), Some(prev)) if prev != 0.0 => Some((mid - prev) / prev * 100.0),
        _ => None,
    }
}

pub fn change_abs(mid: Option<f64>, prev: Option<f64>) -> Option<f64> {
    Some(mid? - prev?)
}

pub fn market_cap(mid: Option<f64>, circulating_supply: Option<f64>) -> Option<f64> {
    Some(mid? * circulating_supply?)
}
