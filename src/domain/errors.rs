use thiserror::Error;

/// Fatal conditions that abort a ranking run.
///
/// Per-row data problems never surface here; they degrade the affected row
/// (null metrics, `context_found = false`) and processing continues.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("Quote token {symbol} not found in spot metadata tokens")]
    QuoteTokenNotFound { symbol: String },

    #[error("Malformed spot snapshot: {reason}")]
    MalformedSnapshot { reason: String },
}
