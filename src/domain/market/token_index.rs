use crate::domain::errors::SnapshotError;
use crate::domain::market::types::Token;
use std::collections::HashMap;

/// Token index -> (symbol, full name) lookup.
#[derive(Debug, Clone, Default)]
pub struct TokenIndex {
    by_index: HashMap<u32, (String, String)>,
    /// Metadata order, used to pick the first quote token match.
    order: Vec<u32>,
}

impl TokenIndex {
    pub fn new(tokens: &[Token]) -> Self {
        let mut by_index = HashMap::with_capacity(tokens.len());
        let mut order = Vec::with_capacity(tokens.len());

        for token in tokens {
            let names = (token.symbol.clone(), token.full_name.clone());
            if by_index.insert(token.index, names).is_none() {
                order.push(token.index);
            }
        }

        Self { by_index, order }
    }

    /// Returns `(symbol, full_name)`, or empty strings for an unknown index.
    pub fn lookup(&self, index: u32) -> (&str, &str) {
        self.by_index
            .get(&index)
            .map(|(symbol, full_name)| (symbol.as_str(), full_name.as_str()))
            .unwrap_or(("", ""))
    }

    /// Index of the first token whose symbol equals `quote_symbol`.
    pub fn quote_index(&self, quote_symbol: &str) -> Result<u32, SnapshotError> {
        self.order
            .iter()
            .copied()
            .find(|idx| {
                self.by_index
                    .get(idx)
                    .is_some_and(|(symbol, _)| symbol == quote_symbol)
            })
            .ok_or_else(|| SnapshotError::QuoteTokenNotFound {
                symbol: quote_symbol.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.by_index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_index.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(index: u32, symbol: &str, full_name: &str) -> Token {
        Token {
            index,
            symbol: symbol.to_string(),
            full_name: full_name.to_string(),
        }
    }

    #[test]
    fn test_lookup_known_and_unknown() {
        let index = TokenIndex::new(&[
            token(0, "USDC", ""),
            token(150, "HYPE", "Hyperliquid"),
        ]);

        assert_eq!(index.lookup(150), ("HYPE", "Hyperliquid"));
        assert_eq!(index.lookup(9), ("", ""));
        assert_eq!(index.len(), 2);
    }

    #[test]
    fn test_quote_index_found() {
        let index = TokenIndex::new(&[token(3, "PURR", ""), token(7, "USDC", "")]);
        assert_eq!(index.quote_index("USDC").unwrap(), 7);
    }

    #[test]
    fn test_quote_index_missing_is_fatal() {
        let index = TokenIndex::new(&[token(3, "PURR", "")]);
        let err = index.quote_index("USDC").unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::QuoteTokenNotFound { ref symbol } if symbol == "USDC"
        ));
    }

    #[test]
    fn test_quote_index_takes_first_in_metadata_order() {
        let index = TokenIndex::new(&[token(42, "USDC", "bridged"), token(0, "USDC", "native")]);
        assert_eq!(index.quote_index("USDC").unwrap(), 42);
    }

    #[test]
    fn test_duplicate_index_last_write_wins() {
        let index = TokenIndex::new(&[token(1, "OLD", ""), token(1, "NEW", "renamed")]);
        assert_eq!(index.lookup(1), ("NEW", "renamed"));
        assert_eq!(index.len(), 1);
    }
}
