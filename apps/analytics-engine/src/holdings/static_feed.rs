//! File-backed quote feed.
//!
//! Serves quotes from a JSON document mapping symbol to quote, for offline
//! runs and the CLI. The document shape:
//!
//! ```json
//! { "AAPL": { "price": "189.95", "sector": "Technology" } }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use async_trait::async_trait;
use thiserror::Error;

use super::quote::{QuoteFeedError, QuoteFeedPort, SymbolQuote};
use crate::ledger::Symbol;

/// Error loading a static quote file.
#[derive(Debug, Error)]
pub enum StaticFeedError {
    /// Failed to open the quote file.
    #[error("Failed to open quote file '{path}': {source}")]
    Open {
        /// Path to the quote file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the quote JSON.
    #[error("Failed to parse quote JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Quote feed backed by a fixed symbol→quote map.
#[derive(Debug, Default)]
pub struct StaticQuoteFeed {
    quotes: HashMap<String, SymbolQuote>,
}

impl StaticQuoteFeed {
    /// Build a feed from an in-memory map.
    #[must_use]
    pub fn new(quotes: HashMap<String, SymbolQuote>) -> Self {
        let quotes = quotes
            .into_iter()
            .map(|(k, v)| (Symbol::new(k).into_inner(), v))
            .collect();
        Self { quotes }
    }

    /// Load a feed from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsed.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, StaticFeedError> {
        let file = File::open(&path).map_err(|source| StaticFeedError::Open {
            path: path.as_ref().display().to_string(),
            source,
        })?;
        let quotes: HashMap<String, SymbolQuote> = serde_json::from_reader(file)?;
        Ok(Self::new(quotes))
    }
}

#[async_trait]
impl QuoteFeedPort for StaticQuoteFeed {
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<SymbolQuote, QuoteFeedError> {
        self.quotes
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| QuoteFeedError::SymbolNotFound {
                symbol: symbol.as_str().to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[tokio::test]
    async fn from_json_file_serves_quotes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "AAPL": {{ "price": "189.95", "sector": "Technology" }} }}"#
        )
        .unwrap();

        let feed = StaticQuoteFeed::from_json_file(file.path()).unwrap();
        let quote = feed.fetch_quote(&Symbol::new("aapl")).await.unwrap();
        assert_eq!(quote.price, Some(dec!(189.95)));
        assert_eq!(quote.sector.as_deref(), Some("Technology"));
    }

    #[tokio::test]
    async fn unknown_symbol_is_not_found() {
        let feed = StaticQuoteFeed::new(HashMap::new());
        let result = feed.fetch_quote(&Symbol::new("MSFT")).await;
        assert!(matches!(result, Err(QuoteFeedError::SymbolNotFound { .. })));
    }

    #[test]
    fn bad_json_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let result = StaticQuoteFeed::from_json_file(file.path());
        assert!(matches!(result, Err(StaticFeedError::Parse(_))));
    }
}
