//! Mock quote feed for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::quote::{QuoteFeedError, QuoteFeedPort, SymbolQuote};
use crate::ledger::Symbol;

/// Mock quote feed for testing.
///
/// Unknown symbols resolve to `SymbolNotFound`; symbols registered with
/// [`Self::fail_symbol`] resolve to `Unavailable`.
#[derive(Debug, Default)]
pub struct MockQuoteFeed {
    quotes: RwLock<HashMap<String, SymbolQuote>>,
    failures: RwLock<Vec<String>>,
}

impl MockQuoteFeed {
    /// Create a new mock quote feed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            quotes: RwLock::new(HashMap::new()),
            failures: RwLock::new(vec![]),
        }
    }

    /// Set the quote for a symbol.
    pub fn set_quote(&self, symbol: &str, quote: SymbolQuote) {
        let mut quotes = self.quotes.write().unwrap();
        quotes.insert(Symbol::new(symbol).into_inner(), quote);
    }

    /// Make a symbol's lookup fail with `Unavailable`.
    pub fn fail_symbol(&self, symbol: &str) {
        let mut failures = self.failures.write().unwrap();
        failures.push(Symbol::new(symbol).into_inner());
    }
}

#[async_trait]
impl QuoteFeedPort for MockQuoteFeed {
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<SymbolQuote, QuoteFeedError> {
        if self.failures.read().unwrap().contains(&symbol.as_str().to_string()) {
            return Err(QuoteFeedError::Unavailable {
                message: "mock failure".to_string(),
            });
        }

        self.quotes
            .read()
            .unwrap()
            .get(symbol.as_str())
            .cloned()
            .ok_or_else(|| QuoteFeedError::SymbolNotFound {
                symbol: symbol.as_str().to_string(),
            })
    }
}
