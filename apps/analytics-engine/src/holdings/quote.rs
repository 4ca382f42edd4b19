//! Quote Feed Port (Driven Port)
//!
//! Interface for the external price/sector lookup collaborator.

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::Symbol;

/// Current quote data for one symbol.
///
/// Either field may be absent: the collaborator returns what it knows, and
/// the valuator degrades gracefully around the gaps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolQuote {
    /// Last traded price, if known.
    pub price: Option<Decimal>,
    /// Sector classification, if known.
    pub sector: Option<String>,
}

impl SymbolQuote {
    /// Create a quote with a price and sector.
    #[must_use]
    pub fn new(price: Decimal, sector: impl Into<String>) -> Self {
        Self {
            price: Some(price),
            sector: Some(sector.into()),
        }
    }

    /// Create a price-only quote.
    #[must_use]
    pub const fn price_only(price: Decimal) -> Self {
        Self {
            price: Some(price),
            sector: None,
        }
    }
}

/// Quote feed error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QuoteFeedError {
    /// Feed temporarily unavailable.
    #[error("Quote feed unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// Symbol not known to the feed.
    #[error("Symbol not found: {symbol}")]
    SymbolNotFound {
        /// The unknown symbol.
        symbol: String,
    },

    /// The lookup did not complete within the per-request timeout.
    #[error("Quote lookup timed out after {seconds}s")]
    Timeout {
        /// The timeout that elapsed.
        seconds: u64,
    },
}

/// Port for resolving current prices and sectors.
///
/// Implementations must be safe to call concurrently per symbol; the
/// valuator fans one request out per distinct open symbol.
#[async_trait]
pub trait QuoteFeedPort: Send + Sync {
    /// Resolve the current quote for a symbol.
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<SymbolQuote, QuoteFeedError>;
}
