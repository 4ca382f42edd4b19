//! Holdings valuation: quote feed port, adapters, and the valuator.
//!
//! Open lots from the matcher meet externally supplied prices and sectors
//! here. The quote feed is a driven port; `MockQuoteFeed` backs tests and
//! `StaticQuoteFeed` serves file-based quotes for offline runs.

mod mock;
mod quote;
mod static_feed;
mod types;
mod valuator;

pub use mock::MockQuoteFeed;
pub use quote::{QuoteFeedError, QuoteFeedPort, SymbolQuote};
pub use static_feed::{StaticFeedError, StaticQuoteFeed};
pub use types::{
    Holding, HoldingValuation, HoldingsReport, LookupFailure, PortfolioSummary, SectorAllocation,
    SectorBand, TopHoldingsBand, UNKNOWN_SECTOR,
};
pub use valuator::HoldingsValuator;
