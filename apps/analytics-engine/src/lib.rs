// Allow unwrap/expect in tests - tests should panic on unexpected errors
// Allow test-specific patterns and pedantic lints in test code
#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::too_many_lines,
        clippy::match_same_arms,
        clippy::needless_pass_by_value,
        clippy::default_trait_access,
        clippy::items_after_statements
    )
)]

//! Analytics Engine - Rust Core Library
//!
//! Deterministic trade-ledger accounting engine for the Tradelens system.
//!
//! # Architecture
//!
//! The engine is a one-directional pipeline over an immutable trade
//! sequence; each stage owns its own state and hands plain data to the next:
//!
//! - `ledger`: Row ingestion and normalization into typed [`ledger::Trade`]
//!   records, stably ordered by timestamp. Malformed rows are dropped and
//!   reported, never fatal.
//! - `matching`: Per-symbol FIFO lot reconstruction. Buys open lots with
//!   commission-inclusive cost; sells consume them oldest-first, emitting
//!   [`matching::ClosedLotMatch`] events and leaving the open-lot set that
//!   defines current cost basis. Symbols are independent and matched in
//!   parallel.
//! - `metrics`: Closed-trade statistics (win rate, profit factor,
//!   expectancy, risk/reward, fear index, grades) and the equity curve with
//!   drawdown and streak analysis. Undefined ratios are `None`, never a
//!   numeric sentinel.
//! - `holdings`: Valuation of open positions against the external
//!   [`holdings::QuoteFeedPort`], the engine's only I/O-bound stage, run
//!   with bounded concurrency and per-request timeouts, degrading to
//!   explicit unpriced holdings on partial failure.
//! - `analysis`: Orchestration and the report surface consumed by the
//!   presentation layer.
//!
//! # Coverage
//!
//! Coverage threshold: 90% (Critical tier)

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

/// Engine configuration types.
pub mod config;

/// Ledger ingestion and trade normalization.
pub mod ledger;

/// FIFO lot matching and open-position state.
pub mod matching;

/// Realized performance metrics and equity analysis.
pub mod metrics;

/// Holdings valuation against the external quote feed.
pub mod holdings;

/// Pipeline orchestration and report assembly.
pub mod analysis;

// =============================================================================
// Re-exports
// =============================================================================

pub use analysis::{AnalysisReport, LedgerAnalysis, analyze_ledger, analyze_rows, matches_to_csv};
pub use config::{EngineConfig, QuoteLookupConfig};
pub use holdings::{
    HoldingsReport, HoldingsValuator, MockQuoteFeed, QuoteFeedError, QuoteFeedPort,
    StaticQuoteFeed, SymbolQuote,
};
pub use ledger::{NormalizedLedger, RawTradeRow, Symbol, Trade, TradeSide, read_ledger};
pub use matching::{ClosedLotMatch, Lot, MatchOutcome, match_ledger, match_symbol};
pub use metrics::{EquityAnalysis, RealizedSummary, TradeGrade, analyze_equity, summarize_matches};
