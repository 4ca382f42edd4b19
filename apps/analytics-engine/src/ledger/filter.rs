//! Pre-analysis trade filters.
//!
//! Filtering happens before the accounting pipeline runs; the matcher and
//! aggregators always see the already-narrowed sequence.

use chrono::{DateTime, Utc};

use super::symbol::Symbol;
use super::trade::Trade;

/// Keep trades inside an inclusive date range. `None` bounds are open.
#[must_use]
pub fn filter_by_date(
    trades: &[Trade],
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Vec<Trade> {
    trades
        .iter()
        .filter(|t| start.is_none_or(|s| t.executed_at >= s))
        .filter(|t| end.is_none_or(|e| t.executed_at <= e))
        .cloned()
        .collect()
}

/// Keep trades for the given symbols. An empty list keeps everything.
#[must_use]
pub fn filter_by_symbols(trades: &[Trade], symbols: &[Symbol]) -> Vec<Trade> {
    if symbols.is_empty() {
        return trades.to_vec();
    }
    trades
        .iter()
        .filter(|t| symbols.contains(&t.symbol))
        .cloned()
        .collect()
}
