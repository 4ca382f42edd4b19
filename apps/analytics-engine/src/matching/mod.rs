//! FIFO lot matching: open lots, closed matches, and the full-ledger pass.
//!
//! Each symbol's lot queue is independent state owned by one matching pass,
//! so the full-ledger entry point fans symbols out across the rayon pool and
//! folds the results back into one deterministic outcome.

mod lot;
mod matcher;

pub use lot::{Lot, average_cost};
pub use matcher::{ClosedLotMatch, OversoldWarning, SymbolMatchResult, match_symbol};

use std::collections::BTreeMap;

use rayon::prelude::*;
use rust_decimal::Decimal;

use crate::ledger::{Symbol, Trade};

/// Tolerance for treating a position as flat despite fractional-share
/// rounding in the source ledger.
pub const POSITION_EPSILON: Decimal = Decimal::from_parts(1, 0, 0, false, 6); // 0.000001

/// Outcome of matching a complete ledger, keyed by symbol.
#[derive(Debug, Clone, Default)]
pub struct MatchOutcome {
    /// Per-symbol results in symbol order.
    pub per_symbol: BTreeMap<Symbol, SymbolMatchResult>,
}

impl MatchOutcome {
    /// All closed matches merged across symbols, in time order.
    ///
    /// The merge sort is stable over symbol order, so equal timestamps
    /// produce the same sequence on every run.
    #[must_use]
    pub fn chronological_matches(&self) -> Vec<ClosedLotMatch> {
        let mut matches: Vec<ClosedLotMatch> = self
            .per_symbol
            .values()
            .flat_map(|r| r.matches.iter().cloned())
            .collect();
        matches.sort_by_key(|m| m.closed_at);
        matches
    }

    /// All oversell warnings across symbols, in symbol order.
    #[must_use]
    pub fn warnings(&self) -> Vec<OversoldWarning> {
        self.per_symbol
            .values()
            .flat_map(|r| r.warnings.iter().cloned())
            .collect()
    }

    /// Symbols whose net position is open (beyond the rounding tolerance)
    /// with lots remaining to value.
    #[must_use]
    pub fn open_positions(&self) -> Vec<&SymbolMatchResult> {
        self.per_symbol
            .values()
            .filter(|r| r.position > POSITION_EPSILON && !r.open_lots.is_empty())
            .collect()
    }
}

/// Match every symbol in a normalized trade sequence.
///
/// `trades` must be in chronological order overall (the normalizer's stable
/// sort); grouping preserves each symbol's relative order, and symbols are
/// matched in parallel since they share no state.
#[must_use]
pub fn match_ledger(trades: &[Trade]) -> MatchOutcome {
    let mut grouped: BTreeMap<Symbol, Vec<Trade>> = BTreeMap::new();
    for trade in trades {
        grouped
            .entry(trade.symbol.clone())
            .or_default()
            .push(trade.clone());
    }

    let results: Vec<SymbolMatchResult> = grouped
        .into_iter()
        .collect::<Vec<_>>()
        .into_par_iter()
        .map(|(symbol, symbol_trades)| match_symbol(symbol, &symbol_trades))
        .collect();

    let mut per_symbol = BTreeMap::new();
    for result in results {
        per_symbol.insert(result.symbol.clone(), result);
    }

    MatchOutcome { per_symbol }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::TradeSide;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn trade(symbol: &str, day: u32, quantity: Decimal, pnl: Option<Decimal>) -> Trade {
        let side = if quantity > Decimal::ZERO {
            TradeSide::Buy
        } else {
            TradeSide::Sell
        };
        Trade {
            symbol: Symbol::new(symbol),
            executed_at: Utc.with_ymd_and_hms(2024, 3, day, 0, 0, 0).unwrap(),
            quantity,
            price: dec!(100),
            commission: dec!(-0.35),
            realized_pnl: pnl,
            side,
        }
    }

    #[test]
    fn match_ledger_keeps_symbols_independent() {
        let trades = vec![
            trade("AAPL", 1, dec!(100), None),
            trade("MSFT", 1, dec!(10), None),
            trade("AAPL", 2, dec!(-100), Some(dec!(50))),
        ];

        let outcome = match_ledger(&trades);
        assert_eq!(outcome.per_symbol.len(), 2);
        assert!(outcome.per_symbol[&Symbol::new("AAPL")].open_lots.is_empty());
        assert_eq!(outcome.per_symbol[&Symbol::new("MSFT")].position, dec!(10));
    }

    #[test]
    fn chronological_matches_merge_across_symbols() {
        let trades = vec![
            trade("MSFT", 1, dec!(10), None),
            trade("AAPL", 1, dec!(100), None),
            trade("MSFT", 2, dec!(-10), Some(dec!(25))),
            trade("AAPL", 3, dec!(-100), Some(dec!(50))),
        ];

        let outcome = match_ledger(&trades);
        let matches = outcome.chronological_matches();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].symbol.as_str(), "MSFT");
        assert_eq!(matches[1].symbol.as_str(), "AAPL");
    }

    #[test]
    fn open_positions_respects_epsilon() {
        let mut trades = vec![trade("AAPL", 1, dec!(100), None)];
        // Residual dust below the tolerance must read as flat.
        trades.push(trade("AAPL", 2, dec!(-99.9999995), Some(dec!(10))));

        let outcome = match_ledger(&trades);
        assert!(outcome.open_positions().is_empty());
    }

    #[test]
    fn match_ledger_is_deterministic() {
        let trades = vec![
            trade("MSFT", 1, dec!(10), None),
            trade("AAPL", 1, dec!(100), None),
            trade("AAPL", 2, dec!(-40), Some(dec!(20))),
            trade("MSFT", 3, dec!(-10), Some(dec!(30))),
        ];

        let first = match_ledger(&trades);
        let second = match_ledger(&trades);
        assert_eq!(
            first.chronological_matches(),
            second.chronological_matches()
        );
        assert_eq!(first.warnings(), second.warnings());
    }
}
