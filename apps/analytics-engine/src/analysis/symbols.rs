//! Per-symbol performance aggregates.
//!
//! Aggregated over the full trade list, not just closed matches, so that
//! commission paid on still-open entries is attributed to its symbol.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::{Symbol, Trade};
use crate::matching::POSITION_EPSILON;

/// Realized performance rollup for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolPerformance {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Number of realized (P&L-bearing) fills.
    pub trades: u64,
    /// Net realized P&L across all fills.
    pub net_pnl: Decimal,
    /// Total commission magnitude across all fills, open entries included.
    pub fees: Decimal,
    /// Winning realized fills.
    pub wins: u64,
    /// Losing realized fills.
    pub losses: u64,
    /// Win rate over realized fills (decimal fraction).
    pub win_rate: Decimal,
    /// Best single realized P&L.
    pub best_trade: Decimal,
    /// Worst single realized P&L.
    pub worst_trade: Decimal,
    /// Net signed open quantity.
    pub open_position: Decimal,
    /// Whether the symbol still has an open position.
    pub has_open_position: bool,
    /// Average realized P&L per realized fill.
    pub avg_pnl: Decimal,
}

/// Roll the trade list up per symbol, sorted by net P&L descending.
#[must_use]
pub fn symbol_performance(trades: &[Trade]) -> Vec<SymbolPerformance> {
    let mut by_symbol: BTreeMap<Symbol, SymbolPerformance> = BTreeMap::new();

    for trade in trades {
        let entry = by_symbol
            .entry(trade.symbol.clone())
            .or_insert_with(|| SymbolPerformance {
                symbol: trade.symbol.clone(),
                trades: 0,
                net_pnl: Decimal::ZERO,
                fees: Decimal::ZERO,
                wins: 0,
                losses: 0,
                win_rate: Decimal::ZERO,
                best_trade: Decimal::ZERO,
                worst_trade: Decimal::ZERO,
                open_position: Decimal::ZERO,
                has_open_position: false,
                avg_pnl: Decimal::ZERO,
            });

        entry.fees += trade.commission_magnitude();
        entry.open_position += trade.quantity;

        let pnl = trade.realized_pnl_or_zero();
        entry.net_pnl += pnl;
        if !pnl.is_zero() {
            entry.trades += 1;
            if pnl > Decimal::ZERO {
                entry.wins += 1;
                entry.best_trade = entry.best_trade.max(pnl);
            } else {
                entry.losses += 1;
                entry.worst_trade = entry.worst_trade.min(pnl);
            }
        }
    }

    let mut rollups: Vec<SymbolPerformance> = by_symbol
        .into_values()
        .map(|mut rollup| {
            if rollup.trades > 0 {
                rollup.win_rate = Decimal::from(rollup.wins) / Decimal::from(rollup.trades);
                rollup.avg_pnl = rollup.net_pnl / Decimal::from(rollup.trades);
            }
            rollup.has_open_position = rollup.open_position > POSITION_EPSILON;
            rollup
        })
        .collect();

    // Net P&L descending; symbol order breaks ties deterministically.
    rollups.sort_by(|a, b| {
        b.net_pnl
            .cmp(&a.net_pnl)
            .then_with(|| a.symbol.cmp(&b.symbol))
    });
    rollups
}
