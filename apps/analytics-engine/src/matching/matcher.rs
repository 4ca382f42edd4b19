//! FIFO lot matcher for one symbol's trade stream.
//!
//! The matcher maintains a queue of open lots. Buys push a lot with a
//! commission-inclusive cost per share; sells consume lots from the front,
//! oldest first. Realized P&L on a match is read from the sell fill itself;
//! the ledger value is authoritative and already net of commissions, so lot
//! costs only ever drive the cost basis of what remains open.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ledger::{Symbol, Trade};

use super::lot::Lot;

/// The result of one sell consuming one or more open lots.
///
/// Emitted only for sells that recorded nonzero realized P&L; break-even or
/// adjustment sells still consume lots but produce no match event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedLotMatch {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// When the closing fill executed.
    pub closed_at: DateTime<Utc>,
    /// Shares actually matched against open lots.
    pub quantity: Decimal,
    /// Weighted commission-inclusive entry cost per matched share.
    pub entry_cost: Decimal,
    /// Exit fill price.
    pub exit_price: Decimal,
    /// Realized P&L from the ledger row, net of commissions.
    pub realized_pnl: Decimal,
    /// Commission magnitude attributed to the round trip: the entry
    /// commission share of the consumed lots plus the exit fill commission.
    pub commission: Decimal,
}

/// Data-integrity warning: a sell exceeded the open lot quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OversoldWarning {
    /// Affected symbol.
    pub symbol: Symbol,
    /// When the oversized sell executed.
    pub occurred_at: DateTime<Utc>,
    /// Shares sold beyond what open lots could supply.
    pub excess: Decimal,
}

impl std::fmt::Display for OversoldWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}: sell at {} exceeds open lots by {} shares",
            self.symbol, self.occurred_at, self.excess
        )
    }
}

/// Outcome of matching one symbol's complete trade stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolMatchResult {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Match events in time order.
    pub matches: Vec<ClosedLotMatch>,
    /// Remaining open lots, oldest first.
    pub open_lots: Vec<Lot>,
    /// Net signed quantity across all fills.
    pub position: Decimal,
    /// Oversell warnings raised during the pass.
    pub warnings: Vec<OversoldWarning>,
}

impl SymbolMatchResult {
    /// Weighted average cost per share of the remaining open lots.
    #[must_use]
    pub fn average_cost(&self) -> Option<Decimal> {
        super::lot::average_cost(&self.open_lots)
    }
}

/// Match one symbol's trades in FIFO order.
///
/// `trades` must already be in chronological order (stable on ties), which
/// the normalizer guarantees. Fills for other symbols are ignored.
#[must_use]
pub fn match_symbol(symbol: Symbol, trades: &[Trade]) -> SymbolMatchResult {
    let mut lots: VecDeque<Lot> = VecDeque::new();
    let mut matches = Vec::new();
    let mut warnings = Vec::new();
    let mut position = Decimal::ZERO;

    for trade in trades.iter().filter(|t| t.symbol == symbol) {
        position += trade.quantity;

        if trade.is_buy() {
            lots.push_back(open_lot(trade));
            continue;
        }

        let consumed = consume_lots(&mut lots, trade.quantity.abs());

        if consumed.shortfall > Decimal::ZERO {
            let warning = OversoldWarning {
                symbol: symbol.clone(),
                occurred_at: trade.executed_at,
                excess: consumed.shortfall,
            };
            warn!(symbol = %symbol, excess = %consumed.shortfall, "Oversold position");
            warnings.push(warning);
        }

        // Break-even and adjustment sells consume lots for cost-basis
        // purposes but close no P&L-bearing trade.
        let realized_pnl = trade.realized_pnl_or_zero();
        if realized_pnl.is_zero() {
            continue;
        }

        let entry_cost = if consumed.quantity > Decimal::ZERO {
            consumed.cost / consumed.quantity
        } else {
            Decimal::ZERO
        };

        matches.push(ClosedLotMatch {
            symbol: symbol.clone(),
            closed_at: trade.executed_at,
            quantity: consumed.quantity,
            entry_cost,
            exit_price: trade.price,
            realized_pnl,
            commission: consumed.commission + trade.commission_magnitude(),
        });
    }

    SymbolMatchResult {
        symbol,
        matches,
        open_lots: lots.into_iter().collect(),
        position,
        warnings,
    }
}

fn open_lot(trade: &Trade) -> Lot {
    let commission_per_share = trade.commission_magnitude() / trade.quantity;
    Lot {
        quantity: trade.quantity,
        cost_per_share: trade.price + commission_per_share,
        commission_per_share,
        opened_at: trade.executed_at,
    }
}

/// Shares, cost, and commission pulled from the front of the lot queue.
struct Consumed {
    quantity: Decimal,
    cost: Decimal,
    commission: Decimal,
    shortfall: Decimal,
}

fn consume_lots(lots: &mut VecDeque<Lot>, sell_quantity: Decimal) -> Consumed {
    let mut remaining = sell_quantity;
    let mut quantity = Decimal::ZERO;
    let mut cost = Decimal::ZERO;
    let mut commission = Decimal::ZERO;

    while remaining > Decimal::ZERO {
        let Some(front) = lots.front_mut() else {
            break;
        };

        let take = remaining.min(front.quantity);
        quantity += take;
        cost += take * front.cost_per_share;
        commission += take * front.commission_per_share;
        remaining -= take;

        if front.quantity > take {
            front.quantity -= take;
        } else {
            lots.pop_front();
        }
    }

    Consumed {
        quantity,
        cost,
        commission,
        shortfall: remaining,
    }
}
