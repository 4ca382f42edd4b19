//! Normalized trade record types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::symbol::Symbol;

/// Trade side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeSide {
    /// Opening fill (positive quantity).
    Buy,
    /// Closing fill (negative quantity).
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
        }
    }
}

/// One validated trade execution, immutable once normalized.
///
/// Quantity is signed: positive quantities are buys, negative are sells.
/// Commission is non-positive (a cost). Realized P&L is present only on
/// closing fills and is authoritative: it is already net of entry and exit
/// commissions and is never recomputed downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Execution timestamp (date-only rows are midnight UTC).
    pub executed_at: DateTime<Utc>,
    /// Signed fill quantity.
    pub quantity: Decimal,
    /// Fill price per share (> 0).
    pub price: Decimal,
    /// Commission for this fill (≤ 0).
    pub commission: Decimal,
    /// Realized P&L for closing fills, `None` for non-closing rows.
    pub realized_pnl: Option<Decimal>,
    /// Trade side.
    pub side: TradeSide,
}

impl Trade {
    /// Check if this is an opening fill.
    #[must_use]
    pub fn is_buy(&self) -> bool {
        self.side == TradeSide::Buy
    }

    /// Check if this is a closing fill.
    #[must_use]
    pub fn is_sell(&self) -> bool {
        self.side == TradeSide::Sell
    }

    /// Commission magnitude for this fill (always ≥ 0).
    #[must_use]
    pub fn commission_magnitude(&self) -> Decimal {
        self.commission.abs()
    }

    /// Realized P&L, treating absent as zero.
    #[must_use]
    pub fn realized_pnl_or_zero(&self) -> Decimal {
        self.realized_pnl.unwrap_or(Decimal::ZERO)
    }
}
