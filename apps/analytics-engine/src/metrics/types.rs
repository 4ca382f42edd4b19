//! Core types for realized performance metrics.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::grade::TradeGrade;

/// Equity curve point: cumulative realized P&L up to and including a close.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquityPoint {
    /// Timestamp of the close.
    pub timestamp: DateTime<Utc>,
    /// Cumulative realized P&L.
    pub equity: Decimal,
}

/// Drawdown tracking point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrawdownPoint {
    /// Timestamp.
    pub timestamp: DateTime<Utc>,
    /// Equity value.
    pub equity: Decimal,
    /// Peak equity so far.
    pub peak: Decimal,
    /// Current drawdown in dollars (peak − equity, ≥ 0).
    pub drawdown: Decimal,
}

/// Summary of realized (closed-trade) performance.
///
/// Ratios with a zero denominator are `None`, never a sentinel number:
/// `profit_factor` and `risk_reward` are undefined without losing trades,
/// `fear_index` without winning trades.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealizedSummary {
    /// Total number of closed trades (zero-P&L rows included).
    pub total_trades: u64,
    /// Number of winning trades (P&L > 0).
    pub winning_trades: u64,
    /// Number of losing trades (P&L < 0).
    pub losing_trades: u64,
    /// Number of exactly break-even trades.
    pub breakeven_trades: u64,
    /// Win rate (decimal, e.g., 0.55 = 55%).
    pub win_rate: Decimal,
    /// Gross profit (sum of winning P&L).
    pub gross_profit: Decimal,
    /// Gross loss (positive value).
    pub gross_loss: Decimal,
    /// Average winning trade.
    pub avg_win: Decimal,
    /// Average losing trade (positive value).
    pub avg_loss: Decimal,
    /// Largest single win.
    pub largest_win: Decimal,
    /// Largest single loss (positive value).
    pub largest_loss: Decimal,
    /// Profit factor (gross profit / gross loss); `None` with no losses.
    pub profit_factor: Option<Decimal>,
    /// Risk/reward ratio (avg win / avg loss); `None` with no losses.
    pub risk_reward: Option<Decimal>,
    /// Expectancy per trade.
    pub expectancy: Decimal,
    /// Share of wins below 30% of the average win, as a percentage
    /// (0–100); `None` with no wins.
    pub fear_index: Option<Decimal>,
    /// Grade counts across closed trades.
    pub grade_distribution: BTreeMap<TradeGrade, u64>,
    /// Total round-trip commission across closed trades (positive value).
    pub total_commission: Decimal,
}

impl Default for RealizedSummary {
    fn default() -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            breakeven_trades: 0,
            win_rate: Decimal::ZERO,
            gross_profit: Decimal::ZERO,
            gross_loss: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            largest_win: Decimal::ZERO,
            largest_loss: Decimal::ZERO,
            profit_factor: None,
            risk_reward: None,
            expectancy: Decimal::ZERO,
            fear_index: None,
            grade_distribution: BTreeMap::new(),
            total_commission: Decimal::ZERO,
        }
    }
}
