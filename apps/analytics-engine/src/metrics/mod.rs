//! Realized performance metrics over closed-trade P&L values.
//!
//! Implements the closed-trade statistics the engine reports:
//! - Win/loss counts, win rate, gross profit and loss
//! - Profit factor, risk/reward, and expectancy
//! - Fear index (winners cut below 30% of the average win)
//! - Per-trade letter grades against each trade's own commission
//! - Equity curve, maximum drawdown, drawdown duration, and streaks
//!
//! Undefined ratios (no losses, no wins) are `Option::None`, never a
//! division fault or numeric sentinel.

mod calculator;
mod constants;
mod equity;
mod format;
mod grade;
mod math;
mod types;

pub use calculator::summarize_matches;
pub use equity::{EquityAnalysis, analyze_equity, collapse_daily};
pub use format::{format_decimal, format_pct, format_ratio, summary_line};
pub use grade::{TradeGrade, grade_distribution, grade_match, grade_trade};
pub use types::{DrawdownPoint, EquityPoint, RealizedSummary};
