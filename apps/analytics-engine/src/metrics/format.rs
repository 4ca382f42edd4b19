//! Formatting utilities for metric display.

use rust_decimal::Decimal;

use super::constants::HUNDRED;
use super::types::RealizedSummary;

/// Format a decimal fraction as a percentage string.
#[must_use]
pub fn format_pct(value: Decimal) -> String {
    format!("{:.2}%", value * HUNDRED)
}

/// Format a decimal with 2 decimal places.
#[must_use]
pub fn format_decimal(value: Decimal) -> String {
    format!("{value:.2}")
}

/// Format an optional ratio; undefined ratios render as "N/A".
#[must_use]
pub fn format_ratio(value: Option<Decimal>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| format!("{v:.2}"))
}

/// One-line summary for logs and dashboards.
#[must_use]
pub fn summary_line(summary: &RealizedSummary) -> String {
    format!(
        "trades: {} | win rate: {} | PF: {} | R/R: {} | expectancy: {} | fear: {}",
        summary.total_trades,
        format_pct(summary.win_rate),
        format_ratio(summary.profit_factor),
        format_ratio(summary.risk_reward),
        format_decimal(summary.expectancy),
        summary
            .fear_index
            .map_or_else(|| "N/A".to_string(), |f| format!("{f:.0}%")),
    )
}
