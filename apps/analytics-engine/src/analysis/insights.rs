//! Plain-text insight generation from computed metrics.
//!
//! Threshold commentary for the report surface. Every threshold here is a
//! reporting convention, not an input to any calculation.

use rust_decimal::Decimal;

use crate::metrics::{EquityAnalysis, RealizedSummary, format_decimal};

use super::LedgerTotals;
use super::periods::WeekdayPerformance;

const LOW_WIN_RATE: Decimal = Decimal::from_parts(4, 0, 0, false, 1); // 0.40
const HIGH_WIN_RATE: Decimal = Decimal::from_parts(7, 0, 0, false, 1); // 0.70
const LOW_RISK_REWARD: Decimal = Decimal::from_parts(15, 0, 0, false, 1); // 1.5
const HIGH_RISK_REWARD: Decimal = Decimal::from_parts(25, 0, 0, false, 1); // 2.5
const STRONG_PROFIT_FACTOR: Decimal = Decimal::from_parts(2, 0, 0, false, 0);
const HIGH_FEAR_INDEX: Decimal = Decimal::from_parts(50, 0, 0, false, 0);
const HIGH_COMMISSION_SHARE: Decimal = Decimal::from_parts(3, 0, 0, false, 1); // 0.30
const LONG_LOSS_STREAK: u64 = 5;

/// Generate report commentary from the computed metrics.
#[must_use]
pub fn generate_insights(
    summary: &RealizedSummary,
    equity: &EquityAnalysis,
    totals: &LedgerTotals,
    weekdays: &[WeekdayPerformance],
) -> Vec<String> {
    let mut insights = Vec::new();

    if summary.total_trades == 0 {
        insights.push("No closed trades in the selected ledger.".to_string());
        return insights;
    }

    if summary.win_rate < LOW_WIN_RATE {
        insights.push("Win rate below 40%; trade selection needs work.".to_string());
    } else if summary.win_rate > HIGH_WIN_RATE {
        insights.push("Win rate above 70%; strong trade selection.".to_string());
    }

    if summary.avg_win > Decimal::ZERO {
        match summary.risk_reward {
            Some(rr) if rr < LOW_RISK_REWARD => insights.push(
                "Risk/reward below 1.5:1; losses run large relative to wins.".to_string(),
            ),
            Some(rr) if rr > HIGH_RISK_REWARD => {
                insights.push("Risk/reward above 2.5:1.".to_string());
            }
            _ => {}
        }
    }

    match summary.profit_factor {
        Some(pf) if pf < Decimal::ONE => {
            insights.push("Profit factor below 1; the ledger is net unprofitable.".to_string());
        }
        Some(pf) if pf > STRONG_PROFIT_FACTOR => {
            insights.push("Profit factor above 2.".to_string());
        }
        _ => {}
    }

    if let Some(fear) = summary.fear_index {
        if fear > HIGH_FEAR_INDEX {
            insights.push("Fear index above 50%; winners are being cut early.".to_string());
        }
    }

    if let Some(share) = totals.commission_share_of_pnl {
        if share > HIGH_COMMISSION_SHARE {
            insights.push(
                "Commissions consume over 30% of net P&L; reduce frequency or size up.".to_string(),
            );
        }
    }

    if equity.max_loss_streak >= LONG_LOSS_STREAK {
        insights.push(format!(
            "Losing streak of {} trades.",
            equity.max_loss_streak
        ));
    }

    if summary.expectancy > Decimal::ZERO {
        insights.push(format!(
            "Positive expectancy (${} per trade).",
            format_decimal(summary.expectancy)
        ));
    } else {
        insights.push(format!(
            "Negative expectancy (${} per trade).",
            format_decimal(summary.expectancy)
        ));
    }

    if let Some(best) = weekdays.iter().max_by_key(|w| w.total_pnl) {
        insights.push(format!("Best day: {}", best.weekday));
    }

    insights
}
