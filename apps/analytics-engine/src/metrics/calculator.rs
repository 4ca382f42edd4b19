//! Realized metrics aggregation over closed-trade P&L values.

use rust_decimal::Decimal;

use super::constants::{FEAR_WIN_FRACTION, HUNDRED};
use super::grade::grade_distribution;
use super::math::mean;
use super::types::RealizedSummary;
use crate::matching::ClosedLotMatch;

/// Aggregate closed matches into a realized performance summary.
///
/// Wins are P&L > 0, losses P&L < 0; exact zeros count toward the trade
/// total only. Date or symbol filtering, when wanted, happens before this
/// stage.
#[must_use]
pub fn summarize_matches(matches: &[ClosedLotMatch]) -> RealizedSummary {
    if matches.is_empty() {
        return RealizedSummary::default();
    }

    let mut gross_profit = Decimal::ZERO;
    let mut gross_loss = Decimal::ZERO;
    let mut winning = 0u64;
    let mut losing = 0u64;
    let mut breakeven = 0u64;
    let mut largest_win = Decimal::ZERO;
    let mut largest_loss = Decimal::ZERO;
    let mut wins: Vec<Decimal> = Vec::new();

    for m in matches {
        let pnl = m.realized_pnl;
        if pnl > Decimal::ZERO {
            winning += 1;
            gross_profit += pnl;
            largest_win = largest_win.max(pnl);
            wins.push(pnl);
        } else if pnl < Decimal::ZERO {
            losing += 1;
            gross_loss += pnl.abs();
            largest_loss = largest_loss.max(pnl.abs());
        } else {
            breakeven += 1;
        }
    }

    let total_trades = matches.len() as u64;
    let win_rate = Decimal::from(winning) / Decimal::from(total_trades);

    let avg_win = if winning > 0 {
        gross_profit / Decimal::from(winning)
    } else {
        Decimal::ZERO
    };

    let avg_loss = if losing > 0 {
        gross_loss / Decimal::from(losing)
    } else {
        Decimal::ZERO
    };

    let profit_factor = if gross_loss > Decimal::ZERO {
        Some(gross_profit / gross_loss)
    } else {
        None
    };

    let risk_reward = if avg_loss > Decimal::ZERO {
        Some(avg_win / avg_loss)
    } else {
        None
    };

    // Expectancy = (WinRate * AvgWin) - (LossRate * AvgLoss), AvgLoss held
    // as a magnitude.
    let loss_rate = Decimal::ONE - win_rate;
    let expectancy = (win_rate * avg_win) - (loss_rate * avg_loss);

    let fear_index = fear_index(&wins);

    let total_commission: Decimal = matches.iter().map(|m| m.commission).sum();

    RealizedSummary {
        total_trades,
        winning_trades: winning,
        losing_trades: losing,
        breakeven_trades: breakeven,
        win_rate,
        gross_profit,
        gross_loss,
        avg_win,
        avg_loss,
        largest_win,
        largest_loss,
        profit_factor,
        risk_reward,
        expectancy,
        fear_index,
        grade_distribution: grade_distribution(matches),
        total_commission,
    }
}

/// Percentage of wins that fell below 30% of the average win.
///
/// A high value means winners were habitually cut early. `None` with no
/// winning trades.
fn fear_index(wins: &[Decimal]) -> Option<Decimal> {
    let avg_win = mean(wins)?;
    if avg_win <= Decimal::ZERO {
        return None;
    }

    let threshold = avg_win * FEAR_WIN_FRACTION;
    let small_wins = wins.iter().filter(|w| **w < threshold).count();
    Some(Decimal::from(small_wins as u64) / Decimal::from(wins.len() as u64) * HUNDRED)
}
