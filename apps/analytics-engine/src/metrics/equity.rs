//! Equity curve construction, drawdown, and streak analysis.
//!
//! The curve is the cumulative sum of realized P&L over closed matches in
//! time order, starting from a zero baseline. Drawdown is measured against
//! the running peak; the duration of the worst episode runs from the peak to
//! full recovery or, if equity never regains that peak, to the end of the
//! series.

use chrono::Timelike;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::types::{DrawdownPoint, EquityPoint};
use crate::matching::ClosedLotMatch;

/// Equity and drawdown analysis over a closed-match sequence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquityAnalysis {
    /// Cumulative equity, one point per closed match.
    pub curve: Vec<EquityPoint>,
    /// Per-point drawdown against the running peak.
    pub drawdowns: Vec<DrawdownPoint>,
    /// Maximum drawdown in dollars.
    pub max_drawdown: Decimal,
    /// Maximum drawdown as a fraction of the peak in force when it
    /// occurred; `None` when that peak was not positive.
    pub max_drawdown_pct: Option<Decimal>,
    /// Steps from the governing peak to recovery (or to the series end).
    pub drawdown_duration: u64,
    /// Longest run of consecutive wins.
    pub max_win_streak: u64,
    /// Longest run of consecutive losses.
    pub max_loss_streak: u64,
}

/// Build the equity curve and derive drawdown and streak metrics.
///
/// `matches` must be ordered by close timestamp; same-day trades keep their
/// ledger order and are never reordered by magnitude.
#[must_use]
pub fn analyze_equity(matches: &[ClosedLotMatch]) -> EquityAnalysis {
    let mut curve = Vec::with_capacity(matches.len());
    let mut equity = Decimal::ZERO;
    for m in matches {
        equity += m.realized_pnl;
        curve.push(EquityPoint {
            timestamp: m.closed_at,
            equity,
        });
    }

    let (drawdowns, max_drawdown, max_drawdown_pct, drawdown_duration) = scan_drawdowns(&curve);
    let (max_win_streak, max_loss_streak) = streaks(matches);

    EquityAnalysis {
        curve,
        drawdowns,
        max_drawdown,
        max_drawdown_pct,
        drawdown_duration,
        max_win_streak,
        max_loss_streak,
    }
}

/// Collapse an equity curve to one point per day (the day's closing equity),
/// stamped at midnight UTC.
#[must_use]
pub fn collapse_daily(curve: &[EquityPoint]) -> Vec<EquityPoint> {
    let mut daily: Vec<EquityPoint> = Vec::new();
    for point in curve {
        let day_start = point
            .timestamp
            .with_hour(0)
            .and_then(|t| t.with_minute(0))
            .and_then(|t| t.with_second(0))
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(point.timestamp);

        match daily.last_mut() {
            Some(last) if last.timestamp == day_start => last.equity = point.equity,
            _ => daily.push(EquityPoint {
                timestamp: day_start,
                equity: point.equity,
            }),
        }
    }
    daily
}

/// Scan the curve against an implicit zero baseline.
///
/// Returns the drawdown points, the worst drawdown in dollars, that
/// drawdown as a fraction of its governing peak, and the episode duration
/// in steps.
fn scan_drawdowns(
    curve: &[EquityPoint],
) -> (Vec<DrawdownPoint>, Decimal, Option<Decimal>, u64) {
    let mut drawdowns = Vec::with_capacity(curve.len());

    // Index 0 is the zero baseline; curve points start at step 1.
    let mut peak = Decimal::ZERO;
    let mut peak_step = 0u64;
    let mut max_drawdown = Decimal::ZERO;
    let mut governing_peak = Decimal::ZERO;
    let mut governing_peak_step = 0u64;

    for (idx, point) in curve.iter().enumerate() {
        let step = idx as u64 + 1;
        if point.equity > peak {
            peak = point.equity;
            peak_step = step;
        }

        let drawdown = peak - point.equity;
        if drawdown > max_drawdown {
            max_drawdown = drawdown;
            governing_peak = peak;
            governing_peak_step = peak_step;
        }

        drawdowns.push(DrawdownPoint {
            timestamp: point.timestamp,
            equity: point.equity,
            peak,
            drawdown,
        });
    }

    if max_drawdown.is_zero() {
        return (drawdowns, Decimal::ZERO, None, 0);
    }

    let max_drawdown_pct = if governing_peak > Decimal::ZERO {
        Some(max_drawdown / governing_peak)
    } else {
        None
    };

    // Recovery: first step after the governing peak where equity regains it.
    let last_step = curve.len() as u64;
    let recovery_step = curve
        .iter()
        .enumerate()
        .map(|(idx, p)| (idx as u64 + 1, p))
        .find(|(step, p)| *step > governing_peak_step && p.equity >= governing_peak)
        .map_or(last_step, |(step, _)| step);

    let duration = recovery_step - governing_peak_step;

    (drawdowns, max_drawdown, max_drawdown_pct, duration)
}

/// Longest win and loss runs in chronological order.
///
/// A zero-P&L trade breaks the current streak without starting one of
/// either kind.
fn streaks(matches: &[ClosedLotMatch]) -> (u64, u64) {
    let mut max_wins = 0u64;
    let mut max_losses = 0u64;
    let mut current_wins = 0u64;
    let mut current_losses = 0u64;

    for m in matches {
        if m.realized_pnl > Decimal::ZERO {
            current_wins += 1;
            current_losses = 0;
            max_wins = max_wins.max(current_wins);
        } else if m.realized_pnl < Decimal::ZERO {
            current_losses += 1;
            current_wins = 0;
            max_losses = max_losses.max(current_losses);
        } else {
            current_wins = 0;
            current_losses = 0;
        }
    }

    (max_wins, max_losses)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::Symbol;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn closed_match(day: u32, hour: u32, pnl: Decimal) -> ClosedLotMatch {
        ClosedLotMatch {
            symbol: Symbol::new("AAPL"),
            closed_at: Utc.with_ymd_and_hms(2024, 3, day, hour, 0, 0).unwrap(),
            quantity: dec!(100),
            entry_cost: dec!(150),
            exit_price: dec!(155),
            realized_pnl: pnl,
            commission: dec!(0.70),
        }
    }

    #[test]
    fn curve_is_cumulative() {
        let matches = vec![
            closed_match(1, 10, dec!(1000)),
            closed_match(2, 10, dec!(-400)),
        ];
        let analysis = analyze_equity(&matches);

        assert_eq!(analysis.curve.len(), 2);
        assert_eq!(analysis.curve[0].equity, dec!(1000));
        assert_eq!(analysis.curve[1].equity, dec!(600));
    }

    #[test]
    fn max_drawdown_from_running_peak() {
        // Equity series 0, 1000, 2000, 800, 1500: worst deficit is $1200
        // below the 2000 peak, never recovered, so the episode runs to the
        // series end (2 steps after the peak).
        let matches = vec![
            closed_match(1, 10, dec!(1000)),
            closed_match(2, 10, dec!(1000)),
            closed_match(3, 10, dec!(-1200)),
            closed_match(4, 10, dec!(700)),
        ];
        let analysis = analyze_equity(&matches);

        assert_eq!(analysis.max_drawdown, dec!(1200));
        assert_eq!(analysis.max_drawdown_pct, Some(dec!(0.6)));
        assert_eq!(analysis.drawdown_duration, 2);
    }

    #[test]
    fn drawdown_recovery_ends_the_episode() {
        let matches = vec![
            closed_match(1, 10, dec!(1000)),
            closed_match(2, 10, dec!(-400)),
            closed_match(3, 10, dec!(500)),
        ];
        let analysis = analyze_equity(&matches);

        assert_eq!(analysis.max_drawdown, dec!(400));
        // Peak at step 1, recovered at step 3.
        assert_eq!(analysis.drawdown_duration, 2);
    }

    #[test]
    fn no_drawdown_on_monotonic_curve() {
        let matches = vec![
            closed_match(1, 10, dec!(100)),
            closed_match(2, 10, dec!(200)),
        ];
        let analysis = analyze_equity(&matches);

        assert_eq!(analysis.max_drawdown, Decimal::ZERO);
        assert!(analysis.max_drawdown_pct.is_none());
        assert_eq!(analysis.drawdown_duration, 0);
    }

    #[test]
    fn drawdown_pct_undefined_below_zero_peak() {
        // Straight into the red: the only peak is the zero baseline.
        let matches = vec![closed_match(1, 10, dec!(-500))];
        let analysis = analyze_equity(&matches);

        assert_eq!(analysis.max_drawdown, dec!(500));
        assert!(analysis.max_drawdown_pct.is_none());
    }

    #[test]
    fn streaks_follow_chronology() {
        // W W W L L W
        let matches = vec![
            closed_match(1, 10, dec!(10)),
            closed_match(2, 10, dec!(10)),
            closed_match(3, 10, dec!(10)),
            closed_match(4, 10, dec!(-10)),
            closed_match(5, 10, dec!(-10)),
            closed_match(6, 10, dec!(10)),
        ];
        let analysis = analyze_equity(&matches);

        assert_eq!(analysis.max_win_streak, 3);
        assert_eq!(analysis.max_loss_streak, 2);
    }

    #[test]
    fn zero_pnl_breaks_streaks_without_starting_one() {
        // W W 0 W: the flat trade resets, so the longest win run is 2.
        let matches = vec![
            closed_match(1, 10, dec!(10)),
            closed_match(2, 10, dec!(10)),
            closed_match(3, 10, Decimal::ZERO),
            closed_match(4, 10, dec!(10)),
        ];
        let analysis = analyze_equity(&matches);

        assert_eq!(analysis.max_win_streak, 2);
        assert_eq!(analysis.max_loss_streak, 0);
    }

    #[test]
    fn collapse_daily_takes_last_equity_of_day() {
        let matches = vec![
            closed_match(1, 10, dec!(100)),
            closed_match(1, 14, dec!(50)),
            closed_match(2, 10, dec!(-30)),
        ];
        let analysis = analyze_equity(&matches);
        let daily = collapse_daily(&analysis.curve);

        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].equity, dec!(150));
        assert_eq!(daily[1].equity, dec!(120));
        assert_eq!(daily[0].timestamp.hour(), 0);
    }

    #[test]
    fn empty_matches_produce_empty_analysis() {
        let analysis = analyze_equity(&[]);
        assert!(analysis.curve.is_empty());
        assert_eq!(analysis.max_drawdown, Decimal::ZERO);
        assert_eq!(analysis.max_win_streak, 0);
    }
}
