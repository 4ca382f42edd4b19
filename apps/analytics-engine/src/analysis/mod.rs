//! Pipeline orchestration and the analysis report.
//!
//! One synchronous pass: normalize → match → metrics → equity → report.
//! Holdings valuation is deliberately separate: it is the only stage that
//! talks to the outside world (see [`crate::holdings`]).

mod export;
mod insights;
mod periods;
mod symbols;

pub use export::matches_to_csv;
pub use insights::generate_insights;
pub use periods::{MonthPerformance, WeekdayPerformance, monthly_performance, weekday_performance};
pub use symbols::{SymbolPerformance, symbol_performance};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::ledger::{NormalizedLedger, RawTradeRow, Trade, normalize_rows};
use crate::matching::{ClosedLotMatch, MatchOutcome, OversoldWarning, match_ledger};
use crate::metrics::{
    EquityAnalysis, EquityPoint, RealizedSummary, analyze_equity, collapse_daily,
    summarize_matches,
};

/// Number of entries in the top winners/losers tables.
const TOP_TRADES: usize = 5;

/// Ledger-wide totals over every row, open entries included.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerTotals {
    /// Normalized rows analyzed.
    pub rows: u64,
    /// Rows dropped during normalization.
    pub skipped_rows: u64,
    /// Net realized P&L summed over every row (already net of commissions).
    pub net_realized_pnl: Decimal,
    /// Total commission magnitude over every row.
    pub total_commission: Decimal,
    /// Commission as a fraction of absolute net P&L; `None` when net P&L
    /// is zero.
    pub commission_share_of_pnl: Option<Decimal>,
    /// Average commission magnitude per row.
    pub avg_commission_per_row: Decimal,
}

/// A skipped row in report form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedRowReport {
    /// 1-based data row number.
    pub row: usize,
    /// Human-readable reason.
    pub reason: String,
}

/// Everything the presentation layer consumes from one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Ledger-wide totals.
    pub totals: LedgerTotals,
    /// Realized performance summary.
    pub summary: RealizedSummary,
    /// Equity curve, drawdown, and streaks.
    pub equity: EquityAnalysis,
    /// Equity curve collapsed to one closing point per day, for charting.
    pub daily_curve: Vec<EquityPoint>,
    /// Closed matches in time order.
    pub matches: Vec<ClosedLotMatch>,
    /// Per-symbol rollups, net P&L descending.
    pub symbols: Vec<SymbolPerformance>,
    /// Day-of-week rollups.
    pub weekdays: Vec<WeekdayPerformance>,
    /// Calendar-month rollups.
    pub months: Vec<MonthPerformance>,
    /// Five largest wins.
    pub top_winners: Vec<ClosedLotMatch>,
    /// Five largest losses.
    pub top_losers: Vec<ClosedLotMatch>,
    /// Threshold commentary.
    pub insights: Vec<String>,
    /// Rows dropped during normalization.
    pub skipped_rows: Vec<SkippedRowReport>,
    /// Oversell warnings raised during matching.
    pub oversells: Vec<OversoldWarning>,
}

/// One full analysis pass: the report plus the match outcome the holdings
/// valuator consumes.
#[derive(Debug, Clone)]
pub struct LedgerAnalysis {
    /// The presentation-facing report.
    pub report: AnalysisReport,
    /// Per-symbol matching state (open lots, positions).
    pub outcome: MatchOutcome,
}

/// Analyze raw ledger rows end to end.
#[must_use]
pub fn analyze_rows(rows: &[RawTradeRow]) -> LedgerAnalysis {
    analyze_ledger(&normalize_rows(rows))
}

/// Analyze an already-normalized ledger.
#[must_use]
pub fn analyze_ledger(ledger: &NormalizedLedger) -> LedgerAnalysis {
    let outcome = match_ledger(&ledger.trades);
    let matches = outcome.chronological_matches();

    info!(
        trades = ledger.trades.len(),
        skipped = ledger.skipped.len(),
        closed = matches.len(),
        "Analyzed ledger"
    );

    let totals = ledger_totals(&ledger.trades, ledger.skipped.len() as u64);
    let summary = summarize_matches(&matches);
    let equity = analyze_equity(&matches);
    let daily_curve = collapse_daily(&equity.curve);
    let symbols = symbol_performance(&ledger.trades);
    let weekdays = weekday_performance(&matches);
    let months = monthly_performance(&matches);
    let (top_winners, top_losers) = top_trades(&matches);
    let insights = generate_insights(&summary, &equity, &totals, &weekdays);

    let skipped_rows = ledger
        .skipped
        .iter()
        .map(|s| SkippedRowReport {
            row: s.row,
            reason: s.reason.to_string(),
        })
        .collect();

    let report = AnalysisReport {
        totals,
        summary,
        equity,
        daily_curve,
        matches,
        symbols,
        weekdays,
        months,
        top_winners,
        top_losers,
        insights,
        skipped_rows,
        oversells: outcome.warnings(),
    };

    LedgerAnalysis { report, outcome }
}

fn ledger_totals(trades: &[Trade], skipped_rows: u64) -> LedgerTotals {
    let rows = trades.len() as u64;
    let net_realized_pnl: Decimal = trades.iter().map(Trade::realized_pnl_or_zero).sum();
    let total_commission: Decimal = trades.iter().map(Trade::commission_magnitude).sum();

    let commission_share_of_pnl = if net_realized_pnl.is_zero() {
        None
    } else {
        Some(total_commission / net_realized_pnl.abs())
    };

    let avg_commission_per_row = if rows > 0 {
        total_commission / Decimal::from(rows)
    } else {
        Decimal::ZERO
    };

    LedgerTotals {
        rows,
        skipped_rows,
        net_realized_pnl,
        total_commission,
        commission_share_of_pnl,
        avg_commission_per_row,
    }
}

fn top_trades(matches: &[ClosedLotMatch]) -> (Vec<ClosedLotMatch>, Vec<ClosedLotMatch>) {
    let mut by_pnl: Vec<ClosedLotMatch> = matches.to_vec();
    by_pnl.sort_by(|a, b| b.realized_pnl.cmp(&a.realized_pnl));

    let winners = by_pnl
        .iter()
        .filter(|m| m.realized_pnl > Decimal::ZERO)
        .take(TOP_TRADES)
        .cloned()
        .collect();
    let losers = by_pnl
        .iter()
        .rev()
        .filter(|m| m.realized_pnl < Decimal::ZERO)
        .take(TOP_TRADES)
        .cloned()
        .collect();

    (winners, losers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn raw_row(
        symbol: &str,
        date: &str,
        qty: &str,
        price: &str,
        pnl: &str,
        side: &str,
    ) -> RawTradeRow {
        RawTradeRow {
            symbol: symbol.to_string(),
            trade_date: date.to_string(),
            quantity: qty.to_string(),
            trade_price: price.to_string(),
            commission: "-0.35".to_string(),
            realized_pnl: pnl.to_string(),
            side: side.to_string(),
        }
    }

    fn sample_rows() -> Vec<RawTradeRow> {
        vec![
            raw_row("AAPL", "2024-03-01", "100", "150.00", "", "BUY"),
            raw_row("AAPL", "2024-03-04", "-60", "155.00", "299.30", "SELL"),
            raw_row("AAPL", "2024-03-05", "-40", "148.00", "-80.70", "SELL"),
            raw_row("MSFT", "2024-03-01", "10", "400.00", "", "BUY"),
        ]
    }

    #[test]
    fn analyze_rows_end_to_end() {
        let analysis = analyze_rows(&sample_rows());
        let report = &analysis.report;

        assert_eq!(report.totals.rows, 4);
        assert_eq!(report.matches.len(), 2);
        assert_eq!(report.summary.total_trades, 2);
        assert_eq!(report.summary.winning_trades, 1);
        assert_eq!(report.summary.losing_trades, 1);
        assert_eq!(report.equity.curve.len(), 2);
        assert!(report.oversells.is_empty());

        // MSFT is still open.
        let open = analysis.outcome.open_positions();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].symbol.as_str(), "MSFT");
    }

    #[test]
    fn accounting_identity_holds() {
        let analysis = analyze_rows(&sample_rows());
        let matched_pnl: Decimal = analysis
            .report
            .matches
            .iter()
            .map(|m| m.realized_pnl)
            .sum();
        assert_eq!(matched_pnl, analysis.report.totals.net_realized_pnl);
        assert_eq!(matched_pnl, dec!(218.60));
    }

    #[test]
    fn skipped_rows_are_reported_not_fatal() {
        let mut rows = sample_rows();
        rows.push(raw_row("", "2024-03-06", "10", "100.00", "", "BUY"));

        let analysis = analyze_rows(&rows);
        assert_eq!(analysis.report.totals.rows, 4);
        assert_eq!(analysis.report.totals.skipped_rows, 1);
        assert_eq!(analysis.report.skipped_rows.len(), 1);
        assert!(analysis.report.skipped_rows[0].reason.contains("Symbol"));
    }

    #[test]
    fn totals_cover_open_entries() {
        let analysis = analyze_rows(&sample_rows());
        // Four rows at $0.35 each, including the open MSFT entry.
        assert_eq!(analysis.report.totals.total_commission, dec!(1.40));
        assert_eq!(analysis.report.totals.avg_commission_per_row, dec!(0.35));
    }

    #[test]
    fn top_trades_split_winners_and_losers() {
        let analysis = analyze_rows(&sample_rows());
        assert_eq!(analysis.report.top_winners.len(), 1);
        assert_eq!(analysis.report.top_winners[0].realized_pnl, dec!(299.30));
        assert_eq!(analysis.report.top_losers.len(), 1);
        assert_eq!(analysis.report.top_losers[0].realized_pnl, dec!(-80.70));
    }

    #[test]
    fn report_serializes_to_json() {
        let analysis = analyze_rows(&sample_rows());
        let json = serde_json::to_string(&analysis.report).unwrap();
        assert!(json.contains("\"totals\""));
        assert!(json.contains("\"AAPL\""));
    }

    #[test]
    fn rerun_is_bit_identical() {
        let rows = sample_rows();
        let first = serde_json::to_string(&analyze_rows(&rows).report).unwrap();
        let second = serde_json::to_string(&analyze_rows(&rows).report).unwrap();
        assert_eq!(first, second);
    }
}
