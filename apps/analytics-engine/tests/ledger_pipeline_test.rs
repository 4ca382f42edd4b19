//! End-to-end pipeline tests over raw ledger rows.

use analytics_engine::analysis::analyze_rows;
use analytics_engine::ledger::RawTradeRow;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn raw_row(
    symbol: &str,
    date: &str,
    qty: &str,
    price: &str,
    commission: &str,
    pnl: &str,
    side: &str,
) -> RawTradeRow {
    RawTradeRow {
        symbol: symbol.to_string(),
        trade_date: date.to_string(),
        quantity: qty.to_string(),
        trade_price: price.to_string(),
        commission: commission.to_string(),
        realized_pnl: pnl.to_string(),
        side: side.to_string(),
    }
}

#[test]
fn fifo_worked_example() {
    // B1(100 @ $150, $0.35 fee), B2(50 @ $160, $0.35 fee), then sell 50.
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("AAPL", "2024-03-02", "50", "160.00", "-0.35", "", "BUY"),
        raw_row("AAPL", "2024-03-05", "-50", "170.00", "-0.35", "999.30", "SELL"),
    ];

    let analysis = analyze_rows(&rows);
    let open = analysis.outcome.open_positions();
    assert_eq!(open.len(), 1);

    let lots = &open[0].open_lots;
    assert_eq!(lots.len(), 2);
    assert_eq!(lots[0].quantity, dec!(50));
    assert_eq!(lots[0].cost_per_share, dec!(150.0035));
    assert_eq!(lots[1].quantity, dec!(50));
    assert_eq!(lots[1].cost_per_share, dec!(160.007));

    let avg = open[0].average_cost().unwrap();
    assert_eq!(avg.round_dp(2), dec!(155.01));
}

#[test]
fn accounting_identity_on_mixed_ledger() {
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("MSFT", "2024-03-01", "20", "400.00", "-0.50", "", "BUY"),
        raw_row("AAPL", "2024-03-04", "-60", "155.00", "-0.35", "299.30", "SELL"),
        raw_row("MSFT", "2024-03-05", "-20", "390.00", "-0.50", "-201.00", "SELL"),
        raw_row("AAPL", "2024-03-06", "-40", "148.00", "-0.35", "-80.70", "SELL"),
    ];

    let analysis = analyze_rows(&rows);
    let matched: Decimal = analysis
        .report
        .matches
        .iter()
        .map(|m| m.realized_pnl)
        .sum();

    assert_eq!(matched, dec!(299.30) + dec!(-201.00) + dec!(-80.70));
    assert_eq!(matched, analysis.report.totals.net_realized_pnl);
}

#[test]
fn equal_timestamp_rows_keep_file_order() {
    // Same-day buys at different prices: FIFO must consume the first-listed
    // lot first, so the surviving lot carries the second price.
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "50", "100.00", "0", "", "BUY"),
        raw_row("AAPL", "2024-03-01", "50", "200.00", "0", "", "BUY"),
        raw_row("AAPL", "2024-03-02", "-50", "210.00", "0", "5500.00", "SELL"),
    ];

    let analysis = analyze_rows(&rows);
    let open = analysis.outcome.open_positions();
    assert_eq!(open[0].open_lots.len(), 1);
    assert_eq!(open[0].open_lots[0].cost_per_share, dec!(200.00));
}

#[test]
fn oversell_is_a_warning_not_a_crash() {
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("AAPL", "2024-03-04", "-150", "155.00", "-0.35", "499.30", "SELL"),
    ];

    let analysis = analyze_rows(&rows);
    assert_eq!(analysis.report.oversells.len(), 1);
    assert_eq!(analysis.report.oversells[0].excess, dec!(50));
    assert!(analysis.outcome.open_positions().is_empty());
    // The match still reports the ledger's P&L.
    assert_eq!(analysis.report.matches[0].realized_pnl, dec!(499.30));
}

#[test]
fn zero_pnl_sell_counts_toward_cost_basis_only() {
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("AAPL", "2024-03-04", "-40", "150.00", "-0.35", "0", "SELL"),
    ];

    let analysis = analyze_rows(&rows);
    assert!(analysis.report.matches.is_empty());
    let open = analysis.outcome.open_positions();
    assert_eq!(open[0].open_lots[0].quantity, dec!(60));
}

#[test]
fn summary_metrics_from_ledger_rows() {
    // Wins $3000 + $2000, losses $1500 + $500: profit factor 5000/2000 = 2.5.
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "400", "100.00", "0", "", "BUY"),
        raw_row("AAPL", "2024-03-04", "-100", "130.00", "0", "3000.00", "SELL"),
        raw_row("AAPL", "2024-03-05", "-100", "120.00", "0", "2000.00", "SELL"),
        raw_row("AAPL", "2024-03-06", "-100", "85.00", "0", "-1500.00", "SELL"),
        raw_row("AAPL", "2024-03-07", "-100", "95.00", "0", "-500.00", "SELL"),
    ];

    let summary = &analyze_rows(&rows).report.summary;
    assert_eq!(summary.profit_factor, Some(dec!(2.5)));
    assert_eq!(summary.win_rate, dec!(0.5));
    assert_eq!(summary.gross_profit, dec!(5000));
    assert_eq!(summary.gross_loss, dec!(2000));
}

#[test]
fn malformed_rows_never_abort_the_run() {
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("AAPL", "bad-date", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("", "2024-03-02", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("AAPL", "2024-03-03", "oops", "150.00", "-0.35", "", "BUY"),
    ];

    let report = analyze_rows(&rows).report;
    assert_eq!(report.totals.rows, 1);
    assert_eq!(report.totals.skipped_rows, 3);
    assert_eq!(report.skipped_rows.len(), 3);
}

#[test]
fn rerun_produces_identical_json() {
    let rows = vec![
        raw_row("AAPL", "2024-03-01", "100", "150.00", "-0.35", "", "BUY"),
        raw_row("MSFT", "2024-03-01", "20", "400.00", "-0.50", "", "BUY"),
        raw_row("AAPL", "2024-03-04", "-100", "155.00", "-0.35", "499.30", "SELL"),
    ];

    let first = serde_json::to_string(&analyze_rows(&rows).report).unwrap();
    let second = serde_json::to_string(&analyze_rows(&rows).report).unwrap();
    assert_eq!(first, second);
}

/// Strategy: a plausible ledger row. Sells carry the realized P&L; buys
/// leave it empty, mirroring how closing fills are reported.
fn arb_row() -> impl Strategy<Value = RawTradeRow> {
    (
        prop_oneof![Just("AAPL"), Just("MSFT"), Just("XOM"), Just("GOOG")],
        1u32..=28,
        1i64..=500,
        100i64..=50_000,
        any::<bool>(),
        -100_000i64..=100_000,
    )
        .prop_map(|(symbol, day, qty, price_cents, is_buy, pnl_cents)| {
            let price = Decimal::new(price_cents, 2);
            if is_buy {
                raw_row(
                    symbol,
                    &format!("2024-03-{day:02}"),
                    &qty.to_string(),
                    &price.to_string(),
                    "-0.35",
                    "",
                    "BUY",
                )
            } else {
                let pnl = Decimal::new(pnl_cents, 2);
                raw_row(
                    symbol,
                    &format!("2024-03-{day:02}"),
                    &(-qty).to_string(),
                    &price.to_string(),
                    "-0.35",
                    &pnl.to_string(),
                    "SELL",
                )
            }
        })
}

proptest! {
    /// The accounting identity holds on arbitrary ledgers, oversells
    /// included: matched P&L equals the sum of the rows' realized P&L.
    #[test]
    fn accounting_identity_holds(rows in prop::collection::vec(arb_row(), 0..40)) {
        let analysis = analyze_rows(&rows);

        let row_pnl: Decimal = analysis
            .outcome
            .per_symbol
            .values()
            .flat_map(|r| r.matches.iter())
            .map(|m| m.realized_pnl)
            .sum();
        let ledger_pnl = analysis.report.totals.net_realized_pnl;

        prop_assert_eq!(row_pnl, ledger_pnl);
    }

    /// Lots never go negative, whatever the sell pattern.
    #[test]
    fn open_lots_are_always_positive(rows in prop::collection::vec(arb_row(), 0..40)) {
        let analysis = analyze_rows(&rows);
        for result in analysis.outcome.per_symbol.values() {
            for lot in &result.open_lots {
                prop_assert!(lot.quantity > Decimal::ZERO);
            }
        }
    }
}
