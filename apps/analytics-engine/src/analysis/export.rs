//! Closed-trade table export.
//!
//! A pure serialization of already-computed matches; no metric is derived
//! here beyond the per-row grade column.

use std::fmt::Write;

use crate::matching::ClosedLotMatch;
use crate::metrics::grade_match;

/// Render closed matches as a delimited table.
#[must_use]
pub fn matches_to_csv(matches: &[ClosedLotMatch]) -> String {
    let mut csv = String::from(
        "symbol,closed_at,quantity,entry_cost,exit_price,realized_pnl,commission,grade\n",
    );

    for m in matches {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{},{}",
            m.symbol,
            m.closed_at.to_rfc3339(),
            m.quantity,
            m.entry_cost,
            m.exit_price,
            m.realized_pnl,
            m.commission,
            grade_match(m),
        );
    }

    csv
}
