//! Time-bucketed performance: day-of-week and calendar-month rollups.

use std::collections::BTreeMap;

use chrono::{Datelike, Weekday};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::matching::ClosedLotMatch;

/// Realized performance for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekdayPerformance {
    /// Weekday name ("Monday" … "Sunday").
    pub weekday: String,
    /// Sum of realized P&L.
    pub total_pnl: Decimal,
    /// Mean realized P&L per trade.
    pub avg_pnl: Decimal,
    /// Number of closed trades.
    pub trades: u64,
}

/// Realized performance for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthPerformance {
    /// Month key, "YYYY-MM".
    pub month: String,
    /// Sum of realized P&L.
    pub total_pnl: Decimal,
    /// Number of closed trades.
    pub trades: u64,
}

const WEEKDAY_ORDER: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn weekday_name(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Roll closed matches up by weekday, Monday first, days with no trades
/// omitted.
#[must_use]
pub fn weekday_performance(matches: &[ClosedLotMatch]) -> Vec<WeekdayPerformance> {
    let mut buckets: BTreeMap<u8, (Decimal, u64)> = BTreeMap::new();
    for m in matches {
        let day = m.closed_at.weekday().num_days_from_monday() as u8;
        let entry = buckets.entry(day).or_insert((Decimal::ZERO, 0));
        entry.0 += m.realized_pnl;
        entry.1 += 1;
    }

    WEEKDAY_ORDER
        .iter()
        .enumerate()
        .filter_map(|(idx, weekday)| {
            buckets.get(&(idx as u8)).map(|(total, count)| WeekdayPerformance {
                weekday: weekday_name(*weekday).to_string(),
                total_pnl: *total,
                avg_pnl: *total / Decimal::from(*count),
                trades: *count,
            })
        })
        .collect()
}

/// Roll closed matches up by calendar month, oldest first.
#[must_use]
pub fn monthly_performance(matches: &[ClosedLotMatch]) -> Vec<MonthPerformance> {
    let mut buckets: BTreeMap<String, (Decimal, u64)> = BTreeMap::new();
    for m in matches {
        let key = format!("{:04}-{:02}", m.closed_at.year(), m.closed_at.month());
        let entry = buckets.entry(key).or_insert((Decimal::ZERO, 0));
        entry.0 += m.realized_pnl;
        entry.1 += 1;
    }

    buckets
        .into_iter()
        .map(|(month, (total, count))| MonthPerformance {
            month,
            total_pnl: total,
            trades: count,
        })
        .collect()
}
