//! Per-trade grading against the trade's own commission load.
//!
//! A trade is graded by how many multiples of its round-trip commission it
//! earned back. Boundary convention: exact multiples resolve to the lower
//! tier: P&L of exactly 5× commission grades A, not A+, exactly 1×
//! commission grades C, and exactly −1× commission grades D.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::constants::GRADE_COMMISSION_FLOOR;
use crate::matching::ClosedLotMatch;

/// Letter grade for a single closed trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TradeGrade {
    /// P&L above 5× commission.
    #[serde(rename = "A+")]
    APlus,
    /// P&L above 3× commission (up to and including 5×).
    A,
    /// P&L above 1× commission (up to and including 3×).
    B,
    /// Positive P&L up to and including 1× commission.
    C,
    /// Loss no deeper than 1× commission.
    D,
    /// Loss deeper than 1× commission.
    F,
}

impl std::fmt::Display for TradeGrade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::APlus => write!(f, "A+"),
            Self::A => write!(f, "A"),
            Self::B => write!(f, "B"),
            Self::C => write!(f, "C"),
            Self::D => write!(f, "D"),
            Self::F => write!(f, "F"),
        }
    }
}

/// Grade a realized P&L against a commission magnitude.
///
/// `commission` is clamped to [`GRADE_COMMISSION_FLOOR`] so commission-free
/// fills still grade against a nonzero cost.
#[must_use]
pub fn grade_trade(pnl: Decimal, commission: Decimal) -> TradeGrade {
    let cost = commission.abs().max(GRADE_COMMISSION_FLOOR);
    let five = Decimal::from(5u8) * cost;
    let three = Decimal::from(3u8) * cost;

    if pnl > five {
        TradeGrade::APlus
    } else if pnl > three {
        TradeGrade::A
    } else if pnl > cost {
        TradeGrade::B
    } else if pnl > Decimal::ZERO {
        TradeGrade::C
    } else if pnl >= -cost {
        TradeGrade::D
    } else {
        TradeGrade::F
    }
}

/// Grade for one closed match, judged against its own round-trip commission.
#[must_use]
pub fn grade_match(m: &ClosedLotMatch) -> TradeGrade {
    grade_trade(m.realized_pnl, m.commission)
}

/// Count grades across a set of closed matches.
#[must_use]
pub fn grade_distribution(matches: &[ClosedLotMatch]) -> BTreeMap<TradeGrade, u64> {
    let mut distribution = BTreeMap::new();
    for m in matches {
        *distribution.entry(grade_match(m)).or_insert(0) += 1;
    }
    distribution
}
