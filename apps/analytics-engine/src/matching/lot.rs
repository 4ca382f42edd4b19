//! Open lot types for FIFO matching.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A remaining unconsumed quantity from one buy fill.
///
/// `cost_per_share` already includes that fill's commission amortized over
/// its quantity; `commission_per_share` keeps the commission component
/// separate so that closed matches can report the entry cost attributable to
/// the shares they consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    /// Shares remaining in this lot.
    pub quantity: Decimal,
    /// Commission-inclusive cost per share.
    pub cost_per_share: Decimal,
    /// Commission per share embedded in `cost_per_share`.
    pub commission_per_share: Decimal,
    /// When the lot was opened.
    pub opened_at: DateTime<Utc>,
}

impl Lot {
    /// Total commission-inclusive cost of the remaining shares.
    #[must_use]
    pub fn cost_basis(&self) -> Decimal {
        self.quantity * self.cost_per_share
    }
}

/// Weighted average cost per share across remaining lots.
///
/// Returns `None` when there are no shares left.
#[must_use]
pub fn average_cost(lots: &[Lot]) -> Option<Decimal> {
    let total_shares: Decimal = lots.iter().map(|l| l.quantity).sum();
    if total_shares <= Decimal::ZERO {
        return None;
    }

    let total_cost: Decimal = lots.iter().map(Lot::cost_basis).sum();
    Some(total_cost / total_shares)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn lot(quantity: Decimal, cost_per_share: Decimal) -> Lot {
        Lot {
            quantity,
            cost_per_share,
            commission_per_share: Decimal::ZERO,
            opened_at: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn cost_basis_multiplies_out() {
        let l = lot(dec!(50), dec!(160.0070));
        assert_eq!(l.cost_basis(), dec!(8000.3500));
    }

    #[test]
    fn average_cost_weights_by_quantity() {
        let lots = vec![lot(dec!(50), dec!(150.0035)), lot(dec!(50), dec!(160.0070))];
        let avg = average_cost(&lots).unwrap();
        assert_eq!(avg, dec!(155.00525));
    }

    #[test]
    fn average_cost_empty_is_none() {
        assert!(average_cost(&[]).is_none());
    }
}
