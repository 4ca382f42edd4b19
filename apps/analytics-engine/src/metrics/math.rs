//! Statistical math utilities for performance metric calculations.

use rust_decimal::Decimal;

/// Calculate mean of a slice of decimals.
pub fn mean(values: &[Decimal]) -> Option<Decimal> {
    if values.is_empty() {
        return None;
    }
    let sum: Decimal = values.iter().sum();
    Some(sum / Decimal::from(values.len() as u64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        let values = vec![
            Decimal::new(10, 0),
            Decimal::new(20, 0),
            Decimal::new(30, 0),
            Decimal::new(40, 0),
        ];
        assert_eq!(mean(&values), Some(Decimal::new(25, 0)));
    }

    #[test]
    fn test_mean_empty() {
        assert_eq!(mean(&[]), None);
    }
}
