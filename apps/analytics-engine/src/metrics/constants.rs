//! Decimal constants for performance metric calculations.

use rust_decimal::Decimal;

/// One hundred, for percentage conversions.
pub const HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// A win below this fraction of the average win counts toward the fear
/// index (winners cut early).
pub const FEAR_WIN_FRACTION: Decimal = Decimal::from_parts(3, 0, 0, false, 1); // 0.3

/// Floor for the commission magnitude a trade is graded against, so
/// commission-free fills grade against a cent rather than dividing by zero.
pub const GRADE_COMMISSION_FLOOR: Decimal = Decimal::from_parts(1, 0, 0, false, 2); // 0.01
