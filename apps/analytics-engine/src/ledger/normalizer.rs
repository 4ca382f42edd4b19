//! Row validation and normalization into ordered trade records.
//!
//! Malformed rows are dropped individually and reported back to the caller;
//! the run never aborts on bad input. Surviving trades are stably sorted by
//! timestamp so that rows sharing a timestamp keep their original file
//! order; the lot matcher depends on that ordering.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::warn;

use super::row::RawTradeRow;
use super::symbol::Symbol;
use super::trade::{Trade, TradeSide};

/// Reason a ledger row failed normalization.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    /// A required field was empty.
    #[error("Missing required field '{field}'")]
    MissingField {
        /// The empty column.
        field: &'static str,
    },

    /// A numeric field did not parse.
    #[error("Invalid number in '{field}': '{value}'")]
    InvalidNumber {
        /// The offending column.
        field: &'static str,
        /// The raw value.
        value: String,
    },

    /// The trade date did not parse in any accepted format.
    #[error("Invalid trade date: '{value}'")]
    InvalidDate {
        /// The raw value.
        value: String,
    },

    /// The trade price must be strictly positive.
    #[error("Non-positive trade price: {value}")]
    NonPositivePrice {
        /// The parsed price.
        value: Decimal,
    },

    /// Commission must be non-positive (it is a cost).
    #[error("Positive commission: {value}")]
    PositiveCommission {
        /// The parsed commission.
        value: Decimal,
    },

    /// A zero-quantity fill carries no position information.
    #[error("Zero quantity")]
    ZeroQuantity,

    /// Unrecognized side tag.
    #[error("Unrecognized side tag: '{value}'")]
    InvalidSide {
        /// The raw value.
        value: String,
    },

    /// Side tag contradicts the quantity sign.
    #[error("Side tag '{side}' contradicts signed quantity {quantity}")]
    SideMismatch {
        /// The declared side.
        side: TradeSide,
        /// The signed quantity.
        quantity: Decimal,
    },
}

/// A row dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRow {
    /// 1-based data row number (excluding the header).
    pub row: usize,
    /// Why the row was dropped.
    pub reason: NormalizeError,
}

/// Output of one normalization pass.
#[derive(Debug, Clone, Default)]
pub struct NormalizedLedger {
    /// Validated trades, stably sorted by timestamp.
    pub trades: Vec<Trade>,
    /// Rows dropped with their reasons, in file order.
    pub skipped: Vec<SkippedRow>,
}

/// Validate and type raw rows into an ordered trade sequence.
///
/// Rows that fail validation are skipped and reported; the sort is stable so
/// equal-timestamp rows keep their file order.
#[must_use]
pub fn normalize_rows(rows: &[RawTradeRow]) -> NormalizedLedger {
    let mut trades = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        match normalize_row(row) {
            Ok(trade) => trades.push(trade),
            Err(reason) => {
                warn!(row = idx + 1, %reason, "Skipping malformed ledger row");
                skipped.push(SkippedRow {
                    row: idx + 1,
                    reason,
                });
            }
        }
    }

    trades.sort_by_key(|t| t.executed_at);

    NormalizedLedger { trades, skipped }
}

/// Validate a single row.
///
/// # Errors
///
/// Returns the first validation failure encountered for the row.
pub fn normalize_row(row: &RawTradeRow) -> Result<Trade, NormalizeError> {
    let symbol = Symbol::new(&row.symbol);
    if symbol.is_empty() {
        return Err(NormalizeError::MissingField { field: "Symbol" });
    }

    let executed_at = parse_trade_date(&row.trade_date)?;

    let quantity = parse_required_decimal("Quantity", &row.quantity)?;
    if quantity.is_zero() {
        return Err(NormalizeError::ZeroQuantity);
    }

    let price = parse_required_decimal("TradePrice", &row.trade_price)?;
    if price <= Decimal::ZERO {
        return Err(NormalizeError::NonPositivePrice { value: price });
    }

    let commission = parse_optional_decimal("IBCommission", &row.commission)?.unwrap_or(Decimal::ZERO);
    if commission > Decimal::ZERO {
        return Err(NormalizeError::PositiveCommission { value: commission });
    }

    let realized_pnl = parse_optional_decimal("FifoPnlRealized", &row.realized_pnl)?;

    let implied = if quantity > Decimal::ZERO {
        TradeSide::Buy
    } else {
        TradeSide::Sell
    };
    let side = match parse_side(&row.side)? {
        Some(tag) if tag != implied => {
            return Err(NormalizeError::SideMismatch {
                side: tag,
                quantity,
            });
        }
        _ => implied,
    };

    Ok(Trade {
        symbol,
        executed_at,
        quantity,
        price,
        commission,
        realized_pnl,
        side,
    })
}

/// Parse a trade date in the accepted ledger formats.
///
/// Accepts RFC 3339, `YYYY-MM-DD HH:MM:SS`, `YYYYMMDD;HHMMSS`, `YYYY-MM-DD`,
/// and `YYYYMMDD`. Date-only values become midnight UTC.
fn parse_trade_date(value: &str) -> Result<DateTime<Utc>, NormalizeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(NormalizeError::MissingField { field: "TradeDate" });
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%d %H:%M:%S", "%Y%m%d;%H%M%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, format) {
            return Ok(naive.and_utc());
        }
    }

    for format in ["%Y-%m-%d", "%Y%m%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(value, format) {
            return Ok(date.and_hms_opt(0, 0, 0).unwrap_or_default().and_utc());
        }
    }

    Err(NormalizeError::InvalidDate {
        value: value.to_string(),
    })
}

fn parse_required_decimal(field: &'static str, value: &str) -> Result<Decimal, NormalizeError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(NormalizeError::MissingField { field });
    }
    parse_decimal(field, value)
}

fn parse_optional_decimal(
    field: &'static str,
    value: &str,
) -> Result<Option<Decimal>, NormalizeError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }
    parse_decimal(field, value).map(Some)
}

fn parse_decimal(field: &'static str, value: &str) -> Result<Decimal, NormalizeError> {
    // Ledger exports may format thousands with commas.
    let cleaned = value.replace(',', "");
    cleaned
        .parse::<Decimal>()
        .map_err(|_| NormalizeError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

fn parse_side(value: &str) -> Result<Option<TradeSide>, NormalizeError> {
    match value.trim().to_uppercase().as_str() {
        "" => Ok(None),
        "BUY" | "B" => Ok(Some(TradeSide::Buy)),
        "SELL" | "S" => Ok(Some(TradeSide::Sell)),
        other => Err(NormalizeError::InvalidSide {
            value: other.to_string(),
        }),
    }
}
