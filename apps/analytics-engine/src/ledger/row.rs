//! Raw ledger row types and CSV ingestion.
//!
//! Rows are deserialized with every field as an optional string; the
//! normalizer owns all parsing so that a single malformed field drops that
//! row only, never the whole file.

use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One raw row of a trade execution ledger, column names as exported.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTradeRow {
    /// Instrument ticker.
    #[serde(rename = "Symbol", default)]
    pub symbol: String,
    /// Execution date, optionally with time.
    #[serde(rename = "TradeDate", default)]
    pub trade_date: String,
    /// Signed fill quantity (positive = buy, negative = sell).
    #[serde(rename = "Quantity", default)]
    pub quantity: String,
    /// Fill price per share.
    #[serde(rename = "TradePrice", default)]
    pub trade_price: String,
    /// Commission for the fill (non-positive, a cost).
    #[serde(rename = "IBCommission", default)]
    pub commission: String,
    /// Realized P&L for closing fills, empty otherwise. Already net of
    /// entry and exit commissions.
    #[serde(rename = "FifoPnlRealized", default)]
    pub realized_pnl: String,
    /// Side tag ("BUY" / "SELL").
    #[serde(rename = "Buy/Sell", default)]
    pub side: String,
}

/// Error reading a ledger file.
#[derive(Debug, Error)]
pub enum LedgerReadError {
    /// Failed to open the ledger file.
    #[error("Failed to open ledger file '{path}': {source}")]
    Open {
        /// Path to the ledger file.
        path: String,
        /// The underlying IO error.
        source: std::io::Error,
    },

    /// Failed to parse the delimited content.
    #[error("Failed to parse ledger CSV: {0}")]
    Parse(#[from] csv::Error),
}

/// Read all raw rows from a delimited ledger file.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or the CSV structure is
/// unreadable. Per-field problems are not errors at this layer; they are
/// reported row-by-row by the normalizer.
pub fn read_ledger<P: AsRef<Path>>(path: P) -> Result<Vec<RawTradeRow>, LedgerReadError> {
    let file = File::open(&path).map_err(|source| LedgerReadError::Open {
        path: path.as_ref().display().to_string(),
        source,
    })?;

    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(file);
    let mut rows = Vec::new();
    for result in reader.deserialize() {
        let row: RawTradeRow = result?;
        rows.push(row);
    }

    Ok(rows)
}
