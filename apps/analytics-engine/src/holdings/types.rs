//! Holding and portfolio aggregate types.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::ledger::Symbol;

/// Sector label used when the feed has no classification.
pub const UNKNOWN_SECTOR: &str = "Unknown";

/// Top-5 concentration thresholds (shares of priced market value).
const TOP_FIVE_MODERATE: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5
const TOP_FIVE_HIGH: Decimal = Decimal::from_parts(7, 0, 0, false, 1); // 0.7

/// Top-sector concentration thresholds.
const SECTOR_ELEVATED: Decimal = Decimal::from_parts(3, 0, 0, false, 1); // 0.3
const SECTOR_HEAVY: Decimal = Decimal::from_parts(5, 0, 0, false, 1); // 0.5

/// Valuation state of one holding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HoldingValuation {
    /// The quote resolved; market figures are available.
    Priced {
        /// Current price per share.
        current_price: Decimal,
        /// Quantity × current price.
        market_value: Decimal,
        /// Market value − cost basis.
        unrealized_pnl: Decimal,
        /// Unrealized P&L as a fraction of cost basis; `None` when the
        /// cost basis is not positive.
        unrealized_pnl_pct: Option<Decimal>,
    },
    /// The quote lookup failed or returned no price; excluded from
    /// market-value totals and percentage denominators.
    Unpriced,
}

/// One open position with commission-inclusive cost basis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    /// Instrument symbol.
    pub symbol: Symbol,
    /// Open share quantity.
    pub quantity: Decimal,
    /// Weighted average cost per share, commission-inclusive.
    pub average_cost: Decimal,
    /// Quantity × average cost.
    pub cost_basis: Decimal,
    /// Sector classification, if the feed knew one.
    pub sector: Option<String>,
    /// Market valuation, or explicitly unpriced.
    pub valuation: HoldingValuation,
}

impl Holding {
    /// Market value when priced.
    #[must_use]
    pub fn market_value(&self) -> Option<Decimal> {
        match &self.valuation {
            HoldingValuation::Priced { market_value, .. } => Some(*market_value),
            HoldingValuation::Unpriced => None,
        }
    }

    /// Whether the quote lookup resolved a price.
    #[must_use]
    pub const fn is_priced(&self) -> bool {
        matches!(self.valuation, HoldingValuation::Priced { .. })
    }
}

/// Market value aggregated per sector across priced holdings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorAllocation {
    /// Sector name ("Unknown" when unclassified).
    pub sector: String,
    /// Total market value in the sector.
    pub market_value: Decimal,
    /// Number of priced holdings in the sector.
    pub holdings: u64,
    /// Sector share of total priced market value.
    pub share: Decimal,
}

/// Concentration band for the top five holdings by market value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TopHoldingsBand {
    /// Top five hold ≤ 50% of priced market value.
    Diversified,
    /// Top five hold more than 50%.
    Moderate,
    /// Top five hold more than 70%.
    High,
}

impl TopHoldingsBand {
    /// Classify a top-5 share of priced market value.
    #[must_use]
    pub fn from_share(share: Decimal) -> Self {
        if share > TOP_FIVE_HIGH {
            Self::High
        } else if share > TOP_FIVE_MODERATE {
            Self::Moderate
        } else {
            Self::Diversified
        }
    }
}

/// Concentration band for the largest sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SectorBand {
    /// Largest sector holds ≤ 30% of priced market value.
    Balanced,
    /// Largest sector holds more than 30%.
    Elevated,
    /// Largest sector holds more than 50%.
    Heavy,
}

impl SectorBand {
    /// Classify the largest sector's share of priced market value.
    #[must_use]
    pub fn from_share(share: Decimal) -> Self {
        if share > SECTOR_HEAVY {
            Self::Heavy
        } else if share > SECTOR_ELEVATED {
            Self::Elevated
        } else {
            Self::Balanced
        }
    }
}

/// A symbol whose quote lookup failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupFailure {
    /// Affected symbol.
    pub symbol: Symbol,
    /// Why the lookup failed.
    pub reason: String,
}

/// Portfolio-level aggregates across holdings.
///
/// Percentage denominators cover priced holdings only; unpriced holdings
/// contribute to the cost-basis total but never to market-value shares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Total commission-inclusive cost basis across all holdings.
    pub total_cost_basis: Decimal,
    /// Total market value across priced holdings.
    pub total_market_value: Decimal,
    /// Per-sector market value, largest first.
    pub sectors: Vec<SectorAllocation>,
    /// Share of priced market value held by the top five holdings;
    /// `None` when nothing is priced.
    pub top_five_share: Option<Decimal>,
    /// Concentration band for the top five holdings.
    pub top_five_band: Option<TopHoldingsBand>,
    /// Share of priced market value in the largest sector.
    pub top_sector_share: Option<Decimal>,
    /// Concentration band for the largest sector.
    pub top_sector_band: Option<SectorBand>,
}

/// Output of one holdings valuation pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HoldingsReport {
    /// Holdings sorted by market value (unpriced last, by cost basis).
    pub holdings: Vec<Holding>,
    /// Portfolio-level aggregates.
    pub summary: PortfolioSummary,
    /// Symbols whose lookups failed or timed out.
    pub failures: Vec<LookupFailure>,
}
