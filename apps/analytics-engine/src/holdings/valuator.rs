//! Holdings valuation against the external quote feed.
//!
//! Lookups are the engine's only I/O-bound stage: one request per distinct
//! open symbol, bounded in-flight concurrency, one attempt with a
//! per-request timeout. A failed or timed-out lookup degrades that holding
//! to an explicit unpriced state instead of aborting the valuation.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::config::QuoteLookupConfig;
use crate::ledger::Symbol;
use crate::matching::MatchOutcome;

use super::quote::{QuoteFeedError, QuoteFeedPort, SymbolQuote};
use super::types::{
    Holding, HoldingValuation, HoldingsReport, LookupFailure, PortfolioSummary, SectorAllocation,
    SectorBand, TopHoldingsBand, UNKNOWN_SECTOR,
};

/// Number of holdings the top-concentration share covers.
const TOP_HOLDINGS: usize = 5;

/// Values open positions against a quote feed.
pub struct HoldingsValuator {
    feed: Arc<dyn QuoteFeedPort>,
    config: QuoteLookupConfig,
}

impl HoldingsValuator {
    /// Create a valuator over a quote feed.
    #[must_use]
    pub fn new(feed: Arc<dyn QuoteFeedPort>, config: QuoteLookupConfig) -> Self {
        Self { feed, config }
    }

    /// Value every open position in a match outcome.
    ///
    /// Holdings are returned sorted by market value (unpriced holdings
    /// last, by cost basis); portfolio shares are computed over priced
    /// holdings only.
    pub async fn value_positions(&self, outcome: &MatchOutcome) -> HoldingsReport {
        let open = outcome.open_positions();
        if open.is_empty() {
            return HoldingsReport::default();
        }

        let symbols: Vec<Symbol> = open.iter().map(|r| r.symbol.clone()).collect();
        debug!(count = symbols.len(), "Fetching quotes for open positions");
        let quotes = self.fetch_quotes(&symbols).await;

        let mut holdings = Vec::with_capacity(open.len());
        let mut failures = Vec::new();

        for result in open {
            let quantity: Decimal = result.open_lots.iter().map(|l| l.quantity).sum();
            let cost_basis: Decimal = result.open_lots.iter().map(|l| l.cost_basis()).sum();
            let average_cost = result.average_cost().unwrap_or(Decimal::ZERO);

            let (valuation, sector) = match quotes.get(&result.symbol) {
                Some(Ok(quote)) => {
                    let valuation = quote.price.map_or(HoldingValuation::Unpriced, |price| {
                        price_holding(quantity, cost_basis, price)
                    });
                    if valuation == HoldingValuation::Unpriced {
                        failures.push(LookupFailure {
                            symbol: result.symbol.clone(),
                            reason: "price unavailable".to_string(),
                        });
                    }
                    (valuation, quote.sector.clone())
                }
                Some(Err(error)) => {
                    warn!(symbol = %result.symbol, %error, "Quote lookup failed");
                    failures.push(LookupFailure {
                        symbol: result.symbol.clone(),
                        reason: error.to_string(),
                    });
                    (HoldingValuation::Unpriced, None)
                }
                None => {
                    failures.push(LookupFailure {
                        symbol: result.symbol.clone(),
                        reason: "no lookup result".to_string(),
                    });
                    (HoldingValuation::Unpriced, None)
                }
            };

            holdings.push(Holding {
                symbol: result.symbol.clone(),
                quantity,
                average_cost,
                cost_basis,
                sector,
                valuation,
            });
        }

        sort_holdings(&mut holdings);
        let summary = summarize(&holdings);

        HoldingsReport {
            holdings,
            summary,
            failures,
        }
    }

    /// Issue one bounded-concurrency lookup per symbol.
    ///
    /// Returns a per-symbol result map; partial failure stays partial.
    async fn fetch_quotes(
        &self,
        symbols: &[Symbol],
    ) -> HashMap<Symbol, Result<SymbolQuote, QuoteFeedError>> {
        let timeout = Duration::from_secs(self.config.timeout_secs);
        let concurrency = self.config.concurrency.max(1);

        stream::iter(symbols.iter().cloned())
            .map(|symbol| {
                let feed = Arc::clone(&self.feed);
                let timeout_secs = self.config.timeout_secs;
                async move {
                    let result = match tokio::time::timeout(timeout, feed.fetch_quote(&symbol)).await
                    {
                        Ok(result) => result,
                        Err(_) => Err(QuoteFeedError::Timeout {
                            seconds: timeout_secs,
                        }),
                    };
                    (symbol, result)
                }
            })
            .buffer_unordered(concurrency)
            .collect()
            .await
    }
}

fn price_holding(quantity: Decimal, cost_basis: Decimal, price: Decimal) -> HoldingValuation {
    let market_value = quantity * price;
    let unrealized_pnl = market_value - cost_basis;
    let unrealized_pnl_pct = if cost_basis > Decimal::ZERO {
        Some(unrealized_pnl / cost_basis)
    } else {
        None
    };

    HoldingValuation::Priced {
        current_price: price,
        market_value,
        unrealized_pnl,
        unrealized_pnl_pct,
    }
}

/// Priced holdings first by market value, then unpriced by cost basis.
fn sort_holdings(holdings: &mut [Holding]) {
    holdings.sort_by(|a, b| match (a.market_value(), b.market_value()) {
        (Some(av), Some(bv)) => bv.cmp(&av),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => b.cost_basis.cmp(&a.cost_basis),
    });
}

fn summarize(holdings: &[Holding]) -> PortfolioSummary {
    let total_cost_basis: Decimal = holdings.iter().map(|h| h.cost_basis).sum();
    let total_market_value: Decimal = holdings.iter().filter_map(Holding::market_value).sum();

    if total_market_value <= Decimal::ZERO {
        return PortfolioSummary {
            total_cost_basis,
            total_market_value,
            ..Default::default()
        };
    }

    let sectors = sector_allocations(holdings, total_market_value);

    // Holdings are already sorted by market value, so the first five priced
    // entries are the top five.
    let top_five_value: Decimal = holdings
        .iter()
        .filter_map(Holding::market_value)
        .take(TOP_HOLDINGS)
        .sum();
    let top_five_share = top_five_value / total_market_value;

    let top_sector_share = sectors.first().map(|s| s.share);

    PortfolioSummary {
        total_cost_basis,
        total_market_value,
        top_five_share: Some(top_five_share),
        top_five_band: Some(TopHoldingsBand::from_share(top_five_share)),
        top_sector_share,
        top_sector_band: top_sector_share.map(SectorBand::from_share),
        sectors,
    }
}

fn sector_allocations(holdings: &[Holding], total_market_value: Decimal) -> Vec<SectorAllocation> {
    let mut by_sector: HashMap<String, (Decimal, u64)> = HashMap::new();
    for holding in holdings {
        let Some(market_value) = holding.market_value() else {
            continue;
        };
        let sector = holding
            .sector
            .clone()
            .unwrap_or_else(|| UNKNOWN_SECTOR.to_string());
        let entry = by_sector.entry(sector).or_insert((Decimal::ZERO, 0));
        entry.0 += market_value;
        entry.1 += 1;
    }

    let mut sectors: Vec<SectorAllocation> = by_sector
        .into_iter()
        .map(|(sector, (market_value, count))| SectorAllocation {
            sector,
            market_value,
            holdings: count,
            share: market_value / total_market_value,
        })
        .collect();

    // Value-descending, name ascending on ties for deterministic output.
    sectors.sort_by(|a, b| {
        b.market_value
            .cmp(&a.market_value)
            .then_with(|| a.sector.cmp(&b.sector))
    });
    sectors
}
