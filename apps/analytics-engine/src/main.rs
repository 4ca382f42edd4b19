//! Analytics Engine Binary
//!
//! Analyzes a trade execution ledger and prints the report as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin analytics-engine -- trades.csv [--quotes quotes.json] [--export closed.csv]
//! ```
//!
//! # Arguments
//!
//! - `<ledger.csv>`: delimited execution ledger (Symbol, TradeDate,
//!   Quantity, TradePrice, IBCommission, FifoPnlRealized, Buy/Sell)
//! - `--quotes <file>`: optional JSON quote map; enables holdings valuation
//! - `--export <file>`: optional path for the closed-trade CSV table
//! - `--config <file>`: optional engine config JSON
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Log level (default: info)

use std::sync::Arc;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use analytics_engine::analysis::{AnalysisReport, analyze_rows, matches_to_csv};
use analytics_engine::config::EngineConfig;
use analytics_engine::holdings::{HoldingsReport, HoldingsValuator, StaticQuoteFeed};
use analytics_engine::ledger::read_ledger;

/// Parsed command-line arguments.
struct CliArgs {
    ledger_path: String,
    quotes_path: Option<String>,
    export_path: Option<String>,
    config_path: Option<String>,
}

/// Combined output printed to stdout.
#[derive(Serialize)]
struct Output {
    report: AnalysisReport,
    #[serde(skip_serializing_if = "Option::is_none")]
    holdings: Option<HoldingsReport>,
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = parse_args()?;
    let config = load_config(args.config_path.as_deref())?;

    let rows = read_ledger(&args.ledger_path)
        .with_context(|| format!("reading ledger '{}'", args.ledger_path))?;
    tracing::info!(rows = rows.len(), path = %args.ledger_path, "Loaded ledger");

    let analysis = analyze_rows(&rows);
    tracing::info!("{}", analytics_engine::metrics::summary_line(&analysis.report.summary));

    let holdings = match &args.quotes_path {
        Some(path) => {
            let feed = StaticQuoteFeed::from_json_file(path)
                .with_context(|| format!("loading quotes '{path}'"))?;
            let valuator = HoldingsValuator::new(Arc::new(feed), config.lookup);
            Some(valuator.value_positions(&analysis.outcome).await)
        }
        None => None,
    };

    if let Some(path) = &args.export_path {
        std::fs::write(path, matches_to_csv(&analysis.report.matches))
            .with_context(|| format!("writing export '{path}'"))?;
        tracing::info!(path = %path, "Wrote closed-trade table");
    }

    let output = Output {
        report: analysis.report,
        holdings,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn parse_args() -> Result<CliArgs> {
    let mut args = std::env::args().skip(1);
    let mut ledger_path = None;
    let mut quotes_path = None;
    let mut export_path = None;
    let mut config_path = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--quotes" => quotes_path = args.next(),
            "--export" => export_path = args.next(),
            "--config" => config_path = args.next(),
            flag if flag.starts_with("--") => bail!("unknown flag '{flag}'"),
            path => {
                if ledger_path.is_some() {
                    bail!("unexpected extra argument '{path}'");
                }
                ledger_path = Some(path.to_string());
            }
        }
    }

    let Some(ledger_path) = ledger_path else {
        bail!("usage: analytics-engine <ledger.csv> [--quotes quotes.json] [--export closed.csv] [--config engine.json]");
    };

    Ok(CliArgs {
        ledger_path,
        quotes_path,
        export_path,
        config_path,
    })
}

fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(path) => {
            let content =
                std::fs::read_to_string(path).with_context(|| format!("reading config '{path}'"))?;
            serde_json::from_str(&content).with_context(|| format!("parsing config '{path}'"))
        }
        None => Ok(EngineConfig::default()),
    }
}

/// Initialize the tracing subscriber with environment filter.
///
/// Uses static directive strings that are compile-time constants guaranteed to parse.
#[allow(clippy::expect_used)]
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(
                "analytics_engine=info"
                    .parse()
                    .expect("static directive 'analytics_engine=info' is valid"),
            ),
        )
        .with_writer(std::io::stderr)
        .init();
}
