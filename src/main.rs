//! spotrank
//!
//! Ranks Hyperliquid spot markets quoted in USDC by 24h notional volume,
//! and reconciles the result against the exchange's reference ordering.

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use spotrank::application::reporting::{ALIGNMENT_ROWS, SpotReporter};
use spotrank::application::spot_ranking_service::{RankingOptions, SpotRankingService};
use spotrank::config::{Config, load_ranking_tables};
use spotrank::domain::market::ExclusionPolicy;
use spotrank::domain::market::lookup::MarketLocation;
use spotrank::domain::ports::SnapshotSource;
use spotrank::infrastructure::hyperliquid::{FileSnapshotSource, HyperliquidInfoClient};
use serde_json::{Value, json};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Hyperliquid spot markets ranked by 24h volume",
    long_about = None
)]
struct Cli {
    /// Number of markets to print
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Locate a display base symbol (e.g. PURR) in the full ranking
    #[arg(long)]
    find: Option<String>,

    /// Diff the ranking against the reference ordering (enables heuristic mode)
    #[arg(long)]
    compare_reference: bool,

    /// Print markets in reference order (no heuristics, no default exclusions)
    #[arg(long)]
    print_reference: bool,

    /// Drop markets without a context, price, or circulating supply
    #[arg(long)]
    heuristic_mode: bool,

    /// Disable the default base-symbol exclusions
    #[arg(long)]
    no_default_excludes: bool,

    /// Exclude a raw base token symbol (repeatable)
    #[arg(long = "exclude", value_name = "SYMBOL")]
    excludes: Vec<String>,

    /// Print raw diagnostic columns and log at debug level
    #[arg(long)]
    debug: bool,

    /// Read the snapshot from a JSON file instead of the network
    #[arg(long, value_name = "PATH")]
    snapshot_file: Option<PathBuf>,

    /// TOML file overriding the ranking tables (takes precedence over RANKING_TABLES_PATH)
    #[arg(long, value_name = "PATH")]
    tables: Option<PathBuf>,

    /// Emit JSON instead of tables
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn ranking_options(&self) -> RankingOptions {
        let mut heuristic_mode = self.heuristic_mode || self.compare_reference;
        let mut defaults_disabled = self.no_default_excludes;
        if self.print_reference {
            heuristic_mode = false;
            defaults_disabled = true;
        }

        let extra = self.excludes.clone();
        RankingOptions {
            heuristic_mode,
            exclusions: if defaults_disabled {
                ExclusionPolicy::Disabled { extra }
            } else {
                ExclusionPolicy::Defaults { extra }
            },
        }
    }

    /// The `--find` symbol, upper-cased. A blank query counts as absent.
    fn find_query(&self) -> Option<String> {
        self.find
            .as_deref()
            .map(str::trim)
            .filter(|query| !query.is_empty())
            .map(str::to_uppercase)
    }
}

fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;
    println!("{}", out);
    Ok(())
}

fn location_json(location: &MarketLocation<'_>) -> Value {
    let window: Vec<Value> = location
        .window
        .iter()
        .map(|(rank, row)| {
            json!({ "rank": rank, "pairName": row.pair_name, "volume": row.volume })
        })
        .collect();

    json!({
        "rank": location.rank,
        "row": location.row,
        "matchingCoinKeys": location.matching_coin_keys,
        "window": window,
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.debug);

    let config = Config::from_env()?;
    let tables_path = cli.tables.clone().or_else(|| config.ranking_tables_path.clone());
    let tables = load_ranking_tables(tables_path.as_deref())?;

    let source: Box<dyn SnapshotSource> = match &cli.snapshot_file {
        Some(path) => Box::new(FileSnapshotSource::new(path.clone())),
        None => Box::new(HyperliquidInfoClient::new(&config.info_url, config.fetch_timeout)?),
    };

    info!("spotrank {} fetching from {}", env!("CARGO_PKG_VERSION"), source.describe());
    let snapshot = source.fetch_snapshot().await?;

    let service = SpotRankingService::new(tables, config.quote_symbol.clone());
    let ranked = service.rank(&snapshot, &cli.ranking_options())?;
    let reporter = SpotReporter::new(cli.debug);

    if cli.print_reference {
        let view = service.reference_view(&ranked);
        if cli.json {
            return print_json(&view);
        }
        reporter.print_reference_view(&view);
        return Ok(());
    }

    if cli.compare_reference {
        let report = service.reconcile(&ranked, ALIGNMENT_ROWS);
        if cli.json {
            return print_json(&report);
        }
        reporter.print_reconciliation(&report);
        return Ok(());
    }

    if let Some(needle) = cli.find_query() {
        let Some(location) = service.locate(&ranked, &snapshot, &needle) else {
            if cli.json {
                return print_json(&Value::Null);
            }
            println!(
                "Not found in {}-quoted universe: {}",
                service.quote_symbol(),
                needle
            );
            return Ok(());
        };
        if cli.json {
            return print_json(&location_json(&location));
        }
        reporter.print_location(&location, &needle);
        return Ok(());
    }

    let top = ranked.top(cli.top);
    if cli.json {
        return print_json(&json!({ "fetchedAt": snapshot.fetched_at, "markets": top }));
    }
    reporter.print_top(top, service.quote_symbol(), snapshot.fetched_at);
    Ok(())
}
