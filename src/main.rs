//! ftse-reports - FTSE 100 constituent scraper and CSV reporter
//!
//! # Usage
//! ```sh
//! cargo run -- top --count 10
//! CONSTITUENT_SOURCE=api cargo run -- market-cap
//! cargo run -- lowest-month --years 20
//! ```
//!
//! Configuration comes from the environment (and `.env`); flags override it.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ftse_reports::config::{Config, SourceKind};
use ftse_reports::domain::sorting::SortDirection;
use ftse_reports::infrastructure::ServiceFactory;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{Level, info};
use tracing_subscriber::prelude::*;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Constituent source: html (table pages) or api (refresh endpoint)
    #[arg(long, global = true)]
    source: Option<String>,

    /// Directory for CSV reports
    #[arg(long, global = true)]
    reports_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the homepage and check its title
    Homepage,

    /// Constituents with the highest percentage change
    Top {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Constituents with the lowest percentage change
    Bottom {
        #[arg(short = 'n', long)]
        count: Option<usize>,
    },

    /// Constituents with a market cap at or above a threshold (in pounds)
    MarketCap {
        #[arg(short, long)]
        threshold: Option<Decimal>,
    },

    /// Month with the lowest average index low
    LowestMonth {
        #[arg(short, long)]
        years: Option<u32>,
    },

    /// Run every scenario in sequence
    All,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(source) = &cli.source {
        config.site.source = SourceKind::from_str(source)?;
    }
    if let Some(dir) = cli.reports_dir {
        config.report.reports_dir = dir;
    }

    info!(
        "ftse-reports {} (source={:?}, reports={})",
        env!("CARGO_PKG_VERSION"),
        config.site.source,
        config.report.reports_dir.display()
    );

    let mut service = ServiceFactory::create_live_report_service(&config)?;
    let top_n = config.report.top_n;

    match cli.command {
        Commands::Homepage => {
            let snapshot = service.homepage_check().await?;
            println!("{}", snapshot.title);
        }
        Commands::Top { count } => {
            let report = service
                .top_by_percent_change(count.unwrap_or(top_n), SortDirection::Descending)
                .await?;
            println!("{}", report.path.display());
        }
        Commands::Bottom { count } => {
            let report = service
                .top_by_percent_change(count.unwrap_or(top_n), SortDirection::Ascending)
                .await?;
            println!("{}", report.path.display());
        }
        Commands::MarketCap { threshold } => {
            let report = service
                .above_market_cap(threshold.unwrap_or(config.report.market_cap_threshold))
                .await?;
            println!("{}", report.path.display());
        }
        Commands::LowestMonth { years } => {
            let report = service
                .lowest_average_month(years.unwrap_or(config.report.history_years))
                .await?;
            println!("{}", report.month);
        }
        Commands::All => {
            service.homepage_check().await?;
            service
                .top_by_percent_change(top_n, SortDirection::Descending)
                .await?;
            service
                .top_by_percent_change(top_n, SortDirection::Ascending)
                .await?;
            service
                .above_market_cap(config.report.market_cap_threshold)
                .await?;
            let lowest = service
                .lowest_average_month(config.report.history_years)
                .await?;
            println!("{}", lowest.month);
        }
    }

    Ok(())
}
