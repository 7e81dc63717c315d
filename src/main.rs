mod config;
mod error;
mod export;
mod loader;
mod models;
mod pipeline;
mod query;
mod scraper;
mod utils;

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{AppConfig, Mode, RunConfig};
use crate::error::SpacError;
use crate::export::ExportFormat;
use crate::loader::SnapshotSource;
use crate::pipeline::Pipeline;
use crate::scraper::{ListingSource, SpacheroScraper};

#[derive(Parser)]
#[command(name = "spac-scraper", about = "Scrape, filter and rank listed SPACs", version)]
#[command(group(
    ArgGroup::new("mode")
        .args(["symbol", "industry", "list_industry", "top_gainers", "top_losers", "volume_leaders"])
))]
struct Cli {
    /// Show a single SPAC by ticker symbol
    #[arg(short, long)]
    symbol: Option<String>,

    /// Show every SPAC in an industry
    #[arg(short, long)]
    industry: Option<String>,

    /// List the industries SPACs are in
    #[arg(short, long)]
    list_industry: bool,

    /// Only keep optionable SPACs (full listing or --industry)
    #[arg(short, long, conflicts_with_all = ["symbol", "list_industry", "top_gainers", "top_losers", "volume_leaders"])]
    optionable: bool,

    /// Show the biggest gainers by percentage change
    #[arg(long)]
    top_gainers: bool,

    /// Show the biggest losers by percentage change
    #[arg(long)]
    top_losers: bool,

    /// Show the highest-volume SPACs
    #[arg(long)]
    volume_leaders: bool,

    /// How many rows the rankings show (default from config, 5)
    #[arg(short = 'n', long)]
    limit: Option<usize>,

    /// Also write the result to a file
    #[arg(short, long, value_enum)]
    write_to_file: Option<ExportFormat>,

    /// Parse a saved copy of the page instead of fetching it
    #[arg(long, env = "SPAC_HTML")]
    html: Option<PathBuf>,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn mode(&self) -> Mode {
        if self.top_gainers {
            Mode::TopGainers
        } else if self.top_losers {
            Mode::TopLosers
        } else if self.volume_leaders {
            Mode::VolumeLeaders
        } else if let Some(symbol) = &self.symbol {
            Mode::Symbol(symbol.trim().to_uppercase())
        } else if self.list_industry {
            Mode::ListIndustries
        } else if let Some(industry) = &self.industry {
            Mode::Industry {
                name: industry.trim().to_lowercase(),
                optionable_only: self.optionable,
            }
        } else {
            Mode::All { optionable_only: self.optionable }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "spac_scraper=info,warn",
        1 => "spac_scraper=debug,info",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(fmt::layer().compact().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::new(filter))
        .init();

    let config = AppConfig::load()?;

    let run = RunConfig {
        mode: cli.mode(),
        limit: cli.limit.unwrap_or(config.query.limit),
        export: cli.write_to_file,
    };

    let source: Box<dyn ListingSource> = match &cli.html {
        Some(path) => Box::new(SnapshotSource::new(path)),
        None => Box::new(SpacheroScraper::new(&config.scraper).context("Failed to build scraper")?),
    };

    let report = match Pipeline::new(source, config.scraper.layout).run(&run).await {
        Ok(report) => report,
        Err(SpacError::EmptyResult(msg)) => {
            println!("{}", msg);
            return Ok(());
        }
        Err(e) => return Err(e).context("Scrape failed"),
    };

    println!("{}", report.render());

    if let Some(format) = run.export {
        let stem = run.mode.file_stem();
        if let Some(path) = report
            .export(format, &config.export.dir, &stem)
            .with_context(|| format!("Failed to write {}.{}", stem, format.extension()))?
        {
            info!("Saved {}", path.display());
        }
    }

    Ok(())
}
