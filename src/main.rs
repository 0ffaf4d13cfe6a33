//! asin-scraper - batch Amazon product page scraper.
//!
//! Reads ASINs from an input file, scrapes each product page through a
//! bounded worker pool, and exports the results to the requested formats.

use anyhow::Result;
use asin_scraper::amazon::ProductClient;
use asin_scraper::config::{Config, ExportFormat};
use asin_scraper::{export, runner};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn, Level};
use tracing_subscriber::EnvFilter;

/// All export files share this base name; only the extension differs.
const BASE_FILENAME: &str = "amazon_products";

#[derive(Parser)]
#[command(
    name = "asin-scraper",
    version,
    about = "Batch Amazon product scraper: ASINs in, structured exports out"
)]
struct Cli {
    /// Path to JSON config file
    #[arg(short, long, env = "ASIN_SCRAPER_CONFIG")]
    config: Option<PathBuf>,

    /// Path to ASIN input file (one ASIN per line)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Directory to store exported files
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Comma-separated list of output formats (json,csv,excel,html)
    #[arg(short, long)]
    formats: Option<String>,

    /// Increase verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = match cli.verbose {
        0 => EnvFilter::from_default_env().add_directive(Level::WARN.into()),
        1 => EnvFilter::new(Level::INFO.to_string()),
        _ => EnvFilter::new(Level::DEBUG.to_string()),
    };
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config, then apply CLI overrides
    let mut config = Config::load(cli.config.as_deref())?;

    if let Some(input) = cli.input {
        config.input_file = input;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }
    if let Some(formats) = cli.formats {
        // Fail fast on a bad format name, before any fetching starts.
        config.output_formats = ExportFormat::parse_list(&formats)?;
    }
    if config.output_formats.is_empty() {
        config.output_formats = vec![ExportFormat::Json, ExportFormat::Csv];
    }

    info!("Marketplace {} via {}", config.marketplace, config.base_url);

    let asins = runner::read_asins(&config.input_file)?;

    let client = Arc::new(ProductClient::new(&config)?);
    let products = runner::run_all(&asins, config.concurrency, client).await;

    if products.is_empty() {
        warn!("No products successfully scraped; nothing to export.");
        return Ok(());
    }

    export::export_products(&products, &config.output_dir, &config.output_formats, BASE_FILENAME)?;

    info!(
        "Scraping completed: {} products exported to {}",
        products.len(),
        config.output_dir.display()
    );

    Ok(())
}
