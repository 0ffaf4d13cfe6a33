//! Batch orchestration: ASIN input file, per-item processing, and the
//! bounded worker pool.

use crate::amazon::{parse_offers, parse_product_page, ProductFetch, ProductRecord};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Reads ASIN identifiers from a plain text file, one per line.
///
/// Blank lines and `#` comments are skipped. A missing file or a file
/// yielding zero identifiers is an error: there is nothing to scrape.
pub fn read_asins(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Input file not found: {}", path.display()))?;

    let asins: Vec<String> = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect();

    if asins.is_empty() {
        bail!("No ASINs found in input file {}", path.display());
    }

    info!("Loaded {} ASINs from {}", asins.len(), path.display());
    Ok(asins)
}

/// Fetches and extracts a single ASIN.
///
/// Any fetch failure drops the item (single attempt, no retry) and is
/// reported as `None`; field-level extraction misses are already
/// isolated inside the extractors and never surface here.
pub async fn process_single_asin(asin: &str, client: &dyn ProductFetch) -> Option<ProductRecord> {
    let url = client.product_url(asin);

    let html = match client.product(asin).await {
        Ok(html) => html,
        Err(e) => {
            error!("Failed to fetch ASIN {} at URL {}: {:#}", asin, url, e);
            return None;
        }
    };

    let mut record = parse_product_page(&html, Some(asin), Some(&url));
    record.offers = parse_offers(&html);
    Some(record)
}

/// Processes a batch of ASINs and collects the successful records.
///
/// With a concurrency of 1 (or a single ASIN) the batch runs
/// sequentially; otherwise ASINs are dispatched across a
/// semaphore-bounded pool of tokio tasks. Results arrive in completion
/// order, so output order is unrelated to input order. A panicked
/// worker is caught at join time and contributes nothing; no single
/// item can abort the batch.
pub async fn run_all<C>(asins: &[String], concurrency: usize, client: Arc<C>) -> Vec<ProductRecord>
where
    C: ProductFetch + 'static,
{
    let concurrency = concurrency.max(1);

    if concurrency == 1 || asins.len() == 1 {
        let mut products = Vec::new();
        for asin in asins {
            if let Some(record) = process_single_asin(asin, client.as_ref()).await {
                products.push(record);
            }
        }
        return products;
    }

    let semaphore = Arc::new(Semaphore::new(concurrency));
    let mut tasks = JoinSet::new();

    for asin in asins {
        let asin = asin.clone();
        let client = Arc::clone(&client);
        let semaphore = Arc::clone(&semaphore);

        tasks.spawn(async move {
            // The semaphore is never closed, so acquisition only waits.
            let _permit = semaphore.acquire_owned().await.expect("semaphore closed");
            let record = process_single_asin(&asin, client.as_ref()).await;
            (asin, record)
        });
    }

    let mut products = Vec::new();
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok((_, Some(record))) => products.push(record),
            Ok((asin, None)) => debug!("No record produced for {}", asin),
            Err(e) => error!("Worker task failed: {}", e),
        }
    }

    products
}
