//! HTTP client for fetching product pages by ASIN.

use crate::config::Config;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;
use wreq::Client;

/// Fixed language preference sent with every request.
const ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Trait for product page fetching - enables mocking for tests.
#[async_trait]
pub trait ProductFetch: Send + Sync {
    /// Fetches a product page by ASIN and returns the HTML body.
    async fn product(&self, asin: &str) -> Result<String>;

    /// Returns the request URL for an ASIN.
    fn product_url(&self, asin: &str) -> String;
}

/// HTTP client over the configured marketplace base URL.
///
/// One plain GET per ASIN, single attempt: no retry, no backoff. A
/// failed fetch is the caller's signal to drop that identifier.
pub struct ProductClient {
    client: Client,
    base_url: String,
    user_agent: String,
}

impl ProductClient {
    /// Creates a new client from the configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .gzip(true)
            .brotli(true)
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            user_agent: config.user_agent.clone(),
        })
    }
}

#[async_trait]
impl ProductFetch for ProductClient {
    async fn product(&self, asin: &str) -> Result<String> {
        let url = self.product_url(asin);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .header("User-Agent", self.user_agent.as_str())
            .header("Accept-Language", ACCEPT_LANGUAGE)
            .send()
            .await
            .with_context(|| format!("Failed to send request for {}", asin))?;

        let status = response.status();
        debug!("Response status: {}", status);

        if !status.is_success() {
            anyhow::bail!("Request for {} failed with status: {}", asin, status);
        }

        response.text().await.context("Failed to read response body")
    }

    fn product_url(&self, asin: &str) -> String {
        format!("{}/dp/{}", self.base_url, asin)
    }
}
