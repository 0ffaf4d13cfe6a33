//! asin-scraper - batch Amazon product page scraper.
//!
//! Fetches product pages by ASIN, extracts structured fields through
//! fallback selector chains tolerant of missing and malformed markup,
//! and exports the collected records to JSON, CSV, Excel, and HTML.

pub mod amazon;
pub mod config;
pub mod export;
pub mod runner;

pub use amazon::models::{OfferRecord, ProductRecord};
pub use config::{Config, ExportFormat};
