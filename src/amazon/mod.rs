//! Amazon product page scraping: data models, selector chains, field
//! and offer extraction, and the HTTP client.

pub mod client;
pub mod models;
pub mod offers;
pub mod parser;
pub mod selectors;

pub use client::{ProductClient, ProductFetch};
pub use models::{OfferRecord, ProductRecord};
pub use offers::parse_offers;
pub use parser::parse_product_page;
