//! Field extraction for Amazon product pages.
//!
//! Product markup differs between marketplaces, layouts, and A/B
//! buckets, so every field is resolved through a fallback selector
//! chain and degrades to `None` when nothing matches. A missing field
//! is steady-state behavior, not an error.

use crate::amazon::models::ProductRecord;
use crate::amazon::selectors::{element_text, element_text_spaced, first_text, product};
use regex_lite::Regex;
use scraper::{ElementRef, Html};
use std::sync::LazyLock;
use tracing::debug;

/// Currency symbol followed by a numeric group, e.g. "$1,299.99".
static PRICE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([€£$¥₹])\s*([\d,.]+)").unwrap());

/// Leading decimal before the literal "out of", e.g. "4.5 out of 5 stars".
static STARS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\d.]+)\s+out of").unwrap());

/// Parses a product page into a [`ProductRecord`].
///
/// Never fails: each field is extracted independently and a miss nulls
/// only that field. Works with full Amazon pages as well as simplified
/// HTML snippets used in tests.
pub fn parse_product_page(html: &str, asin: Option<&str>, url: Option<&str>) -> ProductRecord {
    let document = Html::parse_document(html);
    let mut record = ProductRecord::new(asin, url);

    record.title = extract_title(&document);
    record.brand = extract_brand(&document);
    record.thumbnail_image = extract_thumbnail(&document);

    match first_text(&document, &product::PRICE) {
        Some(raw) => {
            let (value, currency) = parse_price_text(&raw);
            if value.is_none() {
                debug!(price_raw = %raw, "price text did not parse as a number");
            }
            record.price_raw = Some(raw);
            record.price_value = value;
            record.price_currency = currency;
        }
        None => debug!("no price element matched"),
    }

    (record.stars, record.reviews_count) = extract_rating(&document);

    record.description = extract_description(&document);
    record.bread_crumbs = extract_breadcrumbs(&document);

    debug!(asin = record.asin.as_deref().unwrap_or("-"), title = record.title.as_deref().unwrap_or("-"), "parsed product page");
    record
}

fn extract_title(document: &Html) -> Option<String> {
    if let Some(title) = first_text(document, &product::TITLE) {
        return Some(title);
    }

    // Last resort: the document <title>.
    let title = document.select(&product::DOC_TITLE).next().map(element_text)?;
    if title.is_empty() {
        debug!("no title element matched");
        return None;
    }
    Some(title)
}

fn extract_brand(document: &Html) -> Option<String> {
    if let Some(brand) = first_text(document, &product::BRAND) {
        return Some(brand);
    }

    // Generic guess from a product details table: a header cell naming
    // the brand, value in the adjacent data cell.
    let header = document
        .select(&product::TABLE_HEADER)
        .find(|th| element_text(*th).to_lowercase().contains("brand"))?;

    let cell = header
        .next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "td")?;

    let text = element_text(cell);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Splits raw price text into a numeric value and a currency symbol.
///
/// Both halves are independently optional: text without a recognized
/// currency symbol still parses as a bare number, and unparseable text
/// leaves the value empty while the raw string is kept by the caller.
fn parse_price_text(raw: &str) -> (Option<f64>, Option<String>) {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return (None, None);
    }

    let (numeric, currency) = match PRICE_RE.captures(trimmed) {
        Some(caps) => (caps[2].to_string(), Some(caps[1].to_string())),
        None => (trimmed.to_string(), None),
    };

    let value = numeric.replace(',', "").parse().ok();
    (value, currency)
}

fn extract_thumbnail(document: &Html) -> Option<String> {
    let image = document
        .select(&product::IMAGE_LANDING)
        .next()
        .or_else(|| document.select(&product::IMAGE_LANDING_DATA).next())
        .or_else(|| {
            document.select(&product::IMAGE_ANY).find(|el| {
                el.value().attr("class").is_some_and(|c| product::IMAGE_CLASS_RE.is_match(c))
            })
        })?;

    product::IMAGE_URL_ATTRS
        .iter()
        .find_map(|attr| image.value().attr(attr))
        .filter(|url| !url.is_empty())
        .map(String::from)
}

fn extract_description(document: &Html) -> Option<String> {
    if let Some(container) = document.select(&product::FEATURE_BULLETS).next() {
        let bullets: Vec<String> = container
            .select(&product::BULLET_ITEM)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect();
        if !bullets.is_empty() {
            return Some(bullets.join(" • "));
        }
    }

    let container = document.select(&product::DESCRIPTION).next()?;
    let text = element_text_spaced(container);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn extract_rating(document: &Html) -> (Option<f32>, Option<u32>) {
    let stars = first_text(document, &product::RATING)
        .and_then(|text| STARS_RE.captures(&text).and_then(|caps| caps[1].parse().ok()));

    let reviews = first_text(document, &product::REVIEW_COUNT).and_then(|text| {
        let digits: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
        if digits.is_empty() {
            None
        } else {
            digits.parse().ok()
        }
    });

    (stars, reviews)
}

fn extract_breadcrumbs(document: &Html) -> Option<String> {
    let container = document.select(&product::BREADCRUMBS).next().or_else(|| {
        document.select(&product::LIST_ANY).find(|el| {
            el.value().attr("class").is_some_and(|c| product::BREADCRUMBS_CLASS_RE.is_match(c))
        })
    })?;

    let parts: Vec<String> = container
        .select(&product::ANCHOR)
        .map(element_text)
        .filter(|t| !t.is_empty())
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(" > "))
    }
}
