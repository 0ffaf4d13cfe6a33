//! Marketplace offer extraction.
//!
//! Offer blocks appear under two markups: a generic `offer` class on
//! simplified pages and the `olpOffer` class on full offer-listing
//! pages. Both sources are scanned; blocks are deduplicated by their
//! position in the parsed tree, and an offer with no extractable field
//! is not an offer at all.

use crate::amazon::models::OfferRecord;
use crate::amazon::selectors::{element_text, offers};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use tracing::debug;

/// Extracts all marketplace offers from a product or offer-listing page.
///
/// Result order is first-encounter document order: generic-class blocks
/// first, listing-class blocks after. Deterministic for identical input.
pub fn parse_offers(html: &str) -> Vec<OfferRecord> {
    let document = Html::parse_document(html);

    let candidates = document
        .select(&offers::BLOCK_GENERIC)
        .chain(document.select(&offers::BLOCK_LISTING));

    let mut seen = HashSet::new();
    let mut records = Vec::new();

    for block in candidates {
        // A block matched by both selector sources is processed once.
        if !seen.insert(block.id()) {
            continue;
        }

        let offer = parse_offer_block(block);
        if offer.is_empty() {
            debug!("dropping offer block with no extractable fields");
            continue;
        }
        records.push(offer);
    }

    debug!(count = records.len(), "parsed offers");
    records
}

/// Extracts one offer block; each field is independently optional.
fn parse_offer_block(block: ElementRef) -> OfferRecord {
    OfferRecord {
        price_raw: select_text(block, &offers::PRICE),
        seller: select_text(block, &offers::SELLER),
        condition: select_text(block, &offers::CONDITION),
    }
}

fn select_text(block: ElementRef, selector: &Selector) -> Option<String> {
    let element = block.select(selector).next()?;
    let text = element_text(element);
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
