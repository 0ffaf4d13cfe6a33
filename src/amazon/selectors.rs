//! CSS selector chains for Amazon product pages.
//!
//! All selectors used to locate product fields live here, grouped by
//! consumer. Chains are priority-ordered: the extractor walks each chain
//! front to back and stops at the first element with non-empty text, so
//! the most specific selector always comes first.
//!
//! **Update process**: when extraction starts missing fields, capture an
//! HTML sample, extend the relevant chain, and add a test fixture.

use regex_lite::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// Compiles a priority-ordered chain from individual CSS fragments.
///
/// Kept as separate `Selector`s rather than one comma-joined selector:
/// a combined selector matches in document order and would lose the
/// chain's priority.
fn chain(sources: &[&str]) -> Vec<Selector> {
    sources.iter().map(|s| Selector::parse(s).unwrap()).collect()
}

/// Concatenated text of an element: each text node trimmed, empty
/// segments dropped.
pub fn element_text(element: ElementRef) -> String {
    element.text().map(str::trim).filter(|t| !t.is_empty()).collect()
}

/// Like [`element_text`] but with segments joined by single spaces, for
/// prose containers where inter-element whitespace carries meaning.
pub fn element_text_spaced(element: ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// First-match-wins lookup over a selector chain.
///
/// For each selector in order, the first matching element is inspected;
/// the first one carrying non-empty text short-circuits the chain.
pub fn first_text(document: &Html, chain: &[Selector]) -> Option<String> {
    for selector in chain {
        if let Some(element) = document.select(selector).next() {
            let text = element_text(element);
            if !text.is_empty() {
                return Some(text);
            }
        }
    }
    None
}

/// Selectors for product detail pages.
pub mod product {
    use super::*;

    /// Product title, most specific first.
    pub static TITLE: LazyLock<Vec<Selector>> =
        LazyLock::new(|| chain(&["span#productTitle", "span#title", "h1#title"]));

    /// Document-level `<title>`, the last-resort title source.
    pub static DOC_TITLE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("title").unwrap());

    /// Brand byline variants.
    pub static BRAND: LazyLock<Vec<Selector>> =
        LazyLock::new(|| chain(&["a#bylineInfo", "span#bylineInfo", "a#brand", "tr#brandRow"]));

    /// Price spans in priority order; the bare offscreen span comes last
    /// because it also matches strike-through and per-unit prices.
    pub static PRICE: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        chain(&[
            "span#priceblock_ourprice",
            "span#priceblock_dealprice",
            "span#price_inside_buybox",
            "span.a-offscreen",
        ])
    });

    /// Star rating text sources.
    pub static RATING: LazyLock<Vec<Selector>> =
        LazyLock::new(|| chain(&["span#acrPopover", "span[data-hook='rating-out-of-text']"]));

    /// Review count text sources.
    pub static REVIEW_COUNT: LazyLock<Vec<Selector>> = LazyLock::new(|| {
        chain(&["span#acrCustomerReviewText", "span[data-hook='total-review-count']"])
    });

    /// Landing image by element id.
    pub static IMAGE_LANDING: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img#landingImage").unwrap());

    /// Landing image by data attribute.
    pub static IMAGE_LANDING_DATA: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img[data-a-image-name='landingImage']").unwrap());

    /// Any image; candidates are filtered by [`IMAGE_CLASS_RE`].
    pub static IMAGE_ANY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("img").unwrap());

    /// Class-attribute pattern for the generic image fallback.
    pub static IMAGE_CLASS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new("(?i)image|img").unwrap());

    /// URL-bearing attributes on the matched image, in priority order.
    pub static IMAGE_URL_ATTRS: &[&str] = &["src", "data-old-hires", "data-a-hires"];

    /// Feature bullets container.
    pub static FEATURE_BULLETS: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div#feature-bullets").unwrap());

    /// Individual bullet spans inside the feature bullets container.
    pub static BULLET_ITEM: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-list-item").unwrap());

    /// Long-form product description container.
    pub static DESCRIPTION: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div#productDescription").unwrap());

    /// Breadcrumb container by feature-div id.
    pub static BREADCRUMBS: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div#wayfinding-breadcrumbs_feature_div").unwrap());

    /// Any list; candidates are filtered by [`BREADCRUMBS_CLASS_RE`].
    pub static LIST_ANY: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("ul").unwrap());

    /// Class-attribute pattern for the breadcrumb list fallback.
    pub static BREADCRUMBS_CLASS_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new("(?i)breadcrumbs").unwrap());

    /// Table header cells, scanned for the brand fallback heuristic.
    pub static TABLE_HEADER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("th").unwrap());

    /// Anchors, collected within the breadcrumb container.
    pub static ANCHOR: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("a").unwrap());
}

/// Selectors for marketplace offer blocks.
pub mod offers {
    use super::*;

    /// Generic offer block, as used on simplified pages.
    pub static BLOCK_GENERIC: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.offer").unwrap());

    /// Offer-listing block on full marketplace pages.
    pub static BLOCK_LISTING: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("div.olpOffer").unwrap());

    /// Offer price span.
    pub static PRICE: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-color-price").unwrap());

    /// Seller name span.
    pub static SELLER: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.a-size-small").unwrap());

    /// Condition span.
    pub static CONDITION: LazyLock<Selector> =
        LazyLock::new(|| Selector::parse("span.offer-condition").unwrap());
}
