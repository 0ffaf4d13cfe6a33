//! Data models for scraped products and marketplace offers.

use serde::{Deserialize, Serialize};

/// A single scraped product page, flattened to optional scalar fields.
///
/// Every field may be absent: source markup varies wildly between pages
/// and a missed selector degrades to `None` rather than an error. Field
/// order here drives the serialized key order, which in turn drives the
/// export column order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductRecord {
    /// Amazon Standard Identification Number
    pub asin: Option<String>,
    /// Source page URL
    pub url: Option<String>,
    /// Product title
    pub title: Option<String>,
    /// Brand or byline
    pub brand: Option<String>,
    /// Main product image URL
    #[serde(rename = "thumbnailImage")]
    pub thumbnail_image: Option<String>,
    /// Price text exactly as it appeared on the page
    pub price_raw: Option<String>,
    /// Numeric price parsed out of `price_raw`
    #[serde(rename = "price.value")]
    pub price_value: Option<f64>,
    /// Currency symbol parsed out of `price_raw`
    pub price_currency: Option<String>,
    /// Star rating (0.0 - 5.0)
    pub stars: Option<f32>,
    /// Number of customer reviews
    #[serde(rename = "reviewsCount")]
    pub reviews_count: Option<u32>,
    /// Feature bullets or product description text
    pub description: Option<String>,
    /// Category breadcrumb path, joined with " > "
    #[serde(rename = "breadCrumbs")]
    pub bread_crumbs: Option<String>,
    /// Marketplace offers found on the same page
    pub offers: Vec<OfferRecord>,
}

impl ProductRecord {
    /// Creates an empty record carrying only the identifier and URL.
    pub fn new(asin: Option<&str>, url: Option<&str>) -> Self {
        Self { asin: asin.map(String::from), url: url.map(String::from), ..Self::default() }
    }

    /// True when no field beyond the identifier/URL was extracted.
    pub fn is_bare(&self) -> bool {
        self.title.is_none()
            && self.brand.is_none()
            && self.thumbnail_image.is_none()
            && self.price_raw.is_none()
            && self.price_value.is_none()
            && self.price_currency.is_none()
            && self.stars.is_none()
            && self.reviews_count.is_none()
            && self.description.is_none()
            && self.bread_crumbs.is_none()
            && self.offers.is_empty()
    }
}

/// A single marketplace offer block from a product or offers page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfferRecord {
    /// Offer price text exactly as it appeared on the page
    pub price_raw: Option<String>,
    /// Seller name
    pub seller: Option<String>,
    /// Item condition text (e.g. "Used - Like New")
    pub condition: Option<String>,
}

impl OfferRecord {
    /// An offer with no price, seller, or condition is not a real offer.
    pub fn is_empty(&self) -> bool {
        self.price_raw.is_none() && self.seller.is_none() && self.condition.is_none()
    }
}
