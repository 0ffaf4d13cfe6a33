//! End-to-end tests: a fixture product page driven through extraction,
//! the batch runner, and the exporters.

use asin_scraper::amazon::{parse_offers, parse_product_page, ProductClient};
use asin_scraper::config::{Config, ExportFormat};
use asin_scraper::{export, runner, ProductRecord};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const PRODUCT_FIXTURE: &str = include_str!("fixtures/product_page.html");

#[test]
fn test_parse_fixture_fields() {
    let asin = "TESTASIN123";
    let url = "https://www.amazon.com/dp/TESTASIN123";

    let record = parse_product_page(PRODUCT_FIXTURE, Some(asin), Some(url));

    assert_eq!(record.asin.as_deref(), Some(asin));
    assert_eq!(record.url.as_deref(), Some(url));
    assert_eq!(record.title.as_deref(), Some("Amazing Widget 3000"));
    assert_eq!(record.brand.as_deref(), Some("Widget Corp"));
    assert_eq!(record.thumbnail_image.as_deref(), Some("https://example.com/image.jpg"));
    assert_eq!(record.price_raw.as_deref(), Some("$19.99"));
    assert_eq!(record.price_value, Some(19.99));
    assert_eq!(record.price_currency.as_deref(), Some("$"));
    assert_eq!(record.stars, Some(4.5));
    assert_eq!(record.reviews_count, Some(1234));
    assert!(record.description.as_deref().unwrap().contains("Fast and reliable"));
    assert_eq!(record.bread_crumbs.as_deref(), Some("Category A > Subcategory B"));
}

#[test]
fn test_parse_fixture_offers() {
    let offers = parse_offers(PRODUCT_FIXTURE);

    assert_eq!(offers.len(), 1);
    let offer = &offers[0];
    assert_eq!(offer.price_raw.as_deref(), Some("$18.99"));
    assert_eq!(offer.seller.as_deref(), Some("Third-Party Seller"));
    assert!(offer.condition.as_deref().unwrap().contains("Used"));
}

#[test]
fn test_extraction_is_idempotent() {
    let first = parse_product_page(PRODUCT_FIXTURE, Some("TESTASIN123"), None);
    let second = parse_product_page(PRODUCT_FIXTURE, Some("TESTASIN123"), None);

    assert_eq!(
        serde_json::to_value(&first).unwrap(),
        serde_json::to_value(&second).unwrap()
    );
    assert_eq!(parse_offers(PRODUCT_FIXTURE), parse_offers(PRODUCT_FIXTURE));
}

#[tokio::test]
async fn test_batch_scrape_and_export() {
    let mock_server = MockServer::start().await;

    // Two pages resolve, one ASIN 404s and must simply drop out.
    for asin in ["TESTASIN1", "TESTASIN2"] {
        Mock::given(method("GET"))
            .and(path(format!("/dp/{asin}")))
            .respond_with(ResponseTemplate::new(200).set_body_string(PRODUCT_FIXTURE))
            .mount(&mock_server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/dp/MISSING404"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let config = Config { base_url: mock_server.uri(), ..Config::default() };
    let client = Arc::new(ProductClient::new(&config).unwrap());

    let asins = vec![
        "TESTASIN1".to_string(),
        "MISSING404".to_string(),
        "TESTASIN2".to_string(),
    ];
    let products = runner::run_all(&asins, 3, client).await;

    assert_eq!(products.len(), 2);
    for product in &products {
        assert_eq!(product.title.as_deref(), Some("Amazing Widget 3000"));
        assert_eq!(product.offers.len(), 1);
    }

    let dir = TempDir::new().unwrap();
    export::export_products(
        &products,
        dir.path(),
        &[ExportFormat::Json, ExportFormat::Csv, ExportFormat::Excel, ExportFormat::Html],
        "amazon_products",
    )
    .unwrap();

    assert!(dir.path().join("amazon_products.json").is_file());
    assert!(dir.path().join("amazon_products.csv").is_file());
    assert!(dir.path().join("amazon_products.xlsx").is_file());
    assert!(dir.path().join("amazon_products.html").is_file());

    // JSON re-read preserves the records.
    let content = std::fs::read_to_string(dir.path().join("amazon_products.json")).unwrap();
    let parsed: Vec<ProductRecord> = serde_json::from_str(&content).unwrap();
    assert_eq!(parsed.len(), 2);
    assert_eq!(parsed[0].price_value, Some(19.99));
    assert_eq!(parsed[0].offers[0].price_raw.as_deref(), Some("$18.99"));
}
