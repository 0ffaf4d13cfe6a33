//! File exporters for scraped product records (JSON, CSV, Excel, HTML).
//!
//! Every exporter works from the same row representation: each record
//! serialized to an insertion-ordered JSON object. The column set is
//! the union of keys across all rows in first-seen order, so CSV, Excel
//! and HTML all share one header layout and a record missing a key
//! simply gets a blank cell.

use crate::amazon::ProductRecord;
use crate::config::ExportFormat;
use anyhow::{bail, Context, Result};
use rust_xlsxwriter::Workbook;
use serde_json::{Map, Value};
use std::collections::HashSet;
use std::path::Path;
use tracing::{error, info};

type Row = Map<String, Value>;

/// Writes one file per requested format into `output_dir`, creating the
/// directory as needed. Repeated formats are written once. Any write
/// failure is fatal and propagated after logging.
pub fn export_products(
    products: &[ProductRecord],
    output_dir: &Path,
    formats: &[ExportFormat],
    base_filename: &str,
) -> Result<()> {
    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("Failed to create output directory: {}", output_dir.display()))?;

    let rows = to_rows(products)?;
    let mut written = HashSet::new();

    for format in formats {
        if !written.insert(*format) {
            continue;
        }

        let path = output_dir.join(format!("{}.{}", base_filename, format.extension()));
        let result = match format {
            ExportFormat::Json => export_json(products, &path),
            ExportFormat::Csv => export_csv(&rows, &path),
            ExportFormat::Excel => export_excel(&rows, &path),
            ExportFormat::Html => export_html(&rows, &path),
        };

        match result {
            Ok(()) => info!("Exported {} to {}", format, path.display()),
            Err(e) => {
                error!("Failed to export {} to {}: {:#}", format, path.display(), e);
                return Err(e);
            }
        }
    }

    Ok(())
}

/// Serializes records into insertion-ordered key/value rows.
fn to_rows(products: &[ProductRecord]) -> Result<Vec<Row>> {
    products
        .iter()
        .map(|product| {
            let value = serde_json::to_value(product).context("Failed to serialize record")?;
            match value {
                Value::Object(map) => Ok(map),
                _ => bail!("Record did not serialize to an object"),
            }
        })
        .collect()
}

/// Union of row keys, first-seen order preserved.
fn collect_fieldnames(rows: &[Row]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut fieldnames = Vec::new();
    for row in rows {
        for key in row.keys() {
            if seen.insert(key.clone()) {
                fieldnames.push(key.clone());
            }
        }
    }
    fieldnames
}

/// Renders a cell value: null becomes the empty string, scalars print
/// plainly, nested structures (the offers list) as compact JSON.
fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        other => other.to_string(),
    }
}

fn export_json(products: &[ProductRecord], path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(products).context("Failed to serialize records")?;
    std::fs::write(path, json)
        .with_context(|| format!("Failed to write JSON to {}", path.display()))
}

fn export_csv(rows: &[Row], path: &Path) -> Result<()> {
    let fieldnames = collect_fieldnames(rows);

    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to open CSV file {}", path.display()))?;

    writer.write_record(&fieldnames)?;
    for row in rows {
        let record: Vec<String> = fieldnames
            .iter()
            .map(|name| row.get(name).map(cell_text).unwrap_or_default())
            .collect();
        writer.write_record(&record)?;
    }

    writer.flush().with_context(|| format!("Failed to write CSV to {}", path.display()))
}

fn export_excel(rows: &[Row], path: &Path) -> Result<()> {
    let fieldnames = collect_fieldnames(rows);

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name("Products")?;

    for (col, name) in fieldnames.iter().enumerate() {
        worksheet.write_string(0, col as u16, name)?;
    }

    for (index, row) in rows.iter().enumerate() {
        let row_number = (index + 1) as u32;
        for (col, name) in fieldnames.iter().enumerate() {
            match row.get(name) {
                // Numbers stay numbers in the sheet.
                Some(Value::Number(n)) => {
                    worksheet.write_number(row_number, col as u16, n.as_f64().unwrap_or(0.0))?;
                }
                Some(Value::Null) | None => {}
                Some(value) => {
                    worksheet.write_string(row_number, col as u16, cell_text(value))?;
                }
            }
        }
    }

    workbook
        .save(path)
        .with_context(|| format!("Failed to write Excel workbook to {}", path.display()))
}

fn export_html(rows: &[Row], path: &Path) -> Result<()> {
    let fieldnames = collect_fieldnames(rows);

    let mut lines: Vec<String> = [
        "<!DOCTYPE html>",
        "<html>",
        "<head>",
        "  <meta charset=\"utf-8\" />",
        "  <title>Amazon Products Export</title>",
        "  <style>",
        "    table { border-collapse: collapse; width: 100%; }",
        "    th, td { border: 1px solid #ddd; padding: 8px; }",
        "    th { background-color: #f4f4f4; text-align: left; }",
        "    tr:nth-child(even) { background-color: #fafafa; }",
        "  </style>",
        "</head>",
        "<body>",
        "  <h1>Amazon Products Export</h1>",
        "  <table>",
        "    <thead>",
        "      <tr>",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    for name in &fieldnames {
        lines.push(format!("        <th>{}</th>", html_escape(name)));
    }
    lines.push("      </tr>".to_string());
    lines.push("    </thead>".to_string());
    lines.push("    <tbody>".to_string());

    for row in rows {
        lines.push("      <tr>".to_string());
        for name in &fieldnames {
            let text = row.get(name).map(cell_text).unwrap_or_default();
            lines.push(format!("        <td>{}</td>", html_escape(&text)));
        }
        lines.push("      </tr>".to_string());
    }

    lines.push("    </tbody>".to_string());
    lines.push("  </table>".to_string());
    lines.push("</body>".to_string());
    lines.push("</html>".to_string());

    std::fs::write(path, lines.join("\n"))
        .with_context(|| format!("Failed to write HTML to {}", path.display()))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amazon::OfferRecord;
    use serde_json::json;
    use tempfile::TempDir;

    fn make_record(asin: &str, title: &str, price: f64) -> ProductRecord {
        ProductRecord {
            asin: Some(asin.to_string()),
            url: Some(format!("https://example.com/dp/{asin}")),
            title: Some(title.to_string()),
            brand: Some("Brand A".to_string()),
            price_raw: Some(format!("${price:.2}")),
            price_value: Some(price),
            price_currency: Some("$".to_string()),
            stars: Some(4.5),
            reviews_count: Some(100),
            ..ProductRecord::default()
        }
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        pairs.iter().map(|(k, v)| (k.to_string(), v.clone())).collect()
    }

    #[test]
    fn test_collect_fieldnames_first_seen_order() {
        let rows = vec![
            row(&[("b", json!(1)), ("a", json!(2))]),
            row(&[("a", json!(3)), ("c", json!(4))]),
        ];

        assert_eq!(collect_fieldnames(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Value::Null), "");
        assert_eq!(cell_text(&json!("text")), "text");
        assert_eq!(cell_text(&json!(19.99)), "19.99");
        assert_eq!(cell_text(&json!(1234)), "1234");
        assert_eq!(cell_text(&json!(true)), "true");
        assert_eq!(cell_text(&json!([{"a": 1}])), r#"[{"a":1}]"#);
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(html_escape("a < b & c > d"), "a &lt; b &amp; c &gt; d");
        assert_eq!(html_escape("plain"), "plain");
    }

    #[test]
    fn test_export_creates_all_requested_files() {
        let dir = TempDir::new().unwrap();
        let products = vec![make_record("TESTASIN1", "Test Product 1", 9.99)];

        export_products(
            &products,
            dir.path(),
            &[ExportFormat::Json, ExportFormat::Csv, ExportFormat::Excel, ExportFormat::Html],
            "test_products",
        )
        .unwrap();

        assert!(dir.path().join("test_products.json").is_file());
        assert!(dir.path().join("test_products.csv").is_file());
        assert!(dir.path().join("test_products.xlsx").is_file());
        assert!(dir.path().join("test_products.html").is_file());
    }

    #[test]
    fn test_export_creates_output_dir_recursively() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b");
        let products = vec![make_record("TESTASIN1", "Test Product 1", 9.99)];

        export_products(&products, &nested, &[ExportFormat::Json], "test_products").unwrap();
        assert!(nested.join("test_products.json").is_file());
    }

    #[test]
    fn test_export_repeated_format_written_once() {
        let dir = TempDir::new().unwrap();
        let products = vec![make_record("TESTASIN1", "Test Product 1", 9.99)];

        export_products(
            &products,
            dir.path(),
            &[ExportFormat::Json, ExportFormat::Json],
            "test_products",
        )
        .unwrap();
        assert!(dir.path().join("test_products.json").is_file());
    }

    #[test]
    fn test_json_roundtrip() {
        let dir = TempDir::new().unwrap();
        let mut with_offer = make_record("TESTASIN2", "Test Product 2", 19.99);
        with_offer.offers.push(OfferRecord {
            price_raw: Some("$18.99".to_string()),
            seller: Some("Third-Party Seller".to_string()),
            condition: None,
        });
        let products = vec![make_record("TESTASIN1", "Test Product 1", 9.99), with_offer];

        export_products(&products, dir.path(), &[ExportFormat::Json], "roundtrip").unwrap();

        let content = std::fs::read_to_string(dir.path().join("roundtrip.json")).unwrap();
        let parsed: Vec<ProductRecord> = serde_json::from_str(&content).unwrap();

        assert_eq!(parsed.len(), products.len());
        for (a, b) in parsed.iter().zip(products.iter()) {
            assert_eq!(a.asin, b.asin);
            assert_eq!(a.title, b.title);
            assert_eq!(a.price_value, b.price_value);
            assert_eq!(a.stars, b.stars);
            assert_eq!(a.offers, b.offers);
        }
    }

    #[test]
    fn test_json_preserves_non_ascii() {
        let dir = TempDir::new().unwrap();
        let mut product = make_record("TESTASIN1", "Déluxe Wídget édition", 9.99);
        product.price_currency = Some("€".to_string());

        export_products(&[product], dir.path(), &[ExportFormat::Json], "unicode").unwrap();

        let content = std::fs::read_to_string(dir.path().join("unicode.json")).unwrap();
        assert!(content.contains("Déluxe Wídget"));
        assert!(content.contains("€"));
        assert!(!content.contains("\\u"));
    }

    #[test]
    fn test_csv_header_and_blank_cells() {
        let dir = TempDir::new().unwrap();
        let rows = vec![
            row(&[("asin", json!("A1")), ("title", json!("First"))]),
            row(&[("asin", json!("A2")), ("stars", json!(4.0))]),
        ];
        let path = dir.path().join("partial.csv");

        export_csv(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "asin,title,stars");
        assert_eq!(lines[1], "A1,First,");
        assert_eq!(lines[2], "A2,,4.0");
    }

    #[test]
    fn test_csv_full_record_header_matches_field_order() {
        let dir = TempDir::new().unwrap();
        let products = vec![make_record("TESTASIN1", "Test Product 1", 9.99)];
        let rows = to_rows(&products).unwrap();
        let path = dir.path().join("full.csv");

        export_csv(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "asin,url,title,brand,thumbnailImage,price_raw,price.value,price_currency,\
             stars,reviewsCount,description,breadCrumbs,offers"
        );
    }

    #[test]
    fn test_csv_nested_offers_rendered_as_json() {
        let dir = TempDir::new().unwrap();
        let mut product = make_record("TESTASIN1", "Test Product 1", 9.99);
        product.offers.push(OfferRecord {
            price_raw: Some("$8.00".to_string()),
            seller: None,
            condition: None,
        });
        let rows = to_rows(&[product]).unwrap();
        let path = dir.path().join("offers.csv");

        export_csv(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains(r#"price_raw"":""$8.00"#));
    }

    #[test]
    fn test_html_table_structure() {
        let dir = TempDir::new().unwrap();
        let rows = vec![row(&[
            ("title", json!("Widget <Pro> & Co")),
            ("stars", json!(4.5)),
            ("description", Value::Null),
        ])];
        let path = dir.path().join("table.html");

        export_html(&rows, &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("<th>title</th>"));
        assert!(content.contains("<th>stars</th>"));
        assert!(content.contains("<td>Widget &lt;Pro&gt; &amp; Co</td>"));
        assert!(content.contains("<td>4.5</td>"));
        // Null renders as an empty cell.
        assert!(content.contains("<td></td>"));
    }

    #[test]
    fn test_export_error_is_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not_a_dir");
        std::fs::write(&blocker, "file in the way").unwrap();

        let products = vec![make_record("TESTASIN1", "Test Product 1", 9.99)];
        let result = export_products(&products, &blocker, &[ExportFormat::Json], "out");
        assert!(result.is_err());
    }
}
