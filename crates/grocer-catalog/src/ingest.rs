//! Turning scraped listing records into catalog products.
//!
//! The scraper hands over loosely typed records: prices carry currency
//! symbols, ratings may be text. Each record is normalized and classified
//! from its name; records that cannot become a valid product are skipped.

use serde::{Deserialize, Serialize};

use crate::catalog::{parse_rating, CategoryTag, Classifier, Product};
use crate::ids::ProductId;

/// One record as produced by the scraper.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ScrapedItem {
    pub name: String,
    /// Price text such as `"₹1,299.00"` or a bare number.
    pub price: serde_json::Value,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub rating: Option<serde_json::Value>,
    /// Discount text such as `"12% off"` or a number.
    #[serde(default)]
    pub discount: Option<serde_json::Value>,
    #[serde(default)]
    pub in_stock: Option<bool>,
}

/// Why a record was skipped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    EmptyName,
    BadPrice(String),
}

/// Outcome of an ingestion run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub products: Vec<Product>,
    /// Index into the input and the reason it was dropped.
    pub skipped: Vec<(usize, SkipReason)>,
}

impl IngestReport {
    /// Number of products per category, in tag order.
    pub fn category_breakdown(&self) -> Vec<(CategoryTag, usize)> {
        CategoryTag::ALL
            .into_iter()
            .map(|tag| {
                let n = self.products.iter().filter(|p| p.category == tag).count();
                (tag, n)
            })
            .filter(|(_, n)| *n > 0)
            .collect()
    }
}

/// Convert scraped records into products with fresh ids.
pub fn ingest(items: Vec<ScrapedItem>, classifier: &Classifier) -> IngestReport {
    let mut report = IngestReport::default();

    for (index, item) in items.into_iter().enumerate() {
        let name = item.name.trim();
        if name.is_empty() {
            report.skipped.push((index, SkipReason::EmptyName));
            continue;
        }
        let Some(price) = parse_amount(&item.price).filter(|p| *p >= 0.0) else {
            report
                .skipped
                .push((index, SkipReason::BadPrice(item.price.to_string())));
            continue;
        };

        let rating = match &item.rating {
            Some(serde_json::Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(serde_json::Value::String(s)) => parse_rating(s),
            _ => 0.0,
        };
        let discount = item
            .discount
            .as_ref()
            .and_then(parse_amount)
            .map(|d| d.clamp(0.0, 100.0).round() as u8)
            .unwrap_or(0);

        report.products.push(Product {
            id: ProductId::generate(),
            name: name.to_string(),
            price,
            category: classifier.classify(name, CategoryTag::Grocery.as_str()),
            image: item.image,
            rating: rating.clamp(0.0, crate::catalog::MAX_RATING),
            discount,
            in_stock: item.in_stock.unwrap_or(true),
        });
    }

    tracing::debug!(
        ingested = report.products.len(),
        skipped = report.skipped.len(),
        "scraped records ingested"
    );
    report
}

/// Pull a number out of a JSON number or text like `"₹1,299.50"` / `"15% off"`.
fn parse_amount(value: &serde_json::Value) -> Option<f64> {
    match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => {
            let digits: String = s
                .chars()
                .skip_while(|c| !c.is_ascii_digit())
                .filter(|c| *c != ',')
                .take_while(|c| c.is_ascii_digit() || *c == '.')
                .collect();
            digits.parse().ok()
        }
        _ => None,
    }
}
