//! Product types.

use serde::{Deserialize, Deserializer, Serialize};

use crate::catalog::{CategoryTag, Classifier};
use crate::error::CatalogError;
use crate::ids::ProductId;

/// Highest rating a product can carry.
pub const MAX_RATING: f64 = 5.0;

/// A product in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique product identifier.
    pub id: ProductId,
    /// Display name; drives category inference.
    pub name: String,
    /// Unit price, non-negative.
    pub price: f64,
    /// Storefront category.
    #[serde(default)]
    pub category: CategoryTag,
    /// Image URI, relative or absolute.
    #[serde(default)]
    pub image: String,
    /// Average rating in `0.0..=5.0`. Seed data stores some ratings as strings.
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: f64,
    /// Discount percentage, 0 meaning none.
    #[serde(default)]
    pub discount: u8,
    /// Whether the product can currently be ordered.
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl Product {
    /// Create an in-stock product with no rating or discount.
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: f64,
        category: CategoryTag,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            price,
            category,
            image: String::new(),
            rating: 0.0,
            discount: 0,
            in_stock: true,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = rating;
        self
    }

    pub fn with_discount(mut self, discount: u8) -> Self {
        self.discount = discount;
        self
    }

    pub fn with_in_stock(mut self, in_stock: bool) -> Self {
        self.in_stock = in_stock;
        self
    }

    /// Check the numeric fields are in range.
    pub fn validate(&self) -> Result<(), CatalogError> {
        if self.id.as_str().trim().is_empty() {
            return Err(CatalogError::validation("product id is empty"));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(CatalogError::validation(format!(
                "price {} for {} must be a non-negative number",
                self.price, self.id
            )));
        }
        if !(0.0..=MAX_RATING).contains(&self.rating) {
            return Err(CatalogError::validation(format!(
                "rating {} for {} must be between 0 and {}",
                self.rating, self.id, MAX_RATING
            )));
        }
        if self.discount > 100 {
            return Err(CatalogError::validation(format!(
                "discount {}% for {} exceeds 100%",
                self.discount, self.id
            )));
        }
        Ok(())
    }

    /// Check if the product is on sale.
    pub fn has_discount(&self) -> bool {
        self.discount > 0
    }

    /// Price after applying the discount percentage.
    pub fn discounted_price(&self) -> f64 {
        let factor = 1.0 - f64::from(self.discount.min(100)) / 100.0;
        (self.price * factor * 100.0).round() / 100.0
    }

    /// Case-insensitive substring match on the name.
    pub fn name_contains(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(&needle.to_lowercase())
    }
}

/// Accepts `4.5`, `"4.5"` or `null`; text that does not parse becomes 0.
fn deserialize_rating<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(f64),
        Text(String),
    }

    let rating = match Option::<Raw>::deserialize(deserializer)? {
        Some(Raw::Number(n)) => n,
        Some(Raw::Text(s)) => parse_rating(&s),
        None => 0.0,
    };
    Ok(rating)
}

/// Parse a rating from free text like `"4.3"` or `"4.3 out of 5"`, clamped to `0..=5`.
pub fn parse_rating(text: &str) -> f64 {
    let number: String = text
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(0.0, MAX_RATING))
        .unwrap_or(0.0)
}

/// A product as submitted from the admin form, before it has an id or a
/// normalized category.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    /// Caller-chosen id; generated from the clock when absent.
    #[serde(default)]
    pub id: Option<ProductId>,
    pub name: String,
    pub price: f64,
    /// Free-text category from the form, if any.
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, deserialize_with = "deserialize_rating")]
    pub rating: f64,
    #[serde(default)]
    pub discount: u8,
    #[serde(default = "default_in_stock")]
    pub in_stock: bool,
}

impl ProductDraft {
    pub fn new(name: impl Into<String>, price: f64) -> Self {
        Self {
            name: name.into(),
            price,
            in_stock: true,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<ProductId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Build the product, deriving the category through `classifier`.
    ///
    /// The submitted category is only a fallback: a name the classifier
    /// recognizes decides the category.
    pub fn into_product(self, classifier: &Classifier) -> Product {
        let fallback = self.category.as_deref().unwrap_or_default();
        let category = classifier.classify(&self.name, fallback);
        Product {
            id: self.id.unwrap_or_else(ProductId::generate),
            name: self.name,
            price: self.price,
            category,
            image: self.image,
            rating: self.rating,
            discount: self.discount,
            in_stock: self.in_stock,
        }
    }
}
