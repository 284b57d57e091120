//! The immutable seed catalog the overlay is layered on.

use std::path::Path;
use std::sync::Arc;

use serde::Deserialize;

use crate::catalog::{CategoryTag, Classifier, Product};
use crate::error::CatalogError;
use crate::ids::ProductId;

/// Ordered, read-only list of seed products.
///
/// Cheap to clone; all clones share the same products.
#[derive(Debug, Clone, Default)]
pub struct BaseCatalog {
    products: Arc<[Product]>,
}

/// Seed record with a free-text category, as found in bundled data.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SeedProduct {
    id: ProductId,
    name: String,
    price: f64,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    image: String,
    #[serde(default)]
    rating: serde_json::Value,
    #[serde(default)]
    discount: u8,
    #[serde(default = "default_in_stock")]
    in_stock: bool,
}

fn default_in_stock() -> bool {
    true
}

impl BaseCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self {
            products: products.into(),
        }
    }

    /// Parse a JSON array of products.
    ///
    /// Categories outside the fixed set are re-derived from the product name.
    pub fn from_json_slice(bytes: &[u8], classifier: &Classifier) -> Result<Self, CatalogError> {
        let seeds: Vec<SeedProduct> = serde_json::from_slice(bytes)?;
        let products = seeds
            .into_iter()
            .map(|seed| seed.into_product(classifier))
            .collect();
        Ok(Self::new(products))
    }

    /// Load a JSON array of products from disk.
    pub fn from_json_file(
        path: impl AsRef<Path>,
        classifier: &Classifier,
    ) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| CatalogError::BaseCatalog {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let catalog = Self::from_json_slice(&bytes, classifier).map_err(|e| {
            CatalogError::BaseCatalog {
                path: path.display().to_string(),
                reason: e.to_string(),
            }
        })?;
        tracing::debug!(path = %path.display(), products = catalog.len(), "loaded base catalog");
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn contains(&self, id: &ProductId) -> bool {
        self.products.iter().any(|p| &p.id == id)
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }
}

impl From<Vec<Product>> for BaseCatalog {
    fn from(products: Vec<Product>) -> Self {
        Self::new(products)
    }
}

/// Parse one product record leniently, the same way seed data is parsed.
pub(crate) fn product_from_value(
    value: serde_json::Value,
    classifier: &Classifier,
) -> Result<Product, serde_json::Error> {
    let seed: SeedProduct = serde_json::from_value(value)?;
    Ok(seed.into_product(classifier))
}

impl SeedProduct {
    fn into_product(self, classifier: &Classifier) -> Product {
        let category = match self.category.as_deref().and_then(CategoryTag::parse) {
            Some(tag) => tag,
            None => classifier.classify_or(&self.name, CategoryTag::Grocery),
        };
        let rating = match &self.rating {
            serde_json::Value::Number(n) => n.as_f64().unwrap_or(0.0),
            serde_json::Value::String(s) => crate::catalog::parse_rating(s),
            _ => 0.0,
        };
        Product {
            id: self.id,
            name: self.name,
            price: self.price,
            category,
            image: self.image,
            rating: rating.clamp(0.0, crate::catalog::MAX_RATING),
            discount: self.discount.min(100),
            in_stock: self.in_stock,
        }
    }
}
