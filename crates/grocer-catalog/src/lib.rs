//! Grocery catalog reconciliation for the grocer storefront.
//!
//! The storefront shows a fixed seed catalog that admins can adjust locally.
//! Adjustments are never written back to the seed data; they are kept as an
//! overlay of added products, edited products and tombstones, and the visible
//! catalog is recomputed from both on every read.
//!
//! - **Catalog**: products, category tags, the name classifier, the base catalog
//! - **Overlay**: the override document and [`CatalogStore`]
//! - **Search**: filtering, sorting and pagination of the visible catalog
//! - **Ingest**: normalizing scraped listings into products
//!
//! # Example
//!
//! ```rust,ignore
//! use grocer_catalog::prelude::*;
//! use grocer_store::MemoryStore;
//!
//! let base = BaseCatalog::from_json_file("data/products.json", &Classifier::new())?;
//! let catalog = CatalogStore::new(base, MemoryStore::new());
//!
//! catalog.add_draft(ProductDraft::new("Cold Pressed Mustard Oil", 210.0))?;
//! catalog.delete_product(&ProductId::new("3"))?;
//!
//! for product in catalog.list_products() {
//!     println!("{} {}", product.name, product.category);
//! }
//! ```

pub mod error;
pub mod ids;

pub mod catalog;
pub mod ingest;
pub mod overlay;
pub mod search;

pub use error::CatalogError;
pub use ids::ProductId;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::error::CatalogError;
    pub use crate::ids::ProductId;

    // Catalog
    pub use crate::catalog::{
        classify, BaseCatalog, CategoryTag, Classifier, Product, ProductDraft,
    };

    // Overlay
    pub use crate::overlay::{CatalogStore, DeleteOutcome, EditOutcome, OverlayDocument};

    // Search
    pub use crate::search::{CatalogQuery, Pagination, QueryResults, SortOption};

    // Ingest
    pub use crate::ingest::{ingest, IngestReport, ScrapedItem};
}
