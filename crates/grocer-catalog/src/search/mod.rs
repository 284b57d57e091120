//! Search module.
//!
//! Filtering, sorting and pagination over the reconciled catalog.

mod query;
mod results;

pub use query::{CatalogQuery, SortOption};
pub use results::{CategoryCount, Pagination, QueryResults};
