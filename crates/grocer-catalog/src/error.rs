//! Catalog error types.

use thiserror::Error;

/// Errors that can occur in catalog operations.
#[derive(Error, Debug)]
pub enum CatalogError {
    /// An id is already taken by a base, added or deleted product.
    #[error("Product id already in use: {0}")]
    DuplicateProduct(String),

    /// Product not found.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// A product field is out of range.
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Failed to read the base catalog.
    #[error("Failed to load base catalog from {path}: {reason}")]
    BaseCatalog { path: String, reason: String },

    /// Persistence failure.
    #[error("Store error: {0}")]
    Store(#[from] grocer_store::StoreError),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl CatalogError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        CatalogError::ValidationError(message.into())
    }
}
