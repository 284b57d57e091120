//! Catalog store: the reconciled product view and its mutations.

use grocer_store::{CorruptPolicy, KeyValueStore, VersionedSlot};

use crate::catalog::{BaseCatalog, Classifier, Product, ProductDraft};
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::overlay::{DeleteOutcome, EditOutcome, OverlayDocument};
use crate::search::{CatalogQuery, QueryResults};

/// Namespace used when none is configured.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Reconciles an immutable base catalog with locally persisted overrides.
///
/// The overrides live in a single versioned document, so every mutation is
/// one compare-and-swap on the backing store. Reads never fail: if the
/// document cannot be read the base catalog is returned as is.
pub struct CatalogStore<S> {
    base: BaseCatalog,
    slot: VersionedSlot<S, OverlayDocument>,
    classifier: Classifier,
}

impl<S: KeyValueStore> CatalogStore<S> {
    /// Open the overlay in the default namespace.
    pub fn new(base: BaseCatalog, backend: S) -> Self {
        Self::with_namespace(base, backend, DEFAULT_NAMESPACE)
    }

    /// Open the overlay stored under `catalog:<namespace>:overlay`.
    pub fn with_namespace(base: BaseCatalog, backend: S, namespace: &str) -> Self {
        let key = grocer_store::slot_key!("catalog", namespace, "overlay");
        Self {
            base,
            slot: VersionedSlot::new(backend, key).with_corrupt_policy(CorruptPolicy::Reset),
            classifier: Classifier::new(),
        }
    }

    /// Use a differently configured classifier for submissions.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn base(&self) -> &BaseCatalog {
        &self.base
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Key of the overlay document in the backing store.
    pub fn overlay_key(&self) -> &str {
        self.slot.key()
    }

    pub(crate) fn backend(&self) -> &S {
        self.slot.store().backend()
    }

    pub(crate) fn slot(&self) -> &VersionedSlot<S, OverlayDocument> {
        &self.slot
    }

    /// Snapshot of the overrides. Unreadable state yields an empty overlay.
    pub fn overlay(&self) -> OverlayDocument {
        self.try_overlay().unwrap_or_default()
    }

    /// Version of the overlay document, 0 if never written or unreadable.
    pub fn version(&self) -> u64 {
        self.slot.version().unwrap_or(0)
    }

    fn try_overlay(&self) -> Option<OverlayDocument> {
        match self.slot.load() {
            Ok(doc) => Some(doc),
            Err(e) => {
                tracing::warn!(
                    key = %self.slot.key(),
                    error = %e,
                    "overlay unreadable, falling back to base catalog"
                );
                None
            }
        }
    }

    /// Every product currently visible, in catalog order.
    pub fn list_products(&self) -> Vec<Product> {
        match self.try_overlay() {
            Some(doc) => doc.reconcile(self.base.products()),
            None => self.base.products().to_vec(),
        }
    }

    /// A visible product by id.
    pub fn get_product(&self, id: &ProductId) -> Option<Product> {
        self.list_products().into_iter().find(|p| &p.id == id)
    }

    /// Filter, sort and paginate the visible products.
    pub fn query(&self, query: &CatalogQuery) -> QueryResults {
        query.apply(self.list_products())
    }

    /// Store a new product.
    ///
    /// The id must not belong to a base product, an added product or a
    /// tombstone; ids are never reused after deletion.
    pub fn add_product(&self, product: Product) -> Result<Product, CatalogError> {
        let product = self.normalize(product)?;

        self.slot.update(|doc| {
            if self.base.contains(&product.id)
                || doc.added_position(&product.id).is_some()
                || doc.is_deleted(&product.id)
            {
                return Err(CatalogError::DuplicateProduct(product.id.to_string()));
            }
            doc.push_added(product.clone());
            Ok(())
        })?;

        tracing::debug!(id = %product.id, category = %product.category, "product added");
        Ok(product)
    }

    /// Submission path: assign an id if missing, classify, then add.
    pub fn add_draft(&self, draft: ProductDraft) -> Result<Product, CatalogError> {
        self.add_product(draft.into_product(&self.classifier))
    }

    /// Replace a product's fields.
    ///
    /// Added products are edited in place; anything else goes to the edited
    /// layer. An id that matches nothing is still stored but has no visible
    /// effect.
    pub fn edit_product(&self, product: Product) -> Result<Product, CatalogError> {
        let product = self.normalize(product)?;

        let outcome = self.slot.update(|doc| {
            Ok::<_, CatalogError>(doc.apply_edit(product.clone()))
        })?;

        if outcome == EditOutcome::Overlaid && !self.base.contains(&product.id) {
            tracing::warn!(id = %product.id, "edit for unknown product stored with no visible effect");
        } else {
            tracing::debug!(id = %product.id, ?outcome, "product edited");
        }
        Ok(product)
    }

    /// Remove a product from the visible catalog.
    pub fn delete_product(&self, id: &ProductId) -> Result<DeleteOutcome, CatalogError> {
        let outcome = self
            .slot
            .update(|doc| Ok::<_, CatalogError>(doc.apply_delete(id)))?;

        if outcome == DeleteOutcome::Tombstoned && !self.base.contains(id) {
            tracing::debug!(%id, "tombstoned an id that is not in the base catalog");
        } else {
            tracing::debug!(%id, ?outcome, "product deleted");
        }
        Ok(outcome)
    }

    /// Drop every local override.
    pub fn reset_overlay(&self) -> Result<(), CatalogError> {
        self.slot.clear()?;
        tracing::info!(key = %self.slot.key(), "overlay reset");
        Ok(())
    }

    fn normalize(&self, mut product: Product) -> Result<Product, CatalogError> {
        product.validate()?;
        product.category = self
            .classifier
            .submission_category(&product.name, product.category);
        Ok(product)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryTag;
    use grocer_store::MemoryStore;
    use std::sync::Arc;

    fn base() -> BaseCatalog {
        BaseCatalog::new(vec![
            Product::new("1", "Apple", 120.0, CategoryTag::Grocery),
            Product::new("2", "Toor Dal", 140.0, CategoryTag::DalsPulses),
        ])
    }

    fn store() -> (Arc<MemoryStore>, CatalogStore<Arc<MemoryStore>>) {
        let backend = Arc::new(MemoryStore::new());
        let catalog = CatalogStore::new(base(), Arc::clone(&backend));
        (backend, catalog)
    }

    #[test]
    fn test_list_without_overlay_is_base() {
        let (_, catalog) = store();
        assert_eq!(catalog.list_products(), catalog.base().products().to_vec());
        assert_eq!(catalog.version(), 0);
    }

    #[test]
    fn test_add_then_list() {
        let (_, catalog) = store();
        let added = catalog
            .add_product(Product::new("10", "Kaju", 900.0, CategoryTag::DryFruitsNuts))
            .unwrap();

        let listed = catalog.list_products();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed[2], added);
        assert_eq!(catalog.version(), 1);
    }

    #[test]
    fn test_add_forces_oil_category() {
        let (_, catalog) = store();
        let stored = catalog
            .add_product(Product::new("10", "Coconut Oil", 200.0, CategoryTag::Grocery))
            .unwrap();
        assert_eq!(stored.category, CategoryTag::CookingOil);
    }

    #[test]
    fn test_add_rejects_taken_ids() {
        let (_, catalog) = store();
        let err = catalog
            .add_product(Product::new("1", "Another Apple", 1.0, CategoryTag::Grocery))
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateProduct(_)));

        catalog
            .add_product(Product::new("10", "Kaju", 900.0, CategoryTag::DryFruitsNuts))
            .unwrap();
        assert!(catalog
            .add_product(Product::new("10", "Kaju", 900.0, CategoryTag::DryFruitsNuts))
            .is_err());

        catalog.delete_product(&ProductId::new("2")).unwrap();
        assert!(catalog
            .add_product(Product::new("2", "Reborn", 1.0, CategoryTag::Grocery))
            .is_err());
        assert_eq!(catalog.overlay().added.len(), 1);
    }

    #[test]
    fn test_add_rejects_invalid_product() {
        let (backend, catalog) = store();
        let err = catalog
            .add_product(Product::new("10", "Kaju", -5.0, CategoryTag::DryFruitsNuts))
            .unwrap_err();
        assert!(matches!(err, CatalogError::ValidationError(_)));
        assert!(backend.keys().unwrap().is_empty());
    }

    #[test]
    fn test_add_draft_generates_id_and_category() {
        let (_, catalog) = store();
        let product = catalog
            .add_draft(ProductDraft::new("India Gate Basmati", 650.0).with_category("grocery"))
            .unwrap();
        assert_eq!(product.category, CategoryTag::RiceProducts);
        assert!(product.id.as_str().parse::<u64>().is_ok());
        assert_eq!(catalog.get_product(&product.id), Some(product));
    }

    #[test]
    fn test_edit_base_product() {
        let (_, catalog) = store();
        let edited = Product::new("1", "Apple", 99.0, CategoryTag::FruitsVeggies);
        catalog.edit_product(edited.clone()).unwrap();

        assert_eq!(catalog.get_product(&ProductId::new("1")), Some(edited));
        assert_eq!(catalog.overlay().edited.len(), 1);
        // Base is untouched.
        assert_eq!(catalog.base().products()[0].price, 120.0);
    }

    #[test]
    fn test_edit_unknown_id_is_invisible() {
        let (_, catalog) = store();
        catalog
            .edit_product(Product::new("404", "Ghost", 1.0, CategoryTag::Grocery))
            .unwrap();

        assert_eq!(catalog.list_products(), catalog.base().products().to_vec());
        assert!(catalog.overlay().edited.contains_key(&ProductId::new("404")));
    }

    #[test]
    fn test_delete_unknown_id_is_tombstoned() {
        let (_, catalog) = store();
        let outcome = catalog.delete_product(&ProductId::new("404")).unwrap();
        assert_eq!(outcome, DeleteOutcome::Tombstoned);
        assert_eq!(catalog.list_products().len(), 2);
    }

    #[test]
    fn test_corrupt_overlay_falls_back_to_base() {
        let (backend, catalog) = store();
        backend.set(catalog.overlay_key(), b"{\"data\": 12").unwrap();

        assert_eq!(catalog.list_products(), catalog.base().products().to_vec());
        assert!(catalog.overlay().is_empty());

        // A mutation starts over from an empty overlay and replaces the bad bytes.
        catalog.delete_product(&ProductId::new("1")).unwrap();
        let listed = catalog.list_products();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id.as_str(), "2");
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let backend = Arc::new(MemoryStore::new());
        let main = CatalogStore::new(base(), Arc::clone(&backend));
        let staging = CatalogStore::with_namespace(base(), Arc::clone(&backend), "staging");

        staging.delete_product(&ProductId::new("1")).unwrap();
        assert_eq!(main.list_products().len(), 2);
        assert_eq!(staging.list_products().len(), 1);
        assert_eq!(staging.overlay_key(), "catalog:staging:overlay");
    }

    #[test]
    fn test_reset_overlay() {
        let (_, catalog) = store();
        catalog.delete_product(&ProductId::new("1")).unwrap();
        catalog.reset_overlay().unwrap();
        assert_eq!(catalog.list_products().len(), 2);
    }
}
