//! The overlay document: local additions, edits and deletions.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::catalog::Product;
use crate::ids::ProductId;

/// All local overrides, persisted together as one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverlayDocument {
    /// Products created locally, in creation order.
    #[serde(default)]
    pub added: Vec<Product>,
    /// Tombstones for base products. Never holds duplicates.
    #[serde(default)]
    pub deleted: Vec<ProductId>,
    /// Replacement versions of base products, last write wins.
    #[serde(default)]
    pub edited: BTreeMap<ProductId, Product>,
}

/// Where an edit landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditOutcome {
    /// Replaced an added product in place.
    ReplacedAdded,
    /// Stored in the edited layer.
    Overlaid,
}

/// What a delete did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Removed an added product outright.
    RemovedAdded,
    /// Recorded a new tombstone.
    Tombstoned,
    /// The id was already tombstoned.
    AlreadyDeleted,
}

impl OverlayDocument {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.deleted.is_empty() && self.edited.is_empty()
    }

    pub fn is_deleted(&self, id: &ProductId) -> bool {
        self.deleted.contains(id)
    }

    /// Position of an added product.
    pub fn added_position(&self, id: &ProductId) -> Option<usize> {
        self.added.iter().position(|p| &p.id == id)
    }

    /// Layer the overrides on top of `base`.
    ///
    /// Base products come first in their original order, followed by added
    /// products in creation order. Tombstoned ids are dropped and edited
    /// versions replace the originals in place.
    pub fn reconcile(&self, base: &[Product]) -> Vec<Product> {
        let deleted: HashSet<&ProductId> = self.deleted.iter().collect();

        base.iter()
            .chain(self.added.iter())
            .filter(|p| !deleted.contains(&p.id))
            .map(|p| self.edited.get(&p.id).unwrap_or(p).clone())
            .collect()
    }

    /// Append a newly created product.
    ///
    /// A stale edited entry for the same id is dropped so it cannot shadow
    /// the new product.
    pub fn push_added(&mut self, product: Product) {
        self.edited.remove(&product.id);
        self.added.push(product);
    }

    /// Apply an edit: in place for added products, otherwise into the
    /// edited layer.
    pub fn apply_edit(&mut self, product: Product) -> EditOutcome {
        match self.added_position(&product.id) {
            Some(index) => {
                self.added[index] = product;
                EditOutcome::ReplacedAdded
            }
            None => {
                self.edited.insert(product.id.clone(), product);
                EditOutcome::Overlaid
            }
        }
    }

    /// Apply a delete: added products are removed, anything else gets a
    /// tombstone.
    pub fn apply_delete(&mut self, id: &ProductId) -> DeleteOutcome {
        if let Some(index) = self.added_position(id) {
            self.added.remove(index);
            return DeleteOutcome::RemovedAdded;
        }
        if self.is_deleted(id) {
            return DeleteOutcome::AlreadyDeleted;
        }
        self.deleted.push(id.clone());
        DeleteOutcome::Tombstoned
    }

    /// Fold `other` into this document. Entries already present here win.
    pub fn merge_missing(&mut self, other: OverlayDocument) {
        for product in other.added {
            if self.added_position(&product.id).is_none() {
                self.added.push(product);
            }
        }
        for id in other.deleted {
            if !self.is_deleted(&id) {
                self.deleted.push(id);
            }
        }
        for (id, product) in other.edited {
            self.edited.entry(id).or_insert(product);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CategoryTag;

    fn product(id: &str, name: &str) -> Product {
        Product::new(id, name, 10.0, CategoryTag::Grocery)
    }

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id.as_str()).collect()
    }

    #[test]
    fn test_empty_overlay_is_identity() {
        let base = vec![product("1", "Apple"), product("2", "Banana")];
        assert_eq!(OverlayDocument::default().reconcile(&base), base);
    }

    #[test]
    fn test_reconcile_order_and_layers() {
        let base = vec![product("1", "Apple"), product("2", "Banana"), product("3", "Cherry")];
        let mut doc = OverlayDocument::default();
        doc.push_added(product("10", "Dates"));
        doc.push_added(product("11", "Figs"));
        doc.apply_delete(&ProductId::new("2"));
        doc.apply_edit(product("3", "Cherry Tomato"));

        let view = doc.reconcile(&base);
        assert_eq!(ids(&view), vec!["1", "3", "10", "11"]);
        assert_eq!(view[1].name, "Cherry Tomato");
    }

    #[test]
    fn test_tombstone_beats_edit() {
        let base = vec![product("1", "Apple")];
        let mut doc = OverlayDocument::default();
        doc.apply_edit(product("1", "Green Apple"));
        doc.apply_delete(&ProductId::new("1"));

        assert!(doc.reconcile(&base).is_empty());
    }

    #[test]
    fn test_delete_is_idempotent() {
        let mut doc = OverlayDocument::default();
        let id = ProductId::new("1");

        assert_eq!(doc.apply_delete(&id), DeleteOutcome::Tombstoned);
        assert_eq!(doc.apply_delete(&id), DeleteOutcome::AlreadyDeleted);
        assert_eq!(doc.deleted, vec![id]);
    }

    #[test]
    fn test_delete_added_leaves_no_tombstone() {
        let mut doc = OverlayDocument::default();
        doc.push_added(product("10", "Dates"));

        assert_eq!(doc.apply_delete(&ProductId::new("10")), DeleteOutcome::RemovedAdded);
        assert!(doc.is_empty());
    }

    #[test]
    fn test_edit_added_in_place() {
        let mut doc = OverlayDocument::default();
        doc.push_added(product("10", "Dates"));
        doc.push_added(product("11", "Figs"));

        assert_eq!(doc.apply_edit(product("10", "Medjool Dates")), EditOutcome::ReplacedAdded);
        assert_eq!(ids(&doc.added), vec!["10", "11"]);
        assert_eq!(doc.added[0].name, "Medjool Dates");
        assert!(doc.edited.is_empty());
    }

    #[test]
    fn test_orphan_edit_has_no_visible_effect() {
        let base = vec![product("1", "Apple")];
        let mut doc = OverlayDocument::default();
        assert_eq!(doc.apply_edit(product("99", "Ghost")), EditOutcome::Overlaid);

        assert_eq!(doc.reconcile(&base), base);
    }

    #[test]
    fn test_push_added_drops_stale_edit() {
        let mut doc = OverlayDocument::default();
        doc.apply_edit(product("99", "Ghost"));
        doc.push_added(product("99", "Real"));

        let view = doc.reconcile(&[]);
        assert_eq!(view[0].name, "Real");
    }

    #[test]
    fn test_merge_missing_prefers_existing() {
        let mut doc = OverlayDocument::default();
        doc.apply_edit(product("1", "Mine"));
        doc.apply_delete(&ProductId::new("2"));

        let mut legacy = OverlayDocument::default();
        legacy.apply_edit(product("1", "Theirs"));
        legacy.apply_delete(&ProductId::new("2"));
        legacy.apply_delete(&ProductId::new("3"));
        legacy.push_added(product("10", "Dates"));

        doc.merge_missing(legacy);
        assert_eq!(doc.edited[&ProductId::new("1")].name, "Mine");
        assert_eq!(doc.deleted, vec![ProductId::new("2"), ProductId::new("3")]);
        assert_eq!(ids(&doc.added), vec!["10"]);
    }

    #[test]
    fn test_document_json_shape() {
        let mut doc = OverlayDocument::default();
        doc.apply_delete(&ProductId::new("5"));
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["deleted"], serde_json::json!(["5"]));
        assert_eq!(json["added"], serde_json::json!([]));

        let parsed: OverlayDocument = serde_json::from_str(r#"{"deleted":["5"]}"#).unwrap();
        assert_eq!(parsed, doc);
    }
}
