//! Import of overrides persisted in the older three-slot layout.
//!
//! Before the single overlay document, added products, tombstones and edits
//! each lived in their own slot and were written independently.

use std::collections::BTreeMap;

use grocer_store::{KeyValueStore, Store, StoreError};
use serde::de::DeserializeOwned;

use crate::catalog::{product_from_value, Classifier, Product};
use crate::error::CatalogError;
use crate::ids::ProductId;
use crate::overlay::{CatalogStore, OverlayDocument};

pub const LEGACY_ADDED_KEY: &str = "addedProducts";
pub const LEGACY_DELETED_KEY: &str = "deletedProductIds";
pub const LEGACY_EDITED_KEY: &str = "editedProducts";

/// Summary of a legacy import.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LegacyImport {
    pub added: usize,
    pub deleted: usize,
    pub edited: usize,
    /// Slots that existed but could not be read and were treated as empty.
    pub unreadable: Vec<String>,
    /// Individual records dropped because they did not parse.
    pub skipped_records: usize,
}

impl LegacyImport {
    pub fn is_empty(&self) -> bool {
        self.added == 0 && self.deleted == 0 && self.edited == 0
    }
}

impl<S: KeyValueStore> CatalogStore<S> {
    /// Fold the legacy slots into the overlay document and remove them.
    ///
    /// Each slot is read on its own. An unreadable slot counts as empty and
    /// is left in the store untouched.
    /// Entries already in the overlay document take precedence.
    pub fn migrate_legacy_slots(&self) -> Result<LegacyImport, CatalogError> {
        let store = Store::new(self.backend());
        let mut report = LegacyImport::default();

        let added_raw: Vec<serde_json::Value> =
            read_slot(&store, LEGACY_ADDED_KEY, &mut report)?.unwrap_or_default();
        let deleted: Vec<ProductId> =
            read_slot(&store, LEGACY_DELETED_KEY, &mut report)?.unwrap_or_default();
        let edited_raw: BTreeMap<String, serde_json::Value> =
            read_slot(&store, LEGACY_EDITED_KEY, &mut report)?.unwrap_or_default();

        let classifier = self.classifier();
        let mut legacy = OverlayDocument::default();
        for value in added_raw {
            if let Some(product) = parse_record(value, classifier, &mut report) {
                legacy.push_added(product);
            }
        }
        for id in deleted {
            legacy.apply_delete(&id);
        }
        for (id, value) in edited_raw {
            if let Some(mut product) = parse_record(value, classifier, &mut report) {
                // The map key is authoritative.
                product.id = ProductId::new(id);
                legacy.edited.insert(product.id.clone(), product);
            }
        }

        report.added = legacy.added.len();
        report.deleted = legacy.deleted.len();
        report.edited = legacy.edited.len();

        if !legacy.is_empty() {
            self.slot().update(|doc| {
                doc.merge_missing(legacy.clone());
                Ok::<_, CatalogError>(())
            })?;
        }

        // Unreadable slots stay in place for manual recovery.
        for key in [LEGACY_ADDED_KEY, LEGACY_DELETED_KEY, LEGACY_EDITED_KEY] {
            if !report.unreadable.iter().any(|k| k == key) {
                store.delete(key)?;
            }
        }

        tracing::info!(
            added = report.added,
            deleted = report.deleted,
            edited = report.edited,
            unreadable = report.unreadable.len(),
            "legacy overlay slots migrated"
        );
        Ok(report)
    }
}

fn read_slot<S: KeyValueStore, T: DeserializeOwned>(
    store: &Store<S>,
    key: &str,
    report: &mut LegacyImport,
) -> Result<Option<T>, CatalogError> {
    match store.get::<T>(key) {
        Ok(value) => Ok(value),
        Err(e @ StoreError::Serialize(_)) => {
            tracing::warn!(key, error = %e, "legacy slot unreadable, treating as empty");
            report.unreadable.push(key.to_string());
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

fn parse_record(
    value: serde_json::Value,
    classifier: &Classifier,
    report: &mut LegacyImport,
) -> Option<Product> {
    match product_from_value(value, classifier) {
        Ok(product) => Some(product),
        Err(e) => {
            tracing::warn!(error = %e, "skipping unreadable legacy product");
            report.skipped_records += 1;
            None
        }
    }
}
