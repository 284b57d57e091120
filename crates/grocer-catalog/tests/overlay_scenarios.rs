//! End-to-end behavior of the catalog overlay against real stores.

use std::sync::Arc;

use grocer_catalog::overlay::{LEGACY_DELETED_KEY, OverlayDocument};
use grocer_catalog::prelude::*;
use grocer_store::{FileStore, KeyValueStore, MemoryStore, Versioned};

fn seed() -> BaseCatalog {
    BaseCatalog::new(vec![
        Product::new("1", "Apple", 120.0, CategoryTag::Grocery),
        Product::new("2", "Toor Dal", 140.0, CategoryTag::DalsPulses),
        Product::new("3", "Tata Salt", 28.0, CategoryTag::SugarSaltJaggery),
    ])
}

fn ids(products: &[Product]) -> Vec<String> {
    products.iter().map(|p| p.id.to_string()).collect()
}

#[test]
fn edit_then_delete_single_product() {
    let base = BaseCatalog::new(vec![Product::new("1", "Apple", 120.0, CategoryTag::Grocery)]);
    let catalog = CatalogStore::new(base, MemoryStore::new());

    catalog
        .edit_product(Product::new("1", "Apple", 120.0, CategoryTag::FruitsVeggies))
        .unwrap();
    let listed = catalog.list_products();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id.as_str(), "1");
    assert_eq!(listed[0].category, CategoryTag::FruitsVeggies);

    catalog.delete_product(&ProductId::new("1")).unwrap();
    assert!(catalog.list_products().is_empty());
}

#[test]
fn deleting_twice_is_idempotent() {
    let catalog = CatalogStore::new(seed(), MemoryStore::new());
    let id = ProductId::new("2");

    assert_eq!(catalog.delete_product(&id).unwrap(), DeleteOutcome::Tombstoned);
    let after_first = catalog.list_products();
    assert_eq!(catalog.delete_product(&id).unwrap(), DeleteOutcome::AlreadyDeleted);

    assert_eq!(catalog.list_products(), after_first);
    let tombstones = catalog.overlay().deleted;
    assert_eq!(tombstones.iter().filter(|d| **d == id).count(), 1);
}

#[test]
fn edited_version_always_wins_over_base() {
    let catalog = CatalogStore::new(seed(), MemoryStore::new());
    for (id, price) in [("1", 99.0), ("3", 25.0), ("1", 101.0)] {
        let mut product = catalog.base().get(&ProductId::new(id)).unwrap().clone();
        product.price = price;
        catalog.edit_product(product).unwrap();
    }

    let listed = catalog.list_products();
    assert_eq!(ids(&listed), vec!["1", "2", "3"]);
    assert_eq!(listed[0].price, 101.0);
    assert_eq!(listed[2].price, 25.0);
}

#[test]
fn tombstone_hides_product_even_when_edited() {
    let catalog = CatalogStore::new(seed(), MemoryStore::new());
    let id = ProductId::new("1");

    catalog.delete_product(&id).unwrap();
    catalog
        .edit_product(Product::new("1", "Apple", 1.0, CategoryTag::FruitsVeggies))
        .unwrap();

    assert!(catalog.list_products().iter().all(|p| p.id != id));
    assert!(catalog.get_product(&id).is_none());
}

#[test]
fn added_then_deleted_leaves_no_trace() {
    let catalog = CatalogStore::new(seed(), MemoryStore::new());
    let product = catalog
        .add_product(Product::new("1700000000000", "Kaju W240", 950.0, CategoryTag::DryFruitsNuts))
        .unwrap();

    assert_eq!(
        catalog.delete_product(&product.id).unwrap(),
        DeleteOutcome::RemovedAdded
    );

    let overlay = catalog.overlay();
    assert!(overlay.added.iter().all(|p| p.id != product.id));
    assert!(!overlay.deleted.contains(&product.id));
    assert!(catalog.get_product(&product.id).is_none());
}

#[test]
fn added_products_follow_base_in_creation_order() {
    let catalog = CatalogStore::new(seed(), MemoryStore::new());
    catalog
        .add_product(Product::new("20", "Almonds", 700.0, CategoryTag::DryFruitsNuts))
        .unwrap();
    catalog
        .add_product(Product::new("10", "Raisins", 300.0, CategoryTag::DryFruitsNuts))
        .unwrap();
    catalog.delete_product(&ProductId::new("2")).unwrap();

    assert_eq!(ids(&catalog.list_products()), vec!["1", "3", "20", "10"]);
}

#[test]
fn overlay_survives_reopening_a_file_store() {
    let dir = tempfile::tempdir().unwrap();

    {
        let catalog = CatalogStore::new(seed(), FileStore::open(dir.path()).unwrap());
        catalog
            .add_draft(
                ProductDraft::new("Fortune Rice Bran Oil", 165.0)
                    .with_id("50")
                    .with_category("grocery"),
            )
            .unwrap();
        catalog.delete_product(&ProductId::new("1")).unwrap();
    }

    let catalog = CatalogStore::new(seed(), FileStore::open(dir.path()).unwrap());
    let listed = catalog.list_products();
    assert_eq!(ids(&listed), vec!["2", "3", "50"]);
    assert_eq!(listed[2].category, CategoryTag::CookingOil);
    assert_eq!(catalog.version(), 2);
}

#[test]
fn corrupt_overlay_degrades_to_base_catalog() {
    let backend = Arc::new(MemoryStore::new());
    let catalog = CatalogStore::new(seed(), Arc::clone(&backend));
    catalog.delete_product(&ProductId::new("1")).unwrap();

    backend.set(catalog.overlay_key(), b"\x00\x01 definitely not json").unwrap();

    assert_eq!(catalog.list_products(), seed().products().to_vec());
}

#[test]
fn overlay_is_one_versioned_document() {
    let backend = Arc::new(MemoryStore::new());
    let catalog = CatalogStore::new(seed(), Arc::clone(&backend));
    catalog
        .add_product(Product::new("10", "Jaggery", 80.0, CategoryTag::SugarSaltJaggery))
        .unwrap();
    catalog.delete_product(&ProductId::new("2")).unwrap();

    assert_eq!(backend.keys().unwrap(), vec!["catalog:default:overlay"]);

    let bytes = backend.get("catalog:default:overlay").unwrap().unwrap();
    let stored: Versioned<OverlayDocument> = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(stored.version, 2);
    assert_eq!(stored.data.added.len(), 1);
    assert_eq!(stored.data.deleted, vec![ProductId::new("2")]);
}

#[test]
fn legacy_tombstones_are_imported_once() {
    let backend = Arc::new(MemoryStore::new());
    backend.set(LEGACY_DELETED_KEY, br#"["3"]"#).unwrap();

    let catalog = CatalogStore::new(seed(), Arc::clone(&backend));
    let first = catalog.migrate_legacy_slots().unwrap();
    let second = catalog.migrate_legacy_slots().unwrap();

    assert_eq!(first.deleted, 1);
    assert!(second.is_empty());
    assert_eq!(ids(&catalog.list_products()), vec!["1", "2"]);
}

#[test]
fn query_runs_over_reconciled_view() {
    let catalog = CatalogStore::new(seed(), MemoryStore::new());
    catalog
        .edit_product(Product::new("1", "Apple", 120.0, CategoryTag::FruitsVeggies).with_in_stock(false))
        .unwrap();

    let results = catalog.query(&CatalogQuery::new().in_stock_only());
    assert_eq!(ids(&results.items), vec!["2", "3"]);

    let results = catalog.query(&CatalogQuery::new().with_category(CategoryTag::FruitsVeggies));
    assert_eq!(ids(&results.items), vec!["1"]);
}
