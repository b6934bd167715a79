//! Cart and wishlist state surviving a reload from the file-backed storage.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use slayk_core::Price;
use slayk_integration_tests::product;
use slayk_storefront::cart::{CART_STORAGE_KEY, CartStore, WISHLIST_STORAGE_KEY};
use slayk_storefront::storage::{FileStorage, KeyValueStorage};
use tempfile::TempDir;

fn open(dir: &TempDir) -> CartStore<FileStorage> {
    CartStore::load(FileStorage::open(dir.path()).unwrap())
}

// ============================================================================
// Round-trip
// ============================================================================

#[test]
fn test_cart_and_wishlist_survive_reload() {
    let dir = TempDir::new().unwrap();
    let bedsheet = product("botanical-dreams-bedsheet");
    let curtains = product("sheer-elegance-curtains");

    let (lines, wishlist) = {
        let mut store = open(&dir);
        store.add_to_cart(&bedsheet, 2, Some("King"), Some("Sage Green"));
        store.add_to_cart(&curtains, 1, Some("7 ft"), Some("Ivory"));
        store.toggle_wishlist(&curtains);
        (store.lines().to_vec(), store.wishlist().to_vec())
    };

    let store = open(&dir);
    assert_eq!(store.lines(), lines.as_slice());
    assert_eq!(store.wishlist(), wishlist.as_slice());
    assert_eq!(store.cart_total(), Price::rupees(2499 * 2 + 1899));
    assert_eq!(store.cart_count(), 3);
    assert!(store.is_in_wishlist(&curtains.id));
}

#[test]
fn test_line_ids_are_stable_across_reload() {
    let dir = TempDir::new().unwrap();
    let line_id = open(&dir).add_default_variant(&product("turkish-bath-towels"));

    let mut store = open(&dir);
    store.update_quantity(line_id, 4);

    let store = open(&dir);
    assert_eq!(store.line(line_id).map(|l| l.quantity), Some(4));
}

#[test]
fn test_drawer_flag_is_not_persisted() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        store.add_default_variant(&product("velvet-luxe-cushion"));
        assert!(store.is_drawer_open());
    }

    assert!(!open(&dir).is_drawer_open());
}

#[test]
fn test_clear_cart_keeps_wishlist_on_disk() {
    let dir = TempDir::new().unwrap();
    let rug = product("handwoven-jute-rug");
    {
        let mut store = open(&dir);
        store.add_default_variant(&rug);
        store.toggle_wishlist(&rug);
        store.clear_cart();
    }

    let store = open(&dir);
    assert!(store.is_empty());
    assert_eq!(store.wishlist_count(), 1);
}

// ============================================================================
// Persisted format
// ============================================================================

#[test]
fn test_persisted_cart_is_json_array_under_fixed_key() {
    let dir = TempDir::new().unwrap();
    let mut store = open(&dir);
    store.add_to_cart(&product("ceramic-dinner-set"), 1, Some("24 Pcs"), Some("White Gold"));

    let raw = store.storage().get(CART_STORAGE_KEY).unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let line = &json.as_array().unwrap()[0];

    assert_eq!(line["slug"], "ceramic-dinner-set");
    assert_eq!(line["quantity"], 1);
    assert_eq!(line["selected_size"], "24 Pcs");
    assert_eq!(line["selected_color"], "White Gold");
    assert!(line["line_id"].is_string());

    // The wishlist was never touched, so nothing was written for it.
    assert!(store.storage().get(WISHLIST_STORAGE_KEY).unwrap().is_none());
}

// ============================================================================
// Fail-soft hydration
// ============================================================================

#[test]
fn test_corrupt_files_hydrate_empty() {
    let dir = TempDir::new().unwrap();
    {
        let mut storage = FileStorage::open(dir.path()).unwrap();
        storage.set(CART_STORAGE_KEY, "{not json").unwrap();
        storage.set(WISHLIST_STORAGE_KEY, r#"{"an": "object"}"#).unwrap();
    }

    let store = open(&dir);
    assert!(store.is_empty());
    assert_eq!(store.wishlist_count(), 0);
}

#[test]
fn test_corrupt_cart_does_not_affect_wishlist() {
    let dir = TempDir::new().unwrap();
    {
        let mut store = open(&dir);
        store.toggle_wishlist(&product("minimalist-pendant-light"));
    }
    FileStorage::open(dir.path())
        .unwrap()
        .set(CART_STORAGE_KEY, "[1, 2, 3]")
        .unwrap();

    let store = open(&dir);
    assert!(store.is_empty());
    assert_eq!(store.wishlist_count(), 1);
}

#[test]
fn test_missing_directory_is_created() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("state").join("slayk");

    let mut store = CartStore::load(FileStorage::open(&nested).unwrap());
    store.add_default_variant(&product("boho-macrame-wall"));

    assert!(nested.join(format!("{CART_STORAGE_KEY}.json")).is_file());
}
