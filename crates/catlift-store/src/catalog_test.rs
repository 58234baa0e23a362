use catlift_core::{Image, Metafield, OptionName, Variant};
use tempfile::TempDir;

use super::*;

fn store_in(dir: &TempDir) -> CatalogStore {
    CatalogStore::open(dir.path().join("catalog.json"))
}

fn seed_record(handle: &str) -> ProductDraft {
    let mut record = ProductDraft::seed(format!("https://shop.example.com/p/{handle}"), handle)
        .expect("valid title");
    record.product_type = Some("Shirts".to_string());
    record.tags = vec!["Men".to_string(), "Shirts".to_string()];
    record
}

fn find(store: &CatalogStore, handle: &str) -> ProductDraft {
    store
        .load()
        .unwrap()
        .into_iter()
        .find(|r| r.handle == handle)
        .expect("record exists")
}

fn enrichment() -> ProductUpdate {
    ProductUpdate {
        title: Some("Linen Shirt".to_string()),
        description: Some("A breathable shirt.".to_string()),
        sku: Some("100".to_string()),
        price: Some("€30.00".to_string()),
        vendor: Some("Test Vendor".to_string()),
        options: Some(vec![OptionName {
            name: "Colour".to_string(),
        }]),
        variants: Some(vec![Variant {
            option1: "Red".to_string(),
            option2: Some("S".to_string()),
            sku: Some("100".to_string()),
            price: Some("€30.00".to_string()),
            compare_at_price: String::new(),
            inventory_quantity: 12,
            inventory_management: "shopify".to_string(),
            inventory_policy: "deny".to_string(),
        }]),
        images: Some(vec![Image {
            src: "/img/red-1.jpg".to_string(),
            alt: None,
            associated_color: Some("Red".to_string()),
        }]),
        metafields: Some(vec![Metafield::new(
            "size_and_fit",
            "Regular".to_string(),
            "string",
        )]),
        ..ProductUpdate::default()
    }
}

// ---------------------------------------------------------------------------
// load / seed
// ---------------------------------------------------------------------------

#[test]
fn missing_file_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    assert!(store_in(&dir).load().unwrap().is_empty());
}

#[test]
fn malformed_file_is_a_parse_error() {
    let dir = TempDir::new().unwrap();
    let store = store_in(&dir);
    std::fs::write(store.path(), "{not json").unwrap();

    let result = store.load();
    assert!(
        matches!(result, Err(StoreError::Parse { .. })),
        "expected Parse, got: {result:?}"
    );
}

#[test]
fn seed_keeps_first_record_per_handle() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);

    let mut duplicate = seed_record("linen-shirt");
    duplicate.product_type = Some("Sale".to_string());
    let summary = store
        .seed(vec![seed_record("linen-shirt"), seed_record("oxford-shirt"), duplicate])
        .unwrap();

    assert_eq!(summary, SeedSummary { stored: 2, duplicates: 1 });
    let records = store.load().unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].product_type.as_deref(), Some("Shirts"));
}

#[test]
fn seed_replaces_previous_contents() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.seed(vec![seed_record("old-shirt")]).unwrap();
    store.seed(vec![seed_record("new-shirt")]).unwrap();

    let handles: Vec<String> = store.load().unwrap().into_iter().map(|r| r.handle).collect();
    assert_eq!(handles, vec!["new-shirt"]);
}

#[test]
fn seed_creates_parent_directories() {
    let dir = TempDir::new().unwrap();
    let mut store = CatalogStore::open(dir.path().join("nested/data/catalog.json"));
    store.seed(vec![seed_record("linen-shirt")]).unwrap();
    assert_eq!(store.load().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// upsert
// ---------------------------------------------------------------------------

#[test]
fn upsert_overwrites_only_present_fields() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store
        .seed(vec![seed_record("linen-shirt"), seed_record("oxford-shirt")])
        .unwrap();

    store.upsert("linen-shirt", enrichment()).unwrap();

    let record = find(&store, "linen-shirt");
    assert_eq!(record.title.as_deref(), Some("Linen Shirt"));
    assert_eq!(record.variants.len(), 1);
    assert_eq!(record.product_type.as_deref(), Some("Shirts"), "seed fields survive");
    assert_eq!(record.tags, vec!["Men", "Shirts"]);
    assert_eq!(
        record.product_url.as_deref(),
        Some("https://shop.example.com/p/linen-shirt")
    );

    let untouched = find(&store, "oxford-shirt");
    assert_eq!(untouched, seed_record("oxford-shirt"));
}

#[test]
fn upsert_keeps_keys_no_stage_models() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    std::fs::write(
        store.path(),
        r#"[{"handle":"linen-shirt","status":"draft","shopify_id":42,"tags":["Men"]}]"#,
    )
    .unwrap();

    store.upsert("linen-shirt", enrichment()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw[0]["status"], "draft");
    assert_eq!(raw[0]["shopify_id"], 42);
    assert_eq!(raw[0]["title"], "Linen Shirt");
    assert_eq!(raw[0]["tags"], serde_json::json!(["Men"]));
}

#[test]
fn upsert_unknown_handle_is_not_found_and_changes_nothing() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.seed(vec![seed_record("linen-shirt")]).unwrap();
    let before = std::fs::read_to_string(store.path()).unwrap();

    let result = store.upsert("missing-shirt", enrichment());

    assert!(
        matches!(result, Err(StoreError::NotFound { ref handle }) if handle == "missing-shirt"),
        "expected NotFound, got: {result:?}"
    );
    assert_eq!(std::fs::read_to_string(store.path()).unwrap(), before);
}

#[test]
fn upsert_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.seed(vec![seed_record("linen-shirt")]).unwrap();

    store.upsert("linen-shirt", enrichment()).unwrap();
    let once = std::fs::read_to_string(store.path()).unwrap();
    store.upsert("linen-shirt", enrichment()).unwrap();
    let twice = std::fs::read_to_string(store.path()).unwrap();

    assert_eq!(once, twice);
}

#[test]
fn merge_target_delegates_to_upsert() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.seed(vec![seed_record("linen-shirt")]).unwrap();

    MergeTarget::merge(&mut store, "linen-shirt", enrichment()).unwrap();
    assert!(find(&store, "linen-shirt").is_enriched());
}

// ---------------------------------------------------------------------------
// Persistence format
// ---------------------------------------------------------------------------

#[test]
fn records_survive_a_reload() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.seed(vec![seed_record("linen-shirt")]).unwrap();
    store.upsert("linen-shirt", enrichment()).unwrap();
    let written = store.load().unwrap();

    let reopened = CatalogStore::open(store.path());
    assert_eq!(reopened.load().unwrap(), written);
}

#[test]
fn description_is_stored_as_body_html() {
    let dir = TempDir::new().unwrap();
    let mut store = store_in(&dir);
    store.seed(vec![seed_record("linen-shirt")]).unwrap();
    store.upsert("linen-shirt", enrichment()).unwrap();

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
    assert_eq!(raw[0]["body_html"], "A breathable shirt.");
    assert_eq!(raw[0]["metafields"][0]["type"], "string");
    assert_eq!(raw[0]["images"][0]["associated_color"], "Red");
}
