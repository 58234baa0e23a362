use std::path::Path;
use std::time::Instant;

use catlift_core::{Environment, ProductDraft};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use super::*;

const CREATED: &str = r#"{"product":{"id":555,"title":"Linen Shirt","variants":[]}}"#;

fn app_config(data_dir: &Path, store_url: &str, provision_delay_ms: u64) -> AppConfig {
    AppConfig {
        env: Environment::Test,
        log_level: "debug".to_string(),
        site_path: data_dir.join("site.yaml"),
        data_dir: data_dir.to_path_buf(),
        fetch_timeout_secs: 5,
        fetch_user_agent: "catlift-test/0.1".to_string(),
        fetch_max_retries: 0,
        fetch_retry_backoff_ms: 0,
        inter_request_delay_ms: 0,
        shopify_store_url: Some(store_url.to_string()),
        shopify_access_token: Some("shpat_test".to_string()),
        shopify_api_version: "2023-07".to_string(),
        provision_delay_ms,
    }
}

fn record(title: &str, extracted: bool) -> ProductDraft {
    let mut record = ProductDraft::seed("https://shop.example.com/p/x", title).expect("valid title");
    if extracted {
        record.title = Some(title.to_string());
    }
    record
}

async fn products_endpoint(server: &MockServer, expected_calls: u64) {
    Mock::given(method("POST"))
        .and(path("/admin/api/2023-07/products.json"))
        .respond_with(ResponseTemplate::new(201).set_body_raw(CREATED, "application/json"))
        .expect(expected_calls)
        .mount(server)
        .await;
}

#[tokio::test]
async fn only_extracted_records_are_provisioned() {
    let server = MockServer::start().await;
    products_endpoint(&server, 2).await;
    let dir = TempDir::new().unwrap();
    let config = app_config(dir.path(), &server.uri(), 0);
    CatalogStore::open(config.catalog_path())
        .seed(vec![
            record("Linen Shirt", true),
            record("Oxford Shirt", false),
            record("Denim Shirt", true),
        ])
        .unwrap();
    let client = build_admin_client(&config).expect("client builds");

    let summary = provision_catalog(&config, &client).await.expect("provision runs");

    assert_eq!(summary, StageSummary { succeeded: 2, failed: 0 });
}

#[tokio::test]
async fn delay_separates_consecutive_products() {
    let server = MockServer::start().await;
    products_endpoint(&server, 2).await;
    let dir = TempDir::new().unwrap();
    let config = app_config(dir.path(), &server.uri(), 200);
    CatalogStore::open(config.catalog_path())
        .seed(vec![record("Linen Shirt", true), record("Denim Shirt", true)])
        .unwrap();
    let client = build_admin_client(&config).expect("client builds");

    let start = Instant::now();
    provision_catalog(&config, &client).await.expect("provision runs");

    assert!(
        start.elapsed() >= Duration::from_millis(200),
        "expected one pause between products, got: {:?}",
        start.elapsed()
    );
}

#[tokio::test]
async fn failed_product_is_counted_and_the_run_continues() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(422).set_body_string(r#"{"errors":"invalid"}"#))
        .expect(2)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();
    let config = app_config(dir.path(), &server.uri(), 0);
    CatalogStore::open(config.catalog_path())
        .seed(vec![record("Linen Shirt", true), record("Denim Shirt", true)])
        .unwrap();
    let client = build_admin_client(&config).expect("client builds");

    let summary = provision_catalog(&config, &client).await.expect("provision runs");

    assert_eq!(summary, StageSummary { succeeded: 0, failed: 2 });
}

#[test]
fn missing_credentials_are_reported() {
    let dir = TempDir::new().unwrap();
    let mut config = app_config(dir.path(), "https://shop.example.com", 0);
    config.shopify_access_token = None;

    let Err(err) = build_admin_client(&config) else {
        panic!("expected missing token to be rejected");
    };

    assert!(
        err.to_string().contains("CATLIFT_SHOPIFY_ACCESS_TOKEN"),
        "got: {err}"
    );
}
