//! REST client tests.
//!
//! The ignored tests need a running backend with the demo catalog seeded:
//!
//! ```bash
//! SLAYK_API_URL=http://127.0.0.1:8000/api cargo test -p slayk-integration-tests -- --ignored
//! ```
//!
//! The admin tests also read `SLAYK_ADMIN_EMAIL` and `SLAYK_ADMIN_PASSWORD`.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use secrecy::SecretString;
use slayk_core::{Email, OrderStatus};
use slayk_integration_tests::{CATALOG_JSON, catalog, shipping_form};
use slayk_storefront::admin::{InventoryReport, OrderQuery, OrderUpdate, StockLevel};
use slayk_storefront::api::{ApiClient, ApiError};
use slayk_storefront::cart::CartStore;
use slayk_storefront::catalog::{FilterSortSpec, query_products};
use slayk_storefront::checkout::{ShippingPolicy, prepare_order};
use slayk_storefront::config::ApiConfig;
use slayk_storefront::storage::MemoryStorage;
use url::Url;

/// Base URL for the backend (configurable via environment).
fn api_base_url() -> Url {
    let raw =
        std::env::var("SLAYK_API_URL").unwrap_or_else(|_| "http://127.0.0.1:8000/api".to_string());
    Url::parse(&raw).unwrap()
}

fn client(base_url: Url) -> ApiClient {
    ApiClient::new(&ApiConfig {
        base_url,
        cache_ttl: Duration::from_secs(60),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

// ============================================================================
// Offline
// ============================================================================

#[tokio::test]
async fn test_unreachable_backend_is_http_error() {
    // Nothing listens on port 1.
    let client = client(Url::parse("http://127.0.0.1:1/api").unwrap());

    let result = client.products(None, None).await;
    assert!(matches!(result, Err(ApiError::Http(_))), "got {result:?}");

    let result = client.categories().await;
    assert!(matches!(result, Err(ApiError::Http(_))));
}

#[test]
fn test_backend_product_shape_matches_fixture() {
    // The fixture uses the mock camelCase spelling; the backend sends
    // snake_case. Both must land on the same record.
    let products: Vec<slayk_core::Product> = serde_json::from_str(CATALOG_JSON).unwrap();
    let reencoded = serde_json::to_string(&products).unwrap();
    assert!(reencoded.contains("\"original_price\""));

    let decoded: Vec<slayk_core::Product> = serde_json::from_str(&reencoded).unwrap();
    assert_eq!(decoded, products);
}

#[test]
fn test_fixture_inventory_summary_is_consistent() {
    let products = catalog();
    let report = InventoryReport::from_products(&products);
    let summary = &report.summary;

    assert_eq!(summary.total, products.len());
    assert_eq!(
        summary.out_of_stock_count + summary.low_stock_count + summary.in_stock_count,
        summary.total
    );
    for level in [StockLevel::OutOfStock, StockLevel::Low, StockLevel::InStock] {
        let bucket = report.bucket(level);
        assert!(bucket.iter().all(|item| item.level() == level));
        assert!(bucket.windows(2).all(|w| w[0].stock_quantity <= w[1].stock_quantity));
    }
}

#[tokio::test]
async fn test_admin_call_without_backend_is_http_error() {
    let client = client(Url::parse("http://127.0.0.1:1/api").unwrap());
    let token = SecretString::from("not-a-real-token");

    let result = client.dashboard_stats(&token).await;
    assert!(matches!(result, Err(ApiError::Http(_))), "got {result:?}");
}

// ============================================================================
// Live backend
// ============================================================================

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_live_products_and_categories() {
    let client = client(api_base_url());

    let products = client.products(None, None).await.unwrap();
    assert!(!products.is_empty());

    let categories = client.categories().await.unwrap();
    let first = &categories[0];
    let in_category = client.products(Some(&first.slug), None).await.unwrap();
    assert!(in_category.iter().all(|p| p.category == first.slug));

    // Local filtering agrees with the backend's category filter.
    let local = query_products(&products, &FilterSortSpec::for_category(first.slug.clone()));
    assert_eq!(local.len(), in_category.len());
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_live_product_by_slug() {
    let client = client(api_base_url());
    let products = client.products(None, None).await.unwrap();
    let slug = &products[0].slug;

    let product = client.product_by_slug(slug).await.unwrap();
    assert_eq!(&product.slug, slug);

    let missing = client.product_by_slug("no-such-product-slug").await;
    assert!(matches!(missing, Err(ApiError::NotFound(_))));
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_live_create_order() {
    let client = client(api_base_url());
    let products = client.products(None, None).await.unwrap();

    let mut store = CartStore::load(MemoryStorage::new());
    store.add_default_variant(&products[0]);
    let draft =
        prepare_order(&store, &shipping_form(), slayk_core::PaymentMethod::Cod, &ShippingPolicy::default())
            .unwrap();

    let order = client.create_order(&draft).await.unwrap();
    assert!(order.order_number.starts_with("SLAYK-"));
    assert_eq!(order.total, draft.total);
    assert_eq!(order.items.len(), 1);
}

async fn admin_login(client: &ApiClient) -> SecretString {
    let email = std::env::var("SLAYK_ADMIN_EMAIL").unwrap();
    let password = std::env::var("SLAYK_ADMIN_PASSWORD").unwrap();
    let session = client
        .login(&Email::parse(&email).unwrap(), &SecretString::from(password))
        .await
        .unwrap();
    session.access_token
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_live_admin_login_rejects_bad_password() {
    let client = client(api_base_url());
    let email = std::env::var("SLAYK_ADMIN_EMAIL").unwrap();

    let result = client
        .login(&Email::parse(&email).unwrap(), &SecretString::from("wrong-password"))
        .await;
    assert!(matches!(result, Err(ApiError::Unauthorized(_))), "got {result:?}");
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_live_dashboard_and_inventory() {
    let client = client(api_base_url());
    let token = admin_login(&client).await;

    let stats = client.dashboard_stats(&token).await.unwrap();
    let report = client.inventory(&token).await.unwrap();

    let summary = &report.summary;
    assert_eq!(u64::try_from(summary.total).unwrap(), stats.total_products);
    assert_eq!(
        summary.out_of_stock_count + summary.low_stock_count + summary.in_stock_count,
        summary.total
    );
    assert!(report.bucket(StockLevel::Low).iter().all(|item| item.level() == StockLevel::Low));
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_live_orders_and_status_update() {
    let client = client(api_base_url());
    let token = admin_login(&client).await;

    let products = client.products(None, None).await.unwrap();
    let mut store = CartStore::load(MemoryStorage::new());
    store.add_default_variant(&products[0]);
    let draft =
        prepare_order(&store, &shipping_form(), slayk_core::PaymentMethod::Upi, &ShippingPolicy::default())
            .unwrap();
    let placed = client.create_order(&draft).await.unwrap();

    let pending = client
        .orders(&token, &OrderQuery { status: Some(OrderStatus::Pending), limit: Some(50) })
        .await
        .unwrap();
    assert!(pending.iter().all(|o| o.status == OrderStatus::Pending));
    assert!(pending.iter().any(|o| o.id == placed.id));

    let update = OrderUpdate {
        status: Some(OrderStatus::Shipped),
        tracking_number: Some("DLV123456".to_string()),
    };
    let shipped = client.update_order(&token, &placed.id, &update).await.unwrap();
    assert_eq!(shipped.status, OrderStatus::Shipped);
    assert_eq!(shipped.tracking_number.as_deref(), Some("DLV123456"));
}

#[tokio::test]
#[ignore = "Requires running backend"]
async fn test_live_stock_update_shows_in_catalog() {
    let client = client(api_base_url());
    let token = admin_login(&client).await;

    let products = client.products(None, None).await.unwrap();
    let product = &products[0];
    let original = product.stock_quantity;

    let update = client.update_stock(&token, &product.id, 3).await.unwrap();
    assert_eq!(update.stock_quantity, 3);
    assert!(update.in_stock);

    // The cached listing was dropped, so the new stock is visible.
    let refreshed = client.product_by_slug(&product.slug).await.unwrap();
    assert_eq!(refreshed.stock_quantity, 3);

    client.update_stock(&token, &product.id, original).await.unwrap();
}
