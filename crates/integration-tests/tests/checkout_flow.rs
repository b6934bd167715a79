//! From a persisted cart to an order payload.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::sync::Mutex;

use slayk_core::{OrderId, OrderStatus, PaymentMethod, Price};
use slayk_integration_tests::{product, shipping_form};
use slayk_storefront::api::ApiError;
use slayk_storefront::cart::CartStore;
use slayk_storefront::checkout::{
    CheckoutError, CheckoutSummary, Order, OrderDraft, OrderGateway, ShippingPolicy, place_order,
    prepare_order,
};
use slayk_storefront::storage::{FileStorage, MemoryStorage};
use tempfile::TempDir;

/// Records submitted drafts and answers like the backend would.
#[derive(Default)]
struct RecordingGateway {
    submitted: Mutex<Vec<OrderDraft>>,
    reject_with: Option<u16>,
}

impl OrderGateway for RecordingGateway {
    async fn submit_order(&self, draft: &OrderDraft) -> Result<Order, ApiError> {
        self.submitted.lock().unwrap().push(draft.clone());
        if let Some(status) = self.reject_with {
            return Err(ApiError::Api {
                status,
                message: "rejected".to_string(),
            });
        }
        Ok(Order {
            id: OrderId::new("2f1c7c1e"),
            order_number: "SLAYK-2F1C7C1E".to_string(),
            items: draft.items.clone(),
            shipping_address: draft.shipping_address.clone(),
            payment_method: draft.payment_method,
            subtotal: draft.subtotal,
            shipping: draft.shipping,
            total: draft.total,
            status: OrderStatus::Pending,
            tracking_number: None,
            created_at: Some("2026-10-19T10:00:00+00:00".to_string()),
        })
    }
}

#[test]
fn test_total_matches_line_sum() {
    let mut store = CartStore::load(MemoryStorage::new());
    store.add_to_cart(&product("botanical-dreams-bedsheet"), 2, Some("King"), None);
    store.add_to_cart(&product("boho-macrame-wall"), 1, Some("Small"), None);

    let summary = CheckoutSummary::for_store(&store, &ShippingPolicy::default());
    assert_eq!(summary.subtotal, Price::rupees(5997));
    assert_eq!(summary.item_count, 3);
    assert_eq!(summary.shipping, Price::ZERO);
    assert_eq!(summary.total, Price::rupees(5997));
}

#[test]
fn test_small_order_pays_shipping() {
    let mut store = CartStore::load(MemoryStorage::new());
    store.add_default_variant(&product("embroidered-table-runner"));

    let summary = CheckoutSummary::for_store(&store, &ShippingPolicy::default());
    assert_eq!(summary.shipping, Price::rupees(99));
    assert_eq!(summary.total, Price::rupees(898));
}

#[test]
fn test_custom_policy() {
    let mut store = CartStore::load(MemoryStorage::new());
    store.add_default_variant(&product("velvet-luxe-cushion"));
    let policy = ShippingPolicy {
        free_threshold: Price::rupees(1500),
        flat_fee: Price::rupees(49),
    };

    let summary = CheckoutSummary::for_store(&store, &policy);
    assert_eq!(summary.total, Price::rupees(1299 + 49));
}

#[test]
fn test_draft_carries_variants() {
    let mut store = CartStore::load(MemoryStorage::new());
    store.add_to_cart(&product("geometric-duvet-cover"), 1, Some("Super King"), Some("Terracotta"));

    let draft = prepare_order(&store, &shipping_form(), PaymentMethod::Netbanking, &ShippingPolicy::default())
        .unwrap();

    assert_eq!(draft.items.len(), 1);
    assert_eq!(draft.items[0].product_name, "Geometric Print Duvet Cover");
    assert_eq!(draft.items[0].selected_size.as_deref(), Some("Super King"));
    assert_eq!(draft.items[0].selected_color.as_deref(), Some("Terracotta"));
    assert_eq!(draft.shipping_address.phone.as_str(), "9820012345");
}

#[tokio::test]
async fn test_successful_order_empties_persisted_cart() {
    let dir = TempDir::new().unwrap();
    let gateway = RecordingGateway::default();
    {
        let mut store = CartStore::load(FileStorage::open(dir.path()).unwrap());
        store.add_default_variant(&product("turkish-bath-towels"));
        store.toggle_wishlist(&product("handwoven-jute-rug"));

        let order = place_order(
            &mut store,
            &shipping_form(),
            PaymentMethod::Upi,
            &ShippingPolicy::default(),
            &gateway,
        )
        .await
        .unwrap();

        assert_eq!(order.order_number, "SLAYK-2F1C7C1E");
        assert_eq!(order.status, OrderStatus::Pending);
    }

    let store = CartStore::load(FileStorage::open(dir.path()).unwrap());
    assert!(store.is_empty());
    assert_eq!(store.wishlist_count(), 1);

    let submitted = gateway.submitted.lock().unwrap();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].total, Price::rupees(1799));
}

#[tokio::test]
async fn test_rejected_order_keeps_cart() {
    let dir = TempDir::new().unwrap();
    let gateway = RecordingGateway {
        reject_with: Some(422),
        ..Default::default()
    };
    let mut store = CartStore::load(FileStorage::open(dir.path()).unwrap());
    store.add_default_variant(&product("ceramic-dinner-set"));

    let result = place_order(
        &mut store,
        &shipping_form(),
        PaymentMethod::Card,
        &ShippingPolicy::default(),
        &gateway,
    )
    .await;

    assert!(matches!(
        result,
        Err(CheckoutError::Submit(ApiError::Api { status: 422, .. }))
    ));
    let reloaded = CartStore::load(FileStorage::open(dir.path()).unwrap());
    assert_eq!(reloaded.line_count(), 1);
}

#[tokio::test]
async fn test_empty_cart_never_reaches_gateway() {
    let gateway = RecordingGateway::default();
    let mut store = CartStore::load(MemoryStorage::new());

    let result = place_order(
        &mut store,
        &shipping_form(),
        PaymentMethod::Cod,
        &ShippingPolicy::default(),
        &gateway,
    )
    .await;

    assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    assert!(gateway.submitted.lock().unwrap().is_empty());
}
