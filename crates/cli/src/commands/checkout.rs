//! Checkout commands.

use std::io::Write;

use slayk_core::PaymentMethod;
use slayk_storefront::Result;
use slayk_storefront::api::ApiClient;
use slayk_storefront::cart::CartStore;
use slayk_storefront::checkout::{
    CheckoutStep, CheckoutSummary, ShippingForm, ShippingPolicy, place_order, prepare_order,
};
use slayk_storefront::storage::KeyValueStorage;

pub fn summary<S: KeyValueStorage>(
    store: &CartStore<S>,
    policy: &ShippingPolicy,
    out: &mut impl Write,
) -> Result<()> {
    if store.is_empty() {
        writeln!(out, "Your cart is empty; nothing to check out")?;
        return Ok(());
    }

    let summary = CheckoutSummary::for_store(store, policy);
    writeln!(out, "Items:    {}", summary.item_count)?;
    writeln!(out, "Subtotal: {}", summary.subtotal)?;
    if summary.shipping.is_zero() {
        writeln!(out, "Shipping: FREE")?;
    } else {
        writeln!(out, "Shipping: {}", summary.shipping)?;
    }
    writeln!(out, "Total:    {}", summary.total)?;
    Ok(())
}

/// Walk the three checkout steps and place the order.
///
/// With `dry_run` the order payload is printed and nothing is sent; the
/// cart stays as it is.
pub async fn place<S: KeyValueStorage>(
    client: Option<&ApiClient>,
    store: &mut CartStore<S>,
    form: &ShippingForm,
    payment_method: PaymentMethod,
    policy: &ShippingPolicy,
    dry_run: bool,
    out: &mut impl Write,
) -> Result<()> {
    let draft = prepare_order(store, form, payment_method, policy)?;
    for step in std::iter::successors(Some(CheckoutStep::default()), |step| step.next()) {
        let address = &draft.shipping_address;
        let detail = match step {
            CheckoutStep::Shipping => format!(
                "{} {}, {}, {} {}",
                address.first_name, address.last_name, address.city, address.state, address.pincode
            ),
            CheckoutStep::Payment => payment_method.label().to_owned(),
            CheckoutStep::Review => format!("{} items, total {}", draft.items.len(), draft.total),
        };
        writeln!(out, "[{}/3] {}: {detail}", step.number(), step.title())?;
    }

    let Some(client) = client.filter(|_| !dry_run) else {
        serde_json::to_writer_pretty(&mut *out, &draft).map_err(std::io::Error::from)?;
        writeln!(out)?;
        writeln!(out, "Dry run: order not placed")?;
        return Ok(());
    };

    let order = place_order(store, form, payment_method, policy, client).await?;
    writeln!(out, "Order placed: {}", order.order_number)?;
    writeln!(out, "Status:       {}", order.status)?;
    writeln!(out, "Payment:      {}", order.payment_method.label())?;
    writeln!(out, "Total:        {}", order.total)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slayk_core::Product;
    use slayk_storefront::storage::MemoryStorage;

    use super::*;

    fn form() -> ShippingForm {
        ShippingForm {
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: "asha@example.in".into(),
            address: "12 MG Road".into(),
            city: "Bengaluru".into(),
            state: "Karnataka".into(),
            pincode: "560001".into(),
            phone: "9876543210".into(),
        }
    }

    fn store() -> CartStore<MemoryStorage> {
        let product: Product = serde_json::from_str(
            r#"{"id": 7, "name": "Waffle Towel", "slug": "waffle-towel",
                "category": "towels", "price": 1200, "originalPrice": 1500}"#,
        )
        .unwrap();
        let mut store = CartStore::load(MemoryStorage::new());
        store.add_default_variant(&product);
        store
    }

    #[tokio::test]
    async fn test_dry_run_prints_payload_and_keeps_cart() {
        let mut store = store();
        let mut out = Vec::new();
        place(
            None,
            &mut store,
            &form(),
            PaymentMethod::Cod,
            &ShippingPolicy::default(),
            true,
            &mut out,
        )
        .await
        .unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("[1/3] Shipping: Asha Rao, Bengaluru, Karnataka 560001\n"));
        assert!(out.contains("[2/3] Payment: Cash on Delivery"));
        assert!(out.contains("[3/3] Review: 1 items, total ₹1,200"));
        assert!(out.contains("\"payment_method\": \"cod\""));
        assert!(out.contains("\"total\": 1200.0"));
        assert!(out.ends_with("Dry run: order not placed\n"));
        assert_eq!(store.line_count(), 1);
    }

    #[test]
    fn test_summary_output() {
        let mut out = Vec::new();
        summary(&store(), &ShippingPolicy::default(), &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Items:    1"));
        assert!(out.contains("Shipping: FREE"));
        assert!(out.contains("Total:    ₹1,200"));
    }

    #[test]
    fn test_summary_of_empty_cart() {
        let mut out = Vec::new();
        let empty = CartStore::load(MemoryStorage::new());
        summary(&empty, &ShippingPolicy::default(), &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out, "Your cart is empty; nothing to check out\n");
        assert!(!out.contains("FREE"));
    }
}
