//! Cart commands.

use std::io::Write;

use slayk_core::LineId;
use slayk_storefront::cart::CartStore;
use slayk_storefront::checkout::{CheckoutSummary, ShippingPolicy};
use slayk_storefront::error::add_breadcrumb;
use slayk_storefront::storage::KeyValueStorage;
use slayk_storefront::{Result, StorefrontError};

use super::Catalog;

/// Print the cart lines and totals.
pub fn show<S: KeyValueStorage>(
    store: &CartStore<S>,
    policy: &ShippingPolicy,
    out: &mut impl Write,
) -> Result<()> {
    if store.is_empty() {
        writeln!(out, "Your cart is empty")?;
        return Ok(());
    }

    for line in store.lines() {
        let variant = line
            .variant_label()
            .map(|label| format!(" ({label})"))
            .unwrap_or_default();
        writeln!(
            out,
            "{}  {} x{}{variant}  {}",
            line.line_id, line.product.name, line.quantity, line.line_total()
        )?;
    }

    let summary = CheckoutSummary::for_store(store, policy);
    writeln!(out, "\nItems:    {}", summary.item_count)?;
    writeln!(out, "Subtotal: {}", summary.subtotal)?;
    if summary.shipping.is_zero() {
        writeln!(out, "Shipping: FREE")?;
    } else {
        writeln!(out, "Shipping: {}", summary.shipping)?;
    }
    writeln!(out, "Total:    {}", summary.total)?;
    if let Some(remaining) = policy.remaining_for_free(summary.subtotal) {
        writeln!(out, "Add {remaining} more for free shipping")?;
    }
    Ok(())
}

/// Add a product variant to the cart.
///
/// Missing size or color fall back to the product's first option. An
/// explicit size or color must be one the product offers.
pub async fn add<S: KeyValueStorage>(
    catalog: &Catalog,
    store: &mut CartStore<S>,
    slug: &str,
    quantity: u32,
    size: Option<String>,
    color: Option<String>,
    out: &mut impl Write,
) -> Result<()> {
    let product = catalog.product(slug).await?;

    if !product.in_stock {
        return Err(StorefrontError::BadRequest(format!("{} is out of stock", product.name)));
    }
    let size = pick_option("size", size, &product.sizes)?;
    let color = pick_option("color", color, &product.colors)?;

    let line_id = store.add_to_cart(&product, quantity, size.as_deref(), color.as_deref());
    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product.id.as_str())]));

    let quantity = store.line(line_id).map_or(quantity, |line| line.quantity);
    writeln!(out, "Added {} ({quantity} in cart)", product.name)?;
    writeln!(out, "Line: {line_id}")?;
    Ok(())
}

/// Resolve a requested variant option against what the product offers.
fn pick_option(
    what: &str,
    requested: Option<String>,
    offered: &[String],
) -> Result<Option<String>> {
    match requested {
        None => Ok(offered.first().cloned()),
        Some(value) if offered.is_empty() || offered.contains(&value) => Ok(Some(value)),
        Some(value) => Err(StorefrontError::BadRequest(format!(
            "{what} '{value}' is not available (choose from: {})",
            offered.join(", ")
        ))),
    }
}

pub fn remove<S: KeyValueStorage>(
    store: &mut CartStore<S>,
    line_id: LineId,
    out: &mut impl Write,
) -> Result<()> {
    let Some(name) = store.line(line_id).map(|line| line.product.name.clone()) else {
        return Err(StorefrontError::NotFound(format!("cart line {line_id}")));
    };
    store.remove_from_cart(line_id);
    add_breadcrumb("cart", "Removed from cart", None);
    writeln!(out, "Removed {name}")?;
    Ok(())
}

/// Set a line's quantity. Quantities below one leave the line unchanged.
pub fn update<S: KeyValueStorage>(
    store: &mut CartStore<S>,
    line_id: LineId,
    quantity: i64,
    out: &mut impl Write,
) -> Result<()> {
    if store.line(line_id).is_none() {
        return Err(StorefrontError::NotFound(format!("cart line {line_id}")));
    }
    if quantity < 1 {
        tracing::warn!(quantity, "Quantity must be at least 1; use `cart remove` to drop the line");
    }
    store.update_quantity(line_id, quantity);

    if let Some(line) = store.line(line_id) {
        writeln!(out, "{} x{}", line.product.name, line.quantity)?;
    }
    Ok(())
}

pub fn clear<S: KeyValueStorage>(store: &mut CartStore<S>, out: &mut impl Write) -> Result<()> {
    store.clear_cart();
    writeln!(out, "Cart cleared")?;
    Ok(())
}
