//! Admin commands: dashboard, inventory, orders and stock.
//!
//! # Usage
//!
//! ```bash
//! # Log in once; the token is kept under SLAYK_DATA_DIR
//! SLAYK_ADMIN_PASSWORD=... slayk admin login --email admin@slayk.in
//!
//! slayk admin stats
//! slayk admin inventory --attention
//! slayk admin orders --status pending --limit 20
//! slayk admin order-status 2f1c7c1e-... shipped --tracking DLV123456
//! slayk admin stock 7 25
//! ```
//!
//! `SLAYK_ADMIN_TOKEN` takes precedence over the saved token.

use std::io::{BufRead, Write};

use secrecy::SecretString;
use slayk_core::{Email, OrderId, OrderStatus, ProductId};
use slayk_storefront::admin::{
    InventoryItem, InventoryReport, OrderQuery, OrderUpdate, StockLevel, clear_token, load_token,
    save_token,
};
use slayk_storefront::api::{ApiClient, ApiError};
use slayk_storefront::checkout::Order;
use slayk_storefront::error::add_breadcrumb;
use slayk_storefront::storage::KeyValueStorage;
use slayk_storefront::{Result, StorefrontError};

use super::Catalog;

/// Pick the admin token: the environment first, then the saved one.
///
/// # Errors
///
/// Returns [`ApiError::Unauthorized`] if there is neither.
pub fn resolve_token<S: KeyValueStorage>(
    env_token: Option<&SecretString>,
    storage: &S,
) -> Result<SecretString> {
    if let Some(token) = env_token {
        return Ok(token.clone());
    }
    load_token(storage)?.ok_or_else(|| {
        ApiError::Unauthorized("not logged in; run `slayk admin login`".to_string()).into()
    })
}

/// The REST client, or an error for a file catalog.
pub fn require_api(catalog: &Catalog) -> Result<&ApiClient> {
    match catalog {
        Catalog::Api(client) => Ok(client),
        Catalog::File(_) => Err(StorefrontError::BadRequest(
            "this admin command needs the REST backend; drop --catalog".to_string(),
        )),
    }
}

/// Read a password from the first line of `input`.
pub fn read_password(input: &mut impl BufRead) -> Result<SecretString> {
    let mut line = String::new();
    input.read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        return Err(StorefrontError::BadRequest("password is required".to_string()));
    }
    Ok(SecretString::from(password))
}

pub async fn login<S: KeyValueStorage>(
    client: &ApiClient,
    storage: &mut S,
    email: &str,
    password: &SecretString,
    out: &mut impl Write,
) -> Result<()> {
    let email = Email::parse(email).map_err(|e| StorefrontError::BadRequest(e.to_string()))?;
    let session = client.login(&email, password).await?;
    save_token(storage, &session.access_token)?;

    add_breadcrumb("admin", "Logged in", Some(&[("role", session.user.role.as_str())]));
    writeln!(out, "Logged in as {} ({})", session.user.name, session.user.role)?;
    Ok(())
}

pub fn logout<S: KeyValueStorage>(storage: &mut S, out: &mut impl Write) -> Result<()> {
    clear_token(storage)?;
    writeln!(out, "Logged out")?;
    Ok(())
}

/// Print dashboard totals and the latest orders.
pub async fn stats(client: &ApiClient, token: &SecretString, out: &mut impl Write) -> Result<()> {
    let stats = client.dashboard_stats(token).await?;

    writeln!(out, "Products:       {}", stats.total_products)?;
    writeln!(out, "Orders:         {}", stats.total_orders)?;
    writeln!(out, "Revenue:        {}", stats.total_revenue)?;
    writeln!(out, "Pending orders: {}", stats.pending_orders)?;
    writeln!(out, "Low stock:      {}", stats.low_stock_products)?;

    if !stats.recent_orders.is_empty() {
        writeln!(out, "\nRecent orders:")?;
        for order in &stats.recent_orders {
            writeln!(out, "{}", order_row(order))?;
        }
    }
    Ok(())
}

/// Stock report for either catalog source.
///
/// A catalog file is bucketed locally and needs no token.
pub async fn inventory_report(catalog: &Catalog, token: Option<&SecretString>) -> Result<InventoryReport> {
    match (catalog, token) {
        (Catalog::File(products), _) => Ok(InventoryReport::from_products(products)),
        (Catalog::Api(client), Some(token)) => Ok(client.inventory(token).await?),
        (Catalog::Api(_), None) => Err(ApiError::Unauthorized(
            "not logged in; run `slayk admin login`".to_string(),
        )
        .into()),
    }
}

/// Print a stock report, optionally only the buckets that need restocking.
pub fn print_inventory(
    report: &InventoryReport,
    attention_only: bool,
    out: &mut impl Write,
) -> Result<()> {
    let summary = &report.summary;
    writeln!(
        out,
        "{} products: {} out of stock, {} low, {} in stock",
        summary.total, summary.out_of_stock_count, summary.low_stock_count, summary.in_stock_count
    )?;

    if attention_only && report.needs_attention().next().is_none() {
        writeln!(out, "Nothing needs restocking")?;
        return Ok(());
    }

    let levels: &[StockLevel] = if attention_only {
        &[StockLevel::OutOfStock, StockLevel::Low]
    } else {
        &[StockLevel::OutOfStock, StockLevel::Low, StockLevel::InStock]
    };
    for &level in levels {
        let items = report.bucket(level);
        if items.is_empty() {
            continue;
        }
        writeln!(out, "\n{}:", level.label())?;
        for item in items {
            writeln!(out, "{}", inventory_row(item))?;
        }
    }
    Ok(())
}

fn inventory_row(item: &InventoryItem) -> String {
    format!(
        "  {:>4}  {}  {} ({})  {}",
        item.stock_quantity, item.id, item.name, item.category, item.price
    )
}

pub async fn orders(
    client: &ApiClient,
    token: &SecretString,
    query: &OrderQuery,
    out: &mut impl Write,
) -> Result<()> {
    let orders = client.orders(token, query).await?;
    if orders.is_empty() {
        writeln!(out, "No orders")?;
        return Ok(());
    }
    for order in &orders {
        writeln!(out, "{}", order_row(order))?;
    }
    Ok(())
}

pub async fn set_status(
    client: &ApiClient,
    token: &SecretString,
    order_id: &OrderId,
    update: &OrderUpdate,
    out: &mut impl Write,
) -> Result<()> {
    if update.is_empty() {
        return Err(StorefrontError::BadRequest("nothing to update".to_string()));
    }
    if update.status == Some(OrderStatus::Shipped) && update.tracking_number.is_none() {
        tracing::warn!(%order_id, "Marking order shipped without a tracking number");
    }

    let order = client.update_order(token, order_id, update).await?;
    writeln!(out, "{}", order_row(&order))?;
    Ok(())
}

pub async fn stock(
    client: &ApiClient,
    token: &SecretString,
    product_id: &ProductId,
    quantity: u32,
    out: &mut impl Write,
) -> Result<()> {
    let update = client.update_stock(token, product_id, quantity).await?;
    let level = StockLevel::for_quantity(update.stock_quantity);
    writeln!(
        out,
        "{product_id}: {} units ({})",
        update.stock_quantity,
        level.label()
    )?;
    Ok(())
}

/// One order as a listing row.
pub(crate) fn order_row(order: &Order) -> String {
    let address = &order.shipping_address;
    let tracking = order
        .tracking_number
        .as_deref()
        .map(|t| format!("  tracking {t}"))
        .unwrap_or_default();
    format!(
        "{}  {:<10}  {:>10}  {} items  {} {}, {}{tracking}",
        order.order_number,
        order.status.to_string(),
        order.total.to_string(),
        order.items.iter().map(|item| u64::from(item.quantity)).sum::<u64>(),
        address.first_name,
        address.last_name,
        address.city,
    )
}
