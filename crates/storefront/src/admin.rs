//! Back-office records: dashboard numbers, stock buckets, order updates and
//! the admin session.
//!
//! The HTTP side lives in [`crate::api`]; everything here is plain data plus
//! the pure inventory bucketing, so a local catalog file can be audited
//! without a backend.

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use slayk_core::{OrderStatus, Price, Product, ProductId};

use crate::checkout::Order;
use crate::storage::{KeyValueStorage, StorageError};

/// Products with fewer units than this (but more than zero) count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Storage key for the bearer token saved by `admin login`.
pub const ADMIN_TOKEN_STORAGE_KEY: &str = "slayk_admin_token";

// =============================================================================
// Dashboard
// =============================================================================

/// Headline numbers for the admin dashboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub total_products: u64,
    pub total_orders: u64,
    /// Sum over processing, shipped and delivered orders.
    pub total_revenue: Price,
    pub pending_orders: u64,
    pub low_stock_products: u64,
    /// Latest orders, newest first.
    #[serde(default)]
    pub recent_orders: Vec<Order>,
}

// =============================================================================
// Inventory
// =============================================================================

/// Stock bucket of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockLevel {
    OutOfStock,
    Low,
    InStock,
}

impl StockLevel {
    #[must_use]
    pub const fn for_quantity(quantity: u32) -> Self {
        match quantity {
            0 => Self::OutOfStock,
            q if q < LOW_STOCK_THRESHOLD => Self::Low,
            _ => Self::InStock,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::OutOfStock => "Out of stock",
            Self::Low => "Low stock",
            Self::InStock => "In stock",
        }
    }
}

/// The slice of a product the inventory view needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: ProductId,
    pub name: String,
    pub slug: String,
    pub category: String,
    #[serde(default)]
    pub stock_quantity: u32,
    #[serde(default)]
    pub in_stock: bool,
    #[serde(default)]
    pub image: String,
    pub price: Price,
}

impl InventoryItem {
    #[must_use]
    pub const fn level(&self) -> StockLevel {
        StockLevel::for_quantity(self.stock_quantity)
    }
}

impl From<&Product> for InventoryItem {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.name.clone(),
            slug: product.slug.clone(),
            category: product.category.clone(),
            stock_quantity: product.stock_quantity,
            in_stock: product.in_stock,
            image: product.image.clone(),
            price: product.price,
        }
    }
}

/// Bucket sizes of an [`InventoryReport`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventorySummary {
    pub total: usize,
    pub out_of_stock_count: usize,
    pub low_stock_count: usize,
    pub in_stock_count: usize,
}

/// Products split by [`StockLevel`], each bucket in ascending stock order.
///
/// Buckets go by `stock_quantity` alone; the `in_stock` flag is reported but
/// not trusted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InventoryReport {
    pub out_of_stock: Vec<InventoryItem>,
    pub low_stock: Vec<InventoryItem>,
    pub in_stock: Vec<InventoryItem>,
    pub summary: InventorySummary,
}

impl InventoryReport {
    /// Bucket `items`. Ties in stock keep their input order.
    #[must_use]
    pub fn from_items(items: impl IntoIterator<Item = InventoryItem>) -> Self {
        let mut items: Vec<InventoryItem> = items.into_iter().collect();
        items.sort_by_key(|item| item.stock_quantity);

        let mut report = Self::default();
        report.summary.total = items.len();
        for item in items {
            match item.level() {
                StockLevel::OutOfStock => report.out_of_stock.push(item),
                StockLevel::Low => report.low_stock.push(item),
                StockLevel::InStock => report.in_stock.push(item),
            }
        }
        report.summary.out_of_stock_count = report.out_of_stock.len();
        report.summary.low_stock_count = report.low_stock.len();
        report.summary.in_stock_count = report.in_stock.len();
        report
    }

    #[must_use]
    pub fn from_products(products: &[Product]) -> Self {
        Self::from_items(products.iter().map(InventoryItem::from))
    }

    /// Items in a bucket.
    #[must_use]
    pub fn bucket(&self, level: StockLevel) -> &[InventoryItem] {
        match level {
            StockLevel::OutOfStock => &self.out_of_stock,
            StockLevel::Low => &self.low_stock,
            StockLevel::InStock => &self.in_stock,
        }
    }

    /// Out-of-stock items, then low-stock ones.
    pub fn needs_attention(&self) -> impl Iterator<Item = &InventoryItem> {
        self.out_of_stock.iter().chain(&self.low_stock)
    }
}

/// Backend answer to a stock change.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StockUpdate {
    #[serde(default)]
    pub message: String,
    pub stock_quantity: u32,
    pub in_stock: bool,
}

// =============================================================================
// Orders
// =============================================================================

/// Partial order update; unset fields are left alone by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
}

impl OrderUpdate {
    /// Returns true if the update would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.status.is_none() && self.tracking_number.is_none()
    }
}

/// Filters for the order list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrderQuery {
    pub status: Option<OrderStatus>,
    /// Backend default is 100, maximum 500.
    pub limit: Option<u32>,
}

// =============================================================================
// Session
// =============================================================================

/// Account behind an admin session.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: String,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub access_token: SecretString,
    pub user: AdminUser,
}

#[derive(Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    user: AdminUser,
}

impl From<TokenResponse> for AdminSession {
    fn from(response: TokenResponse) -> Self {
        Self {
            access_token: SecretString::from(response.access_token),
            user: response.user,
        }
    }
}

/// Read the saved admin token, if any.
///
/// # Errors
///
/// Returns an error if the storage cannot be read.
pub fn load_token<S: KeyValueStorage>(storage: &S) -> Result<Option<SecretString>, StorageError> {
    Ok(storage
        .get(ADMIN_TOKEN_STORAGE_KEY)?
        .map(|raw| raw.trim().to_owned())
        .filter(|token| !token.is_empty())
        .map(SecretString::from))
}

/// Save the admin token for later commands.
///
/// # Errors
///
/// Returns an error if the storage cannot be written.
pub fn save_token<S: KeyValueStorage>(
    storage: &mut S,
    token: &SecretString,
) -> Result<(), StorageError> {
    storage.set(ADMIN_TOKEN_STORAGE_KEY, token.expose_secret())
}

/// Forget the saved admin token.
///
/// # Errors
///
/// Returns an error if the storage cannot be written.
pub fn clear_token<S: KeyValueStorage>(storage: &mut S) -> Result<(), StorageError> {
    storage.remove(ADMIN_TOKEN_STORAGE_KEY)
}
