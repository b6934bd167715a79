//! Checkout: totals, shipping details and order placement.
//!
//! The flow is three steps (shipping, payment, review). Nothing here touches
//! the network directly; submitting an order goes through an
//! [`OrderGateway`], which [`ApiClient`](crate::api::ApiClient) implements.
//!
//! # Example
//!
//! ```rust,ignore
//! let policy = ShippingPolicy::default();
//! let summary = CheckoutSummary::for_store(&store, &policy);
//! println!("Total: {}", summary.total);
//!
//! let order = place_order(&mut store, &form, PaymentMethod::Upi, &policy, &client).await?;
//! println!("Placed {}", order.order_number);
//! ```

use std::future::Future;

use serde::{Deserialize, Serialize};
use slayk_core::{
    ContactError, Email, OrderId, OrderStatus, PaymentMethod, Phone, Pincode, Price, ProductId,
};
use thiserror::Error;
use tracing::instrument;

use crate::api::ApiError;
use crate::cart::{CartLine, CartStore};
use crate::storage::KeyValueStorage;

/// Errors that can occur while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("Cart is empty")]
    EmptyCart,

    /// A required shipping field was left blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Email, phone or pincode failed validation.
    #[error("Invalid contact details: {0}")]
    Contact(#[from] ContactError),

    /// The backend rejected or never received the order.
    #[error("Order submission failed: {0}")]
    Submit(#[from] ApiError),
}

// =============================================================================
// Shipping and totals
// =============================================================================

/// Flat-rate shipping with a free-shipping threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShippingPolicy {
    /// Subtotal at or above which shipping is free.
    pub free_threshold: Price,
    /// Fee charged below the threshold.
    pub flat_fee: Price,
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            free_threshold: Price::rupees(999),
            flat_fee: Price::rupees(99),
        }
    }
}

impl ShippingPolicy {
    /// Shipping charged on `subtotal`.
    ///
    /// An empty order ships for free.
    #[must_use]
    pub fn shipping_for(&self, subtotal: Price) -> Price {
        if subtotal.is_zero() || subtotal >= self.free_threshold {
            Price::ZERO
        } else {
            self.flat_fee
        }
    }

    /// How much more the shopper must add to unlock free shipping.
    #[must_use]
    pub fn remaining_for_free(&self, subtotal: Price) -> Option<Price> {
        (subtotal < self.free_threshold).then(|| self.free_threshold - subtotal)
    }
}

/// Order totals shown on the checkout page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    /// Sum of line quantities.
    pub item_count: u64,
}

impl CheckoutSummary {
    /// Compute the totals for the store's current cart.
    #[must_use]
    pub fn for_store<S: KeyValueStorage>(store: &CartStore<S>, policy: &ShippingPolicy) -> Self {
        let subtotal = store.cart_total();
        let shipping = policy.shipping_for(subtotal);
        Self {
            subtotal,
            shipping,
            total: subtotal + shipping,
            item_count: store.cart_count(),
        }
    }
}

/// Checkout wizard step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckoutStep {
    #[default]
    Shipping,
    Payment,
    Review,
}

impl CheckoutStep {
    /// The following step, or `None` from review.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Shipping => Some(Self::Payment),
            Self::Payment => Some(Self::Review),
            Self::Review => None,
        }
    }

    /// The preceding step, or `None` from shipping.
    #[must_use]
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::Shipping => None,
            Self::Payment => Some(Self::Shipping),
            Self::Review => Some(Self::Payment),
        }
    }

    /// 1-based position for "Step 2 of 3" style display.
    #[must_use]
    pub const fn number(self) -> u8 {
        match self {
            Self::Shipping => 1,
            Self::Payment => 2,
            Self::Review => 3,
        }
    }

    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Shipping => "Shipping",
            Self::Payment => "Payment",
            Self::Review => "Review",
        }
    }
}

// =============================================================================
// Shipping address
// =============================================================================

/// Shipping details as entered, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ShippingForm {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: String,
    pub phone: String,
}

/// Validated shipping details, in the shape the order endpoint expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub email: Email,
    pub address: String,
    pub city: String,
    pub state: String,
    pub pincode: Pincode,
    pub phone: Phone,
}

impl ShippingForm {
    /// Validate every field.
    ///
    /// Text fields are trimmed and must not be blank. Email, pincode and
    /// phone are parsed into their typed forms.
    ///
    /// # Errors
    ///
    /// Returns the first blank field in form order, or the contact error.
    pub fn validate(&self) -> Result<ShippingAddress, CheckoutError> {
        Ok(ShippingAddress {
            first_name: required("first_name", &self.first_name)?,
            last_name: required("last_name", &self.last_name)?,
            email: Email::parse(&required("email", &self.email)?)?,
            address: required("address", &self.address)?,
            city: required("city", &self.city)?,
            state: required("state", &self.state)?,
            pincode: Pincode::parse(&required("pincode", &self.pincode)?)?,
            phone: Phone::parse(&required("phone", &self.phone)?)?,
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<String, CheckoutError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(value.to_owned())
}

// =============================================================================
// Orders
// =============================================================================

/// One ordered line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: String,
    pub product_image: String,
    pub quantity: u32,
    /// Unit price.
    #[serde(with = "slayk_core::price::as_number")]
    pub price: Price,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub selected_color: Option<String>,
}

impl From<&CartLine> for OrderItem {
    fn from(line: &CartLine) -> Self {
        Self {
            product_id: line.product.id.clone(),
            product_name: line.product.name.clone(),
            product_image: line.product.image.clone(),
            quantity: line.quantity,
            price: line.product.price,
            selected_size: line.selected_size.clone(),
            selected_color: line.selected_color.clone(),
        }
    }
}

/// Body of `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderDraft {
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    #[serde(with = "slayk_core::price::as_number")]
    pub subtotal: Price,
    #[serde(with = "slayk_core::price::as_number")]
    pub shipping: Price,
    #[serde(with = "slayk_core::price::as_number")]
    pub total: Price,
}

/// An order as stored by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Customer-facing reference, e.g. `SLAYK-1A2B3C4D`.
    pub order_number: String,
    pub items: Vec<OrderItem>,
    pub shipping_address: ShippingAddress,
    pub payment_method: PaymentMethod,
    pub subtotal: Price,
    pub shipping: Price,
    pub total: Price,
    #[serde(default)]
    pub status: OrderStatus,
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Somewhere orders can be submitted.
pub trait OrderGateway {
    /// Submit `draft`, returning the stored order.
    fn submit_order(&self, draft: &OrderDraft) -> impl Future<Output = Result<Order, ApiError>> + Send;
}

/// Build the order payload for the current cart without changing it.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there is nothing to order, or a
/// validation error from the shipping form.
pub fn prepare_order<S: KeyValueStorage>(
    store: &CartStore<S>,
    form: &ShippingForm,
    payment_method: PaymentMethod,
    policy: &ShippingPolicy,
) -> Result<OrderDraft, CheckoutError> {
    if store.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }
    let shipping_address = form.validate()?;
    let summary = CheckoutSummary::for_store(store, policy);

    Ok(OrderDraft {
        items: store.lines().iter().map(OrderItem::from).collect(),
        shipping_address,
        payment_method,
        subtotal: summary.subtotal,
        shipping: summary.shipping,
        total: summary.total,
    })
}

/// Validate, submit, and on success empty the cart.
///
/// The cart is left untouched when validation or submission fails, so the
/// shopper can correct the form and retry.
///
/// # Errors
///
/// Returns any [`prepare_order`] error, or [`CheckoutError::Submit`] if the
/// gateway fails.
#[instrument(skip_all, fields(payment = %payment_method))]
pub async fn place_order<S, G>(
    store: &mut CartStore<S>,
    form: &ShippingForm,
    payment_method: PaymentMethod,
    policy: &ShippingPolicy,
    gateway: &G,
) -> Result<Order, CheckoutError>
where
    S: KeyValueStorage,
    G: OrderGateway,
{
    let draft = prepare_order(store, form, payment_method, policy)?;
    let order = gateway.submit_order(&draft).await?;

    tracing::info!(
        order_number = %order.order_number,
        total = %order.total,
        items = order.items.len(),
        "Order placed"
    );
    store.clear_cart();
    Ok(order)
}
