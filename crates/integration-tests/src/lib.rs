//! Integration tests for the SLAYK storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Everything that runs offline
//! cargo test -p slayk-integration-tests
//!
//! # Include the tests that talk to a live backend
//! SLAYK_API_URL=http://127.0.0.1:8000/api cargo test -p slayk-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - Cart and wishlist surviving a reload from disk
//! - `catalog_query` - Query engine over the bundled catalog
//! - `checkout_flow` - Cart to order payload
//! - `api_backend` - REST client against a real backend
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use slayk_core::{Category, Product};
use slayk_storefront::checkout::ShippingForm;

/// The bundled demo catalog: twelve products across eight categories.
pub const CATALOG_JSON: &str = include_str!("../fixtures/catalog.json");

/// Category tiles matching [`CATALOG_JSON`].
pub const CATEGORIES_JSON: &str = include_str!("../fixtures/categories.json");

/// Parse the bundled catalog.
///
/// # Panics
///
/// Panics if the fixture no longer deserializes.
#[must_use]
#[allow(clippy::expect_used)]
pub fn catalog() -> Vec<Product> {
    serde_json::from_str(CATALOG_JSON).expect("fixture catalog parses")
}

/// Parse the bundled categories.
///
/// # Panics
///
/// Panics if the fixture no longer deserializes.
#[must_use]
#[allow(clippy::expect_used)]
pub fn categories() -> Vec<Category> {
    serde_json::from_str(CATEGORIES_JSON).expect("fixture categories parse")
}

/// Look up a fixture product by slug.
///
/// # Panics
///
/// Panics if no fixture product has the slug.
#[must_use]
pub fn product(slug: &str) -> Product {
    catalog()
        .into_iter()
        .find(|p| p.slug == slug)
        .unwrap_or_else(|| panic!("no fixture product '{slug}'"))
}

/// A shipping form that passes validation.
#[must_use]
pub fn shipping_form() -> ShippingForm {
    ShippingForm {
        first_name: "Priya".to_string(),
        last_name: "Sharma".to_string(),
        email: "priya.sharma@example.in".to_string(),
        address: "42 Linking Road, Bandra West".to_string(),
        city: "Mumbai".to_string(),
        state: "Maharashtra".to_string(),
        pincode: "400050".to_string(),
        phone: "+91-98200-12345".to_string(),
    }
}
