//! SLAYK storefront library.
//!
//! Shopper-side state and logic for the SLAYK home-textiles store:
//!
//! - [`cart`] - cart and wishlist store, persisted through [`storage`]
//! - [`catalog`] - pure filtering and sorting over the product list
//! - [`checkout`] - totals, shipping details and order placement
//! - [`api`] - REST client for the backend
//! - [`admin`] - dashboard, inventory and order-management records
//!
//! The `slayk` CLI is the primary consumer.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod admin;
pub mod api;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod storage;

#[cfg(test)]
pub(crate) mod testing;

pub use error::{Result, StorefrontError};
