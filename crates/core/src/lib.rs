//! SLAYK Core - Shared types library.
//!
//! This crate provides common types used across all SLAYK components:
//! - `storefront` - Cart/wishlist store, catalog queries, checkout, REST client
//! - `cli` - Command-line shopper for browsing and managing the cart
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Products, categories, type-safe IDs, prices, contact fields, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
