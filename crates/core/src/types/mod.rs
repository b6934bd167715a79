//! Core types for SLAYK.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod contact;
pub mod id;
pub mod price;
pub mod product;
pub mod status;

pub use contact::{ContactError, Email, Phone, Pincode};
pub use id::*;
pub use price::Price;
pub use product::{Category, Product};
pub use status::*;
