//! Cache types for backend responses.

use std::sync::Arc;

use slayk_core::{Category, Product};

/// Cache key for read endpoints.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Products {
        category: Option<String>,
        search: Option<String>,
    },
    Product(String),
    Categories,
}

impl CacheKey {
    /// Key for a product listing. Blank filters collapse to `None` so they
    /// share an entry with the unfiltered listing.
    pub fn products(category: Option<&str>, search: Option<&str>) -> Self {
        let normalize = |value: Option<&str>| {
            value
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_owned)
        };
        Self::Products {
            category: normalize(category),
            search: normalize(search),
        }
    }
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Arc<Vec<Product>>),
    Product(Box<Product>),
    Categories(Arc<Vec<Category>>),
}
