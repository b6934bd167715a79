//! Listing helpers: filter facets and curated product rails.

use std::collections::HashSet;

use slayk_core::{Price, Product};

/// Inclusive price bounds in whole rupees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceRange {
    pub min: i64,
    pub max: i64,
}

impl PriceRange {
    /// Bounds as prices, for [`super::FilterSortSpec::with_price_range`].
    #[must_use]
    pub fn bounds(self) -> (Price, Price) {
        (Price::rupees(self.min), Price::rupees(self.max))
    }

    /// Chip label, e.g. `₹1,000 - ₹2,500`.
    #[must_use]
    pub fn label(self) -> String {
        let (min, max) = self.bounds();
        format!("{min} - {max}")
    }
}

/// Quick price ranges offered next to the min/max inputs.
pub const PRICE_PRESETS: [PriceRange; 4] = [
    PriceRange { min: 0, max: 1000 },
    PriceRange { min: 1000, max: 2500 },
    PriceRange { min: 2500, max: 5000 },
    PriceRange { min: 5000, max: 10_000 },
];

/// Distinct colors across `products` in first-seen order, at most `limit`.
#[must_use]
pub fn available_colors(products: &[Product], limit: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    products
        .iter()
        .flat_map(|p| p.colors.iter())
        .filter(|color| seen.insert(color.as_str()))
        .take(limit)
        .cloned()
        .collect()
}

/// Products flagged as best sellers, catalog order.
#[must_use]
pub fn best_sellers(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_best_seller).collect()
}

/// Products flagged as new, catalog order.
#[must_use]
pub fn new_arrivals(products: &[Product]) -> Vec<&Product> {
    products.iter().filter(|p| p.is_new).collect()
}

/// Up to `limit` other products from the same category.
#[must_use]
pub fn related_products<'a>(
    products: &'a [Product],
    product: &Product,
    limit: usize,
) -> Vec<&'a Product> {
    products
        .iter()
        .filter(|p| p.category == product.category && p.id != product.id)
        .take(limit)
        .collect()
}

#[must_use]
pub fn find_by_slug<'a>(products: &'a [Product], slug: &str) -> Option<&'a Product> {
    products.iter().find(|p| p.slug == slug)
}
