//! Catalog filtering and sorting.
//!
//! [`query_products`] turns a product list and a [`FilterSortSpec`] into the
//! exact sequence a listing page shows. It is pure: the input is never
//! reordered or modified, and identical inputs always produce identical
//! output.
//!
//! Steps, in order:
//!
//! 1. Scope - exact category slug, or case-insensitive search over name,
//!    category and description
//! 2. Price - inclusive `[price_min, price_max]`
//! 3. Colors - at least one product color in the selected set (if any)
//! 4. Sort - stable, so ties keep their catalog order

mod facets;

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use slayk_core::{Price, Product};
use thiserror::Error;

pub use facets::{
    PRICE_PRESETS, PriceRange, available_colors, best_sellers, find_by_slug, new_arrivals,
    related_products,
};

/// Upper bound of the default price filter.
pub const DEFAULT_PRICE_MAX: i64 = 10_000;

/// Which products a listing starts from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProductScope {
    /// Every product.
    #[default]
    All,
    /// Products whose category slug equals this exactly.
    Category(String),
    /// Products whose name, category or description contains this term.
    Search(String),
}

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    /// Most reviewed first.
    #[default]
    Popularity,
    /// New arrivals first.
    Newest,
    /// Cheapest first.
    PriceLow,
    /// Most expensive first.
    PriceHigh,
    /// Best rated first.
    Rating,
    /// Keep the filtered order (search results).
    Relevance,
}

impl SortKey {
    pub const ALL: [Self; 6] = [
        Self::Popularity,
        Self::Newest,
        Self::PriceLow,
        Self::PriceHigh,
        Self::Rating,
        Self::Relevance,
    ];

    /// Wire name, e.g. `price-low`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popularity => "popularity",
            Self::Newest => "newest",
            Self::PriceLow => "price-low",
            Self::PriceHigh => "price-high",
            Self::Rating => "rating",
            Self::Relevance => "relevance",
        }
    }

    /// Label for the sort dropdown.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Popularity => "Popularity",
            Self::Newest => "Newest First",
            Self::PriceLow => "Price: Low to High",
            Self::PriceHigh => "Price: High to Low",
            Self::Rating => "Customer Rating",
            Self::Relevance => "Relevance",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sort key: {0}")]
pub struct SortKeyError(String);

impl FromStr for SortKey {
    type Err = SortKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == s)
            .ok_or_else(|| SortKeyError(s.to_owned()))
    }
}

/// Filter and sort options for one listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSortSpec {
    pub scope: ProductScope,
    pub price_min: Price,
    pub price_max: Price,
    pub sort: SortKey,
    /// Selected colors; empty means no color filter.
    pub colors: BTreeSet<String>,
}

impl Default for FilterSortSpec {
    fn default() -> Self {
        Self {
            scope: ProductScope::All,
            price_min: Price::ZERO,
            price_max: Price::rupees(DEFAULT_PRICE_MAX),
            sort: SortKey::default(),
            colors: BTreeSet::new(),
        }
    }
}

impl FilterSortSpec {
    /// Category listing with default filters.
    #[must_use]
    pub fn for_category(slug: impl Into<String>) -> Self {
        Self {
            scope: ProductScope::Category(slug.into()),
            ..Self::default()
        }
    }

    /// Search listing with default filters, ordered by relevance.
    #[must_use]
    pub fn for_search(term: impl Into<String>) -> Self {
        Self {
            scope: ProductScope::Search(term.into()),
            sort: SortKey::Relevance,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_price_range(mut self, min: Price, max: Price) -> Self {
        self.price_min = min;
        self.price_max = max;
        self
    }

    #[must_use]
    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.colors.insert(color.into());
        self
    }

    /// Reset price and color filters, keeping scope and sort.
    pub fn clear_filters(&mut self) {
        self.price_min = Price::ZERO;
        self.price_max = Price::rupees(DEFAULT_PRICE_MAX);
        self.colors.clear();
    }

    fn in_scope(&self, product: &Product, needle: Option<&str>) -> bool {
        match (&self.scope, needle) {
            (ProductScope::All, _) => true,
            (ProductScope::Category(slug), _) => product.category == *slug,
            (ProductScope::Search(_), Some(needle)) => product.matches_search(needle),
            (ProductScope::Search(_), None) => false,
        }
    }

    fn in_price_range(&self, product: &Product) -> bool {
        self.price_min <= product.price && product.price <= self.price_max
    }

    fn has_selected_color(&self, product: &Product) -> bool {
        self.colors.is_empty() || product.colors.iter().any(|c| self.colors.contains(c))
    }
}

/// Filter and sort `products` for display.
///
/// Returns a new vector; `products` is left untouched. An unmatched category
/// or a blank search term yields an empty list.
#[must_use]
pub fn query_products(products: &[Product], spec: &FilterSortSpec) -> Vec<Product> {
    let needle = match &spec.scope {
        ProductScope::Search(term) => {
            let term = term.trim();
            (!term.is_empty()).then(|| term.to_lowercase())
        }
        _ => None,
    };

    let mut matched: Vec<Product> = products
        .iter()
        .filter(|p| spec.in_scope(p, needle.as_deref()))
        .filter(|p| spec.in_price_range(p))
        .filter(|p| spec.has_selected_color(p))
        .cloned()
        .collect();

    sort_products(&mut matched, spec.sort);

    tracing::debug!(
        total = products.len(),
        matched = matched.len(),
        sort = %spec.sort,
        "Catalog query"
    );
    matched
}

/// Stable sort in place by `key`.
fn sort_products(products: &mut [Product], key: SortKey) {
    match key {
        SortKey::Popularity => products.sort_by(|a, b| b.reviews.cmp(&a.reviews)),
        SortKey::Newest => products.sort_by(|a, b| b.is_new.cmp(&a.is_new)),
        SortKey::PriceLow => products.sort_by(|a, b| a.price.cmp(&b.price)),
        SortKey::PriceHigh => products.sort_by(|a, b| b.price.cmp(&a.price)),
        SortKey::Rating => products.sort_by(|a, b| b.rating.total_cmp(&a.rating)),
        SortKey::Relevance => {}
    }
}
