//! Catalog records supplied by the REST backend.
//!
//! Field names follow the backend's snake_case JSON. The camelCase spellings
//! used by the bundled mock catalog are accepted as aliases so either source
//! deserializes into the same record.

use serde::{Deserialize, Serialize};

use super::id::{CategoryId, ProductId};
use super::price::Price;

/// A product as listed in the catalog.
///
/// Read-only from the storefront's point of view: the cart and wishlist keep
/// their own snapshots and never write back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub slug: String,
    pub name: String,
    /// Category slug, e.g. `bedsheets`.
    pub category: String,
    pub price: Price,
    #[serde(alias = "originalPrice")]
    pub original_price: Price,
    /// Discount percentage shown on the badge.
    #[serde(default)]
    pub discount: u32,
    #[serde(default = "default_rating")]
    pub rating: f64,
    /// Review count, used as the popularity signal.
    #[serde(default)]
    pub reviews: u32,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default = "default_stock_quantity", alias = "stockQuantity")]
    pub stock_quantity: u32,
    #[serde(default = "default_true", alias = "inStock")]
    pub in_stock: bool,
    #[serde(default, alias = "isNew")]
    pub is_new: bool,
    #[serde(default, alias = "isBestSeller")]
    pub is_best_seller: bool,
}

const fn default_rating() -> f64 {
    4.5
}

const fn default_stock_quantity() -> u32 {
    100
}

const fn default_true() -> bool {
    true
}

impl Product {
    /// First listed size, the one quick "Add to Cart" buttons pick.
    #[must_use]
    pub fn default_size(&self) -> Option<&str> {
        self.sizes.first().map(String::as_str)
    }

    /// First listed color, the one quick "Add to Cart" buttons pick.
    #[must_use]
    pub fn default_color(&self) -> Option<&str> {
        self.colors.first().map(String::as_str)
    }

    /// Amount saved against the original price, never negative.
    #[must_use]
    pub fn savings(&self) -> Price {
        if self.original_price > self.price {
            self.original_price - self.price
        } else {
            Price::ZERO
        }
    }

    /// Case-insensitive substring match on name, category, or description.
    ///
    /// `needle` must already be lowercased.
    #[must_use]
    pub fn matches_search(&self, needle: &str) -> bool {
        [&self.name, &self.category, &self.description]
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

/// A browsable catalog category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub image: String,
    /// Number of products the backend reports in this category.
    #[serde(default)]
    pub count: u32,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    const MOCK_PRODUCT: &str = r#"{
        "id": 1,
        "name": "Botanical Dreams Cotton Bedsheet Set",
        "slug": "botanical-dreams-bedsheet",
        "category": "bedsheets",
        "price": 2499,
        "originalPrice": 4999,
        "discount": 50,
        "rating": 4.8,
        "reviews": 1247,
        "image": "bedsheet.jpg",
        "description": "Premium cotton bedsheet with floral prints.",
        "colors": ["Sage Green", "Dusty Pink"],
        "sizes": ["Single", "Double", "King"],
        "inStock": true,
        "isNew": false,
        "isBestSeller": true
    }"#;

    const BACKEND_PRODUCT: &str = r#"{
        "id": "6f1c2b7e-0c1d-4c57-9a54-1f7f6c2b9e10",
        "name": "Linen Blackout Curtain",
        "slug": "linen-blackout-curtain",
        "category": "curtains",
        "price": 1899.0,
        "original_price": 2999.0,
        "description": "Room darkening linen curtain.",
        "image": "curtain.jpg",
        "stock_quantity": 12,
        "is_new": true,
        "created_at": "2025-01-04T10:00:00+00:00"
    }"#;

    #[test]
    fn test_deserialize_mock_catalog_shape() {
        let product: Product = serde_json::from_str(MOCK_PRODUCT).unwrap();
        assert_eq!(product.id, ProductId::new("1"));
        assert_eq!(product.original_price, Price::rupees(4999));
        assert!(product.is_best_seller);
        assert_eq!(product.stock_quantity, 100);
        assert_eq!(product.default_size(), Some("Single"));
        assert_eq!(product.default_color(), Some("Sage Green"));
    }

    #[test]
    fn test_deserialize_backend_shape_with_defaults() {
        let product: Product = serde_json::from_str(BACKEND_PRODUCT).unwrap();
        assert_eq!(product.price, Price::rupees(1899));
        assert_eq!(product.stock_quantity, 12);
        assert!(product.is_new);
        assert!(product.in_stock);
        assert!((product.rating - 4.5).abs() < f64::EPSILON);
        assert_eq!(product.reviews, 0);
        assert!(product.colors.is_empty());
        assert_eq!(product.default_color(), None);
    }

    #[test]
    fn test_savings() {
        let mut product: Product = serde_json::from_str(MOCK_PRODUCT).unwrap();
        assert_eq!(product.savings(), Price::rupees(2500));
        product.original_price = Price::rupees(1000);
        assert_eq!(product.savings(), Price::ZERO);
    }

    #[test]
    fn test_matches_search() {
        let product: Product = serde_json::from_str(MOCK_PRODUCT).unwrap();
        assert!(product.matches_search("botanical"));
        assert!(product.matches_search("bedsheets"));
        assert!(product.matches_search("floral"));
        assert!(!product.matches_search("curtain"));
    }
}
