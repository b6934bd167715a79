//! Product builders for unit tests.

use slayk_core::{Price, Product, ProductId};

/// A minimal in-stock product.
pub fn product(id: &str, category: &str, price: i64) -> Product {
    Product {
        id: ProductId::new(id),
        slug: format!("{category}-{id}"),
        name: format!("Product {id}"),
        category: category.to_owned(),
        price: Price::rupees(price),
        original_price: Price::rupees(price),
        discount: 0,
        rating: 4.5,
        reviews: 0,
        image: String::new(),
        images: Vec::new(),
        description: String::new(),
        features: Vec::new(),
        colors: Vec::new(),
        sizes: Vec::new(),
        stock_quantity: 100,
        in_stock: true,
        is_new: false,
        is_best_seller: false,
    }
}
