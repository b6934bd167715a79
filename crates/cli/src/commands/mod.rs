//! Command implementations.
//!
//! Each command writes its human-readable output to the given writer; logs
//! go to stderr through `tracing`.

pub mod admin;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod wishlist;

use std::collections::BTreeMap;
use std::path::Path;

use slayk_core::{Category, CategoryId, Product};
use slayk_storefront::api::{ApiClient, ApiError};
use slayk_storefront::cart::CartStore;
use slayk_storefront::catalog::find_by_slug;
use slayk_storefront::config::StorefrontConfig;
use slayk_storefront::storage::FileStorage;
use slayk_storefront::{Result, StorefrontError};

/// Where products come from.
#[derive(Debug)]
pub enum Catalog {
    /// A JSON array of products loaded up front.
    File(Vec<Product>),
    /// The REST backend.
    Api(ApiClient),
}

impl Catalog {
    /// Load a product array from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not a product array.
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let products: Vec<Product> = serde_json::from_str(&raw)
            .map_err(|e| StorefrontError::Catalog(format!("{}: {e}", path.display())))?;
        tracing::debug!(path = %path.display(), count = products.len(), "Loaded catalog file");
        Ok(Self::File(products))
    }

    /// Every product. Filtering happens locally in the query engine.
    pub async fn products(&self) -> Result<Vec<Product>> {
        match self {
            Self::File(products) => Ok(products.clone()),
            Self::Api(client) => Ok(client.products(None, None).await?),
        }
    }

    /// Look up a product by slug.
    ///
    /// # Errors
    ///
    /// Returns [`StorefrontError::NotFound`] if no product has the slug.
    pub async fn product(&self, slug: &str) -> Result<Product> {
        let not_found = || StorefrontError::NotFound(format!("product '{slug}'"));
        match self {
            Self::File(products) => find_by_slug(products, slug).cloned().ok_or_else(not_found),
            Self::Api(client) => match client.product_by_slug(slug).await {
                Ok(product) => Ok(product),
                Err(ApiError::NotFound(_)) => Err(not_found()),
                Err(e) => Err(e.into()),
            },
        }
    }

    /// Category tiles. For a catalog file these are derived from the
    /// products, in slug order.
    pub async fn categories(&self) -> Result<Vec<Category>> {
        match self {
            Self::Api(client) => Ok(client.categories().await?),
            Self::File(products) => {
                let mut counts: BTreeMap<&str, u32> = BTreeMap::new();
                for product in products {
                    *counts.entry(product.category.as_str()).or_default() += 1;
                }
                Ok(counts
                    .into_iter()
                    .map(|(slug, count)| Category {
                        id: CategoryId::new(slug),
                        name: slug.to_owned(),
                        slug: slug.to_owned(),
                        image: String::new(),
                        count,
                    })
                    .collect())
            }
        }
    }
}

/// Open the cart store persisted under the configured data directory.
///
/// # Errors
///
/// Returns an error if the data directory cannot be created.
pub fn open_store(config: &StorefrontConfig) -> Result<CartStore<FileStorage>> {
    let storage = FileStorage::open(&config.data_dir)?;
    Ok(CartStore::load(storage))
}

/// One product as a listing row.
pub(crate) fn product_row(product: &Product) -> String {
    let mut badges = Vec::new();
    if product.is_best_seller {
        badges.push("bestseller");
    }
    if product.is_new {
        badges.push("new");
    }
    if !product.in_stock {
        badges.push("out of stock");
    }
    let badges = if badges.is_empty() {
        String::new()
    } else {
        format!(" [{}]", badges.join(", "))
    };

    format!(
        "{:<36} {:>10}  {:.1}*  {}{badges}",
        product.slug,
        product.price.to_string(),
        product.rating,
        product.name
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io::Write;

    use super::*;

    const CATALOG: &str = r#"[
        {"id": 1, "name": "Royal Silk Bedsheet Set", "slug": "royal-silk-bedsheet-set",
         "category": "bedsheets", "price": 2499, "originalPrice": 4999, "image": "a.jpg",
         "colors": ["Ivory"], "sizes": ["King"], "isBestSeller": true},
        {"id": 2, "name": "Linen Sheer Curtains", "slug": "linen-sheer-curtains",
         "category": "curtains", "price": 1899, "originalPrice": 2499, "image": "b.jpg"},
        {"id": 3, "name": "Cotton Percale Sheet", "slug": "cotton-percale-sheet",
         "category": "bedsheets", "price": 1299, "originalPrice": 1999, "image": "c.jpg"}
    ]"#;

    fn file_catalog() -> Catalog {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();
        Catalog::from_file(file.path()).unwrap()
    }

    #[tokio::test]
    async fn test_file_catalog_lookup() {
        let catalog = file_catalog();
        assert_eq!(catalog.products().await.unwrap().len(), 3);
        assert_eq!(
            catalog.product("linen-sheer-curtains").await.unwrap().id.as_str(),
            "2"
        );
        assert!(matches!(
            catalog.product("missing").await,
            Err(StorefrontError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_file_catalog_derives_categories() {
        let categories = file_catalog().categories().await.unwrap();
        let summary: Vec<(&str, u32)> = categories
            .iter()
            .map(|c| (c.slug.as_str(), c.count))
            .collect();
        assert_eq!(summary, [("bedsheets", 2), ("curtains", 1)]);
    }

    #[test]
    fn test_bad_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"{\"not\": \"an array\"}").unwrap();
        assert!(matches!(
            Catalog::from_file(file.path()),
            Err(StorefrontError::Catalog(_))
        ));
        assert!(matches!(
            Catalog::from_file(Path::new("/nonexistent/catalog.json")),
            Err(StorefrontError::Io(_))
        ));
    }

    #[test]
    fn test_product_row_badges() {
        let Catalog::File(products) = file_catalog() else {
            unreachable!()
        };
        let row = product_row(&products[0]);
        assert!(row.starts_with("royal-silk-bedsheet-set"));
        assert!(row.contains("₹2,499"));
        assert!(row.ends_with("Royal Silk Bedsheet Set [bestseller]"));
    }
}
