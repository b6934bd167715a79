//! Wishlist commands.

use std::io::Write;

use slayk_storefront::Result;
use slayk_storefront::cart::CartStore;
use slayk_storefront::error::add_breadcrumb;
use slayk_storefront::storage::KeyValueStorage;

use super::{Catalog, product_row};

pub fn show<S: KeyValueStorage>(store: &CartStore<S>, out: &mut impl Write) -> Result<()> {
    if store.wishlist().is_empty() {
        writeln!(out, "Your wishlist is empty")?;
        return Ok(());
    }
    writeln!(out, "{} saved", store.wishlist_count())?;
    for entry in store.wishlist() {
        writeln!(out, "{}", product_row(&entry.product))?;
    }
    Ok(())
}

/// Save or unsave a product.
pub async fn toggle<S: KeyValueStorage>(
    catalog: &Catalog,
    store: &mut CartStore<S>,
    slug: &str,
    out: &mut impl Write,
) -> Result<()> {
    let product = catalog.product(slug).await?;
    let saved = store.toggle_wishlist(&product);
    add_breadcrumb(
        "wishlist",
        if saved { "Saved to wishlist" } else { "Removed from wishlist" },
        Some(&[("product_id", product.id.as_str())]),
    );

    if saved {
        writeln!(out, "Saved {}", product.name)?;
    } else {
        writeln!(out, "Removed {} from wishlist", product.name)?;
    }
    Ok(())
}
