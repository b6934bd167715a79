//! Catalog browsing commands.

use std::io::Write;

use slayk_storefront::Result;
use slayk_storefront::catalog::{FilterSortSpec, available_colors, query_products, related_products};

use super::{Catalog, product_row};

/// Colors offered as filter chips.
const COLOR_CHIP_LIMIT: usize = 10;

/// Run the query engine and print the matching products.
pub async fn list(
    catalog: &Catalog,
    spec: &FilterSortSpec,
    limit: Option<usize>,
    out: &mut impl Write,
) -> Result<()> {
    let products = catalog.products().await?;
    let results = query_products(&products, spec);

    writeln!(out, "{} products (sorted by {})", results.len(), spec.sort.label())?;
    for product in results.iter().take(limit.unwrap_or(usize::MAX)) {
        writeln!(out, "{}", product_row(product))?;
    }

    let colors = available_colors(&products, COLOR_CHIP_LIMIT);
    if !colors.is_empty() {
        writeln!(out, "\nColors: {}", colors.join(", "))?;
    }
    Ok(())
}

/// Print one product with its variants and related products.
pub async fn show(catalog: &Catalog, slug: &str, out: &mut impl Write) -> Result<()> {
    let product = catalog.product(slug).await?;

    writeln!(out, "{} ({})", product.name, product.slug)?;
    writeln!(
        out,
        "{}  was {}  save {} ({}% off)",
        product.price,
        product.original_price,
        product.savings(),
        product.discount
    )?;
    writeln!(out, "Rating {:.1} from {} reviews", product.rating, product.reviews)?;
    if !product.sizes.is_empty() {
        writeln!(out, "Sizes: {}", product.sizes.join(", "))?;
    }
    if !product.colors.is_empty() {
        writeln!(out, "Colors: {}", product.colors.join(", "))?;
    }
    if product.in_stock {
        writeln!(out, "In stock ({} left)", product.stock_quantity)?;
    } else {
        writeln!(out, "Out of stock")?;
    }
    if !product.description.is_empty() {
        writeln!(out, "\n{}", product.description)?;
    }
    for feature in &product.features {
        writeln!(out, "  - {feature}")?;
    }

    let products = catalog.products().await?;
    let related = related_products(&products, &product, 4);
    if !related.is_empty() {
        writeln!(out, "\nYou may also like:")?;
        for product in related {
            writeln!(out, "{}", product_row(product))?;
        }
    }
    Ok(())
}

/// Print the category tiles.
pub async fn categories(catalog: &Catalog, out: &mut impl Write) -> Result<()> {
    for category in catalog.categories().await? {
        writeln!(out, "{:<24} {:>4}  {}", category.slug, category.count, category.name)?;
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use slayk_core::Price;
    use slayk_storefront::catalog::SortKey;

    use super::*;

    fn catalog() -> Catalog {
        let products = serde_json::from_str(
            r#"[
                {"id": 1, "name": "Royal Silk Bedsheet Set", "slug": "royal-silk",
                 "category": "bedsheets", "price": 2499, "originalPrice": 4999,
                 "colors": ["Ivory", "Sage"], "reviews": 10},
                {"id": 2, "name": "Linen Sheer Curtains", "slug": "linen-sheer",
                 "category": "curtains", "price": 1899, "originalPrice": 2499,
                 "colors": ["Sage"], "reviews": 50},
                {"id": 3, "name": "Cotton Percale Sheet", "slug": "cotton-percale",
                 "category": "bedsheets", "price": 1299, "originalPrice": 1999, "reviews": 30}
            ]"#,
        )
        .unwrap();
        Catalog::File(products)
    }

    #[tokio::test]
    async fn test_list_applies_query() {
        let spec = FilterSortSpec::for_category("bedsheets")
            .with_sort(SortKey::PriceLow)
            .with_price_range(Price::rupees(0), Price::rupees(3000));
        let mut out = Vec::new();
        list(&catalog(), &spec, None, &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[0].starts_with("2 products"));
        assert!(lines[1].starts_with("cotton-percale"));
        assert!(lines[2].starts_with("royal-silk"));
        assert!(text.contains("Colors: Ivory, Sage"));
    }

    #[tokio::test]
    async fn test_list_respects_limit() {
        let mut out = Vec::new();
        list(&catalog(), &FilterSortSpec::default(), Some(1), &mut out)
            .await
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("3 products"));
        // Popularity puts the most-reviewed product first.
        assert_eq!(text.lines().nth(1).map(|l| l.starts_with("linen-sheer")), Some(true));
        assert!(!text.contains("royal-silk"));
    }

    #[tokio::test]
    async fn test_show_lists_related() {
        let mut out = Vec::new();
        show(&catalog(), "royal-silk", &mut out).await.unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("save ₹2,500"));
        assert!(text.contains("You may also like:"));
        assert!(text.contains("cotton-percale"));
        assert!(!text.contains("linen-sheer"));
    }
}
