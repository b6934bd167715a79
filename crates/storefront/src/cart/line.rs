//! Cart line and wishlist entry records.

use serde::{Deserialize, Serialize};
use slayk_core::{LineId, Price, Product, ProductId};

/// One line in the cart: a product snapshot plus the chosen variant.
///
/// The product fields are flattened into the line when serialized, so a
/// persisted line reads as the product object with `quantity`,
/// `selected_size`, `selected_color` and `line_id` added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
    #[serde(default)]
    pub selected_size: Option<String>,
    #[serde(default)]
    pub selected_color: Option<String>,
    pub line_id: LineId,
}

impl CartLine {
    pub(crate) fn new(
        product: &Product,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> Self {
        Self {
            product: product.clone(),
            quantity,
            selected_size: size.map(str::to_owned),
            selected_color: color.map(str::to_owned),
            line_id: LineId::generate(),
        }
    }

    /// Whether this line holds exactly the given product variant.
    #[must_use]
    pub fn is_variant(&self, product_id: &ProductId, size: Option<&str>, color: Option<&str>) -> bool {
        self.product.id == *product_id
            && self.selected_size.as_deref() == size
            && self.selected_color.as_deref() == color
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price * self.quantity
    }

    /// Variant label for display, e.g. `King / Sage Green`.
    #[must_use]
    pub fn variant_label(&self) -> Option<String> {
        match (self.selected_size.as_deref(), self.selected_color.as_deref()) {
            (Some(size), Some(color)) => Some(format!("{size} / {color}")),
            (Some(only), None) | (None, Some(only)) => Some(only.to_owned()),
            (None, None) => None,
        }
    }
}

/// A saved product.
///
/// Holds the product as it was when saved; later catalog changes do not
/// propagate into the entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WishlistEntry {
    pub product: Product,
}

impl WishlistEntry {
    /// ID of the saved product.
    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product.id
    }
}
