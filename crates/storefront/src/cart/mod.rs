//! Shopper cart and wishlist state.
//!
//! [`CartStore`] is the single source of truth for what the shopper intends
//! to buy and what they have saved. It is constructed once per session from
//! durable storage and handed to whatever needs it; there is no global
//! instance.
//!
//! # Persistence
//!
//! Every mutation of the cart lines or the wishlist rewrites the whole
//! sequence as JSON under [`CART_STORAGE_KEY`] or [`WISHLIST_STORAGE_KEY`].
//! Loading is fail-soft: a missing key, unreadable storage, or a payload that
//! no longer parses hydrates as an empty sequence. Write failures are logged
//! and the in-memory state stays authoritative. The drawer flag is never
//! persisted.

mod line;

use serde::Serialize;
use serde::de::DeserializeOwned;
use slayk_core::{LineId, Price, Product, ProductId};
use tracing::instrument;

pub use line::{CartLine, WishlistEntry};

use crate::storage::KeyValueStorage;

/// Storage key for the cart lines.
pub const CART_STORAGE_KEY: &str = "slayk_cart";

/// Storage key for the wishlist entries.
pub const WISHLIST_STORAGE_KEY: &str = "slayk_wishlist";

/// Cart and wishlist state backed by durable storage.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
    lines: Vec<CartLine>,
    wishlist: Vec<WishlistEntry>,
    drawer_open: bool,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Hydrate a store from `storage`.
    ///
    /// Never fails; see the module docs for how bad persisted state is handled.
    #[instrument(skip_all)]
    pub fn load(storage: S) -> Self {
        let lines = normalize_lines(hydrate(&storage, CART_STORAGE_KEY));
        let wishlist = dedupe_wishlist(hydrate(&storage, WISHLIST_STORAGE_KEY));

        tracing::debug!(
            lines = lines.len(),
            wishlist = wishlist.len(),
            "Cart store hydrated"
        );

        Self {
            storage,
            lines,
            wishlist,
            drawer_open: false,
        }
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// Cart lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a single line.
    #[must_use]
    pub fn line(&self, line_id: LineId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.line_id == line_id)
    }

    /// Wishlist entries in insertion order.
    #[must_use]
    pub fn wishlist(&self) -> &[WishlistEntry] {
        &self.wishlist
    }

    /// Sum of `price × quantity` over all lines.
    #[must_use]
    pub fn cart_total(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn cart_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of saved products.
    #[must_use]
    pub fn wishlist_count(&self) -> usize {
        self.wishlist.len()
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn is_in_wishlist(&self, product_id: &ProductId) -> bool {
        self.wishlist
            .iter()
            .any(|entry| entry.product_id() == product_id)
    }

    #[must_use]
    pub const fn is_drawer_open(&self) -> bool {
        self.drawer_open
    }

    /// The backing storage.
    #[must_use]
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store and return its storage.
    #[must_use]
    pub fn into_storage(self) -> S {
        self.storage
    }

    // =========================================================================
    // Mutators
    // =========================================================================

    /// Add `quantity` units of a product variant.
    ///
    /// If a line for the same `(product, size, color)` exists its quantity is
    /// incremented; otherwise a new line with a fresh [`LineId`] is appended.
    /// Opens the cart drawer. Stock limits are not checked here.
    ///
    /// Returns the ID of the line that now holds the variant.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn add_to_cart(
        &mut self,
        product: &Product,
        quantity: u32,
        size: Option<&str>,
        color: Option<&str>,
    ) -> LineId {
        let line_id = if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.is_variant(&product.id, size, color))
        {
            line.quantity = line.quantity.saturating_add(quantity);
            tracing::debug!(line_id = %line.line_id, quantity = line.quantity, "Merged into existing line");
            line.line_id
        } else {
            let line = CartLine::new(product, quantity, size, color);
            let line_id = line.line_id;
            self.lines.push(line);
            tracing::debug!(%line_id, "Added new cart line");
            line_id
        };

        self.drawer_open = true;
        self.persist_lines();
        line_id
    }

    /// Add one unit with the product's first size and first color.
    pub fn add_default_variant(&mut self, product: &Product) -> LineId {
        let size = product.default_size().map(str::to_owned);
        let color = product.default_color().map(str::to_owned);
        self.add_to_cart(product, 1, size.as_deref(), color.as_deref())
    }

    /// Remove a line. Unknown IDs are ignored.
    #[instrument(skip(self))]
    pub fn remove_from_cart(&mut self, line_id: LineId) {
        self.lines.retain(|line| line.line_id != line_id);
        self.persist_lines();
    }

    /// Replace a line's quantity.
    ///
    /// Quantities below one are ignored rather than treated as removal;
    /// removing a line is always an explicit [`remove_from_cart`](Self::remove_from_cart).
    #[instrument(skip(self))]
    pub fn update_quantity(&mut self, line_id: LineId, quantity: i64) {
        if quantity < 1 {
            tracing::debug!("Ignoring non-positive quantity");
            return;
        }
        let Ok(quantity) = u32::try_from(quantity) else {
            tracing::warn!("Ignoring out-of-range quantity");
            return;
        };

        if let Some(line) = self.lines.iter_mut().find(|line| line.line_id == line_id) {
            line.quantity = quantity;
        }
        self.persist_lines();
    }

    /// Empty the cart. The wishlist is untouched.
    #[instrument(skip(self))]
    pub fn clear_cart(&mut self) {
        self.lines.clear();
        self.persist_lines();
    }

    /// Save the product if absent, otherwise remove it.
    ///
    /// Returns true if the product is in the wishlist afterwards. Re-adding a
    /// product puts it at the end.
    #[instrument(skip(self, product), fields(product_id = %product.id))]
    pub fn toggle_wishlist(&mut self, product: &Product) -> bool {
        let before = self.wishlist.len();
        self.wishlist
            .retain(|entry| entry.product_id() != &product.id);
        let saved = if self.wishlist.len() == before {
            self.wishlist.push(WishlistEntry {
                product: product.clone(),
            });
            true
        } else {
            false
        };

        self.persist_wishlist();
        saved
    }

    pub fn set_drawer_open(&mut self, open: bool) {
        self.drawer_open = open;
    }

    // =========================================================================
    // Persistence
    // =========================================================================

    fn persist_lines(&mut self) {
        persist(&mut self.storage, CART_STORAGE_KEY, &self.lines);
    }

    fn persist_wishlist(&mut self) {
        persist(&mut self.storage, WISHLIST_STORAGE_KEY, &self.wishlist);
    }
}

/// Read and decode a persisted sequence, falling back to empty.
fn hydrate<S: KeyValueStorage, T: DeserializeOwned>(storage: &S, key: &str) -> Vec<T> {
    let raw = match storage.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to read persisted state, starting empty");
            return Vec::new();
        }
    };

    serde_json::from_str(&raw).unwrap_or_else(|e| {
        tracing::warn!(key, error = %e, "Discarding malformed persisted state");
        Vec::new()
    })
}

/// Drop zero-quantity lines and fold repeated variants into their first line.
fn normalize_lines(persisted: Vec<CartLine>) -> Vec<CartLine> {
    let total = persisted.len();
    let mut lines: Vec<CartLine> = Vec::with_capacity(total);

    for line in persisted {
        if line.quantity == 0 {
            continue;
        }
        let existing = lines.iter_mut().find(|kept| {
            kept.is_variant(
                &line.product.id,
                line.selected_size.as_deref(),
                line.selected_color.as_deref(),
            )
        });
        match existing {
            Some(kept) => kept.quantity = kept.quantity.saturating_add(line.quantity),
            None => lines.push(line),
        }
    }

    if lines.len() != total {
        tracing::warn!(
            dropped = total - lines.len(),
            "Merged or dropped invalid persisted cart lines"
        );
    }
    lines
}

/// Keep the first entry per product.
fn dedupe_wishlist(persisted: Vec<WishlistEntry>) -> Vec<WishlistEntry> {
    let total = persisted.len();
    let mut wishlist: Vec<WishlistEntry> = Vec::with_capacity(total);

    for entry in persisted {
        if !wishlist.iter().any(|kept| kept.product_id() == entry.product_id()) {
            wishlist.push(entry);
        }
    }

    if wishlist.len() != total {
        tracing::warn!(
            dropped = total - wishlist.len(),
            "Dropped duplicate persisted wishlist entries"
        );
    }
    wishlist
}

/// Encode and write a sequence, logging instead of failing.
fn persist<S: KeyValueStorage, T: Serialize>(storage: &mut S, key: &str, items: &[T]) {
    let payload = match serde_json::to_string(items) {
        Ok(payload) => payload,
        Err(e) => {
            tracing::warn!(key, error = %e, "Failed to encode state for persistence");
            return;
        }
    };

    if let Err(e) = storage.set(key, &payload) {
        tracing::warn!(key, error = %e, "Failed to persist state");
    }
}
