//! Wishlist of saved products.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use maison_core::ProductId;

use crate::cart::{CartStore, VariantKey};
use crate::catalog::Catalog;
use crate::error::CartResult;

/// Saved products, unique by id, in the order they were saved.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Wishlist {
    items: Vec<ProductId>,
    last_added: Option<ProductId>,
}

/// Outcome of [`Wishlist::move_all_to_cart`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveReport {
    /// Products now in the cart.
    pub moved: Vec<ProductId>,
    /// Products that stayed on the wishlist because no variant can be bought.
    pub unavailable: Vec<ProductId>,
    /// Products no longer in the catalog; they also stay.
    pub missing: Vec<ProductId>,
}

impl Wishlist {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Save a product. Returns `false` if it was already saved.
    pub fn add(&mut self, product_id: ProductId) -> bool {
        if self.contains(&product_id) {
            return false;
        }
        debug!(product_id = %product_id, "Added to wishlist");
        self.last_added = Some(product_id.clone());
        self.items.push(product_id);
        true
    }

    /// Remove a product. Returns `false` if it was not saved.
    pub fn remove(&mut self, product_id: &ProductId) -> bool {
        let before = self.items.len();
        self.items.retain(|id| id != product_id);
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.last_added = None;
    }

    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains(product_id)
    }

    #[must_use]
    pub fn items(&self) -> &[ProductId] {
        &self.items
    }

    /// Most recently saved product, kept even if it has since been removed.
    #[must_use]
    pub const fn last_added(&self) -> Option<&ProductId> {
        self.last_added.as_ref()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Take a line out of the cart and save its product instead.
    ///
    /// # Errors
    ///
    /// Returns [`crate::CartError::ItemNotFound`] (benign) if the cart has no
    /// such line; neither the cart nor the wishlist changes.
    pub fn move_from_cart(
        &mut self,
        cart: &mut CartStore,
        product_id: &ProductId,
        variant: &VariantKey,
    ) -> CartResult {
        cart.remove_item(product_id, variant)?;
        self.add(product_id.clone());
        info!(product_id = %product_id, variant = %variant, "Moved cart line to wishlist");
        Ok(())
    }

    /// Add one unit of every saved product to the cart, in its first
    /// available size and color.
    ///
    /// Moved products leave the wishlist; the rest stay and are reported.
    pub fn move_all_to_cart(&mut self, cart: &mut CartStore, catalog: &Catalog) -> MoveReport {
        let mut report = MoveReport::default();

        for product_id in std::mem::take(&mut self.items) {
            let Some(product) = catalog.find(&product_id) else {
                report.missing.push(product_id.clone());
                self.items.push(product_id);
                continue;
            };
            let added = product
                .first_available_variant()
                .is_some_and(|variant| cart.add_product(product, variant, 1).is_ok());
            if added {
                report.moved.push(product_id);
            } else {
                report.unavailable.push(product_id.clone());
                self.items.push(product_id);
            }
        }

        info!(
            moved = report.moved.len(),
            unavailable = report.unavailable.len(),
            missing = report.missing.len(),
            "Moved wishlist to cart"
        );
        report
    }
}
