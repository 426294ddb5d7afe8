//! Shopping cart.
//!
//! A [`CartStore`] owns the cart state exclusively. Every mutation prices a
//! candidate set of lines first and only then replaces the state, so readers
//! never see totals that disagree with the lines or the promo code.

mod line;
pub mod pricing;
mod shared;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use maison_core::{CurrencyCode, ProductId};

use crate::catalog::Product;
use crate::config::PricingConfig;
use crate::error::{CartError, CartResult};

pub use line::{LineItem, VariantKey};
pub use pricing::{CartTotals, compute_totals};
pub use shared::SharedCartStore;

/// Snapshot of a cart: lines, active promo code and derived totals.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartState {
    items: Vec<LineItem>,
    promo_code: Option<String>,
    totals: CartTotals,
}

impl CartState {
    /// Lines in insertion order.
    #[must_use]
    pub fn items(&self) -> &[LineItem] {
        &self.items
    }

    /// Active promo code, in canonical upper case.
    #[must_use]
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code.as_deref()
    }

    #[must_use]
    pub const fn totals(&self) -> &CartTotals {
        &self.totals
    }

    #[must_use]
    pub const fn subtotal(&self) -> Decimal {
        self.totals.subtotal
    }

    #[must_use]
    pub const fn discount(&self) -> Decimal {
        self.totals.discount
    }

    #[must_use]
    pub const fn shipping(&self) -> Decimal {
        self.totals.shipping
    }

    #[must_use]
    pub const fn tax(&self) -> Decimal {
        self.totals.tax
    }

    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.totals.total
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity())).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// The cart engine.
#[derive(Debug, Clone)]
pub struct CartStore {
    config: PricingConfig,
    state: CartState,
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

impl CartStore {
    /// An empty cart priced with `config`.
    #[must_use]
    pub fn new(config: PricingConfig) -> Self {
        Self {
            config,
            state: CartState::default(),
        }
    }

    /// The pricing configuration in use.
    #[must_use]
    pub const fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Currency of every amount in this cart.
    #[must_use]
    pub const fn currency(&self) -> CurrencyCode {
        self.config.currency
    }

    /// Borrow the current state.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// An owned copy of the current state.
    #[must_use]
    pub fn snapshot(&self) -> CartState {
        self.state.clone()
    }

    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.state.item_count()
    }

    #[must_use]
    pub fn line_count(&self) -> usize {
        self.state.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Find the line for a product variant.
    #[must_use]
    pub fn find(&self, product_id: &ProductId, variant: &VariantKey) -> Option<&LineItem> {
        self.state.items.iter().find(|i| i.is(product_id, variant))
    }

    /// Add `quantity` units of a product variant.
    ///
    /// An existing line for the same product and variant is incremented and
    /// keeps the unit price it was created with.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] for `quantity < 1` and
    /// [`CartError::InvalidPrice`] for a negative `unit_price`; the cart is
    /// left unchanged.
    pub fn add_item(
        &mut self,
        product_id: ProductId,
        variant: VariantKey,
        unit_price: Decimal,
        quantity: i64,
    ) -> CartResult {
        self.add_line(product_id, None, variant, unit_price, quantity)
    }

    /// Add a catalog product, copying its current list price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::OutOfStock`] or [`CartError::VariantUnavailable`]
    /// if the product cannot be bought in that variant, and
    /// [`CartError::InvalidQuantity`] for `quantity < 1`.
    pub fn add_product(
        &mut self,
        product: &Product,
        variant: VariantKey,
        quantity: i64,
    ) -> CartResult {
        if !product.in_stock {
            warn!(product_id = %product.id, "Rejected add: product out of stock");
            return Err(CartError::OutOfStock(product.id.clone()));
        }
        if !product.variant_available(&variant) {
            warn!(product_id = %product.id, variant = %variant, "Rejected add: variant unavailable");
            return Err(CartError::VariantUnavailable {
                product_id: product.id.clone(),
                variant,
            });
        }
        self.add_line(
            product.id.clone(),
            Some(product.name.clone()),
            variant,
            product.price,
            quantity,
        )
    }

    fn add_line(
        &mut self,
        product_id: ProductId,
        name: Option<String>,
        variant: VariantKey,
        unit_price: Decimal,
        quantity: i64,
    ) -> CartResult {
        let quantity = positive_quantity(quantity)?;
        if unit_price < Decimal::ZERO {
            warn!(product_id = %product_id, %unit_price, "Rejected add: negative price");
            return Err(CartError::InvalidPrice(unit_price));
        }

        let mut items = self.state.items.clone();
        if let Some(line) = items.iter_mut().find(|i| i.is(&product_id, &variant)) {
            let combined = line
                .quantity()
                .checked_add(quantity)
                .ok_or(CartError::InvalidQuantity {
                    quantity: i64::from(quantity),
                })?;
            line.set_quantity(combined);
        } else {
            items.push(LineItem::new(
                product_id.clone(),
                name,
                variant.clone(),
                unit_price,
                quantity,
            ));
        }

        self.commit(items, self.state.promo_code.clone())?;
        debug!(
            product_id = %product_id,
            variant = %variant,
            quantity,
            lines = self.state.items.len(),
            "Added to cart"
        );
        Ok(())
    }

    /// Remove the line for a product variant.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] (benign) if there is no such line.
    pub fn remove_item(&mut self, product_id: &ProductId, variant: &VariantKey) -> CartResult {
        let mut items = self.state.items.clone();
        items.retain(|i| !i.is(product_id, variant));
        if items.len() == self.state.items.len() {
            debug!(product_id = %product_id, variant = %variant, "Remove ignored: no such line");
            return Err(not_found(product_id, variant));
        }

        self.commit(items, self.state.promo_code.clone())?;
        debug!(
            product_id = %product_id,
            variant = %variant,
            lines = self.state.items.len(),
            "Removed from cart"
        );
        Ok(())
    }

    /// Set the absolute quantity of a line; zero or below removes it.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::ItemNotFound`] (benign) if there is no such line.
    pub fn set_quantity(
        &mut self,
        product_id: &ProductId,
        variant: &VariantKey,
        quantity: i64,
    ) -> CartResult {
        if quantity <= 0 {
            return self.remove_item(product_id, variant);
        }
        let quantity = positive_quantity(quantity)?;

        let mut items = self.state.items.clone();
        let Some(line) = items.iter_mut().find(|i| i.is(product_id, variant)) else {
            debug!(product_id = %product_id, variant = %variant, "Update ignored: no such line");
            return Err(not_found(product_id, variant));
        };
        line.set_quantity(quantity);

        self.commit(items, self.state.promo_code.clone())?;
        debug!(
            product_id = %product_id,
            variant = %variant,
            quantity,
            lines = self.state.items.len(),
            "Updated quantity"
        );
        Ok(())
    }

    /// Activate a promo code, replacing any code already applied.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::CodeNotFound`] if the code is unknown; the
    /// previously active code, if any, stays in effect.
    /// [`CartError::AmountOverflow`] leaves the cart unchanged as well.
    #[instrument(skip(self))]
    pub fn apply_promo_code(&mut self, code: &str) -> CartResult {
        let Some((canonical, rate)) = self.config.promos.lookup(code) else {
            warn!("Unknown promo code");
            return Err(CartError::CodeNotFound(code.to_string()));
        };
        let canonical = canonical.to_string();

        if let Some(previous) = self.state.promo_code.as_deref()
            && previous != canonical
        {
            debug!(previous = %previous, "Replacing active promo code");
        }
        self.commit(self.state.items.clone(), Some(canonical))?;
        info!(%rate, discount = %self.state.totals.discount, "Applied promo code");
        Ok(())
    }

    /// Drop the active promo code, if any.
    pub fn remove_promo_code(&mut self) {
        if let Some(code) = self.state.promo_code.take() {
            info!(code = %code, "Removed promo code");
        }
        self.recompute();
    }

    /// Empty the cart and drop the promo code.
    pub fn clear(&mut self) {
        self.state = CartState::default();
        debug!(lines = self.state.items.len(), "Cleared cart");
    }

    /// Recompute derived totals from the lines and promo code.
    ///
    /// Mutating methods leave totals current already; calling this without
    /// an intervening mutation yields identical totals.
    pub fn recompute(&mut self) -> &CartTotals {
        let rate = self.discount_rate();
        match compute_totals(&self.state.items, rate, &self.config) {
            Ok(totals) => self.state.totals = totals,
            // committed lines always price without a discount
            Err(e) => warn!(error = %e, "Kept previous totals"),
        }
        &self.state.totals
    }

    /// Price `items` under `promo_code` and, only if that succeeds, make
    /// them the new state.
    fn commit(&mut self, items: Vec<LineItem>, promo_code: Option<String>) -> CartResult {
        let rate = promo_code
            .as_deref()
            .map_or(Decimal::ZERO, |code| self.config.promos.rate(code));
        let totals = compute_totals(&items, rate, &self.config).inspect_err(|_| {
            warn!(lines = items.len(), "Rejected mutation: amounts overflow");
        })?;
        self.state = CartState {
            items,
            promo_code,
            totals,
        };
        Ok(())
    }

    /// Rate of the active promo code, zero without one.
    #[must_use]
    pub fn discount_rate(&self) -> Decimal {
        self.state
            .promo_code
            .as_deref()
            .map_or(Decimal::ZERO, |code| self.config.promos.rate(code))
    }

    /// Amount still needed for free shipping; zero once reached or for an
    /// empty cart.
    #[must_use]
    pub fn amount_until_free_shipping(&self) -> Decimal {
        if self.is_empty() {
            return Decimal::ZERO;
        }
        pricing::remaining_for_free_shipping(self.state.totals.subtotal, &self.config)
    }
}

fn positive_quantity(quantity: i64) -> CartResult<u32> {
    u32::try_from(quantity)
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| {
            warn!(quantity, "Rejected invalid quantity");
            CartError::InvalidQuantity { quantity }
        })
}

fn not_found(product_id: &ProductId, variant: &VariantKey) -> CartError {
    CartError::ItemNotFound {
        product_id: product_id.clone(),
        variant: variant.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::product;
    use crate::promo::PromoRuleTable;

    fn pid(id: &str) -> ProductId {
        ProductId::new(id)
    }

    fn m_black() -> VariantKey {
        VariantKey::new("M", "Black")
    }

    fn dollars(n: i64) -> Decimal {
        Decimal::new(n, 0)
    }

    #[test]
    fn test_add_appends_then_increments() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(10), 1).unwrap();
        cart.add_item(pid("a"), m_black(), dollars(10), 2).unwrap();
        cart.add_item(pid("a"), VariantKey::new("L", "Black"), dollars(10), 1).unwrap();

        assert_eq!(cart.line_count(), 2);
        assert_eq!(cart.find(&pid("a"), &m_black()).unwrap().quantity(), 3);
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.state().subtotal(), dollars(40));
    }

    #[test]
    fn test_increment_keeps_original_unit_price() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(10), 1).unwrap();
        cart.add_item(pid("a"), m_black(), dollars(12), 1).unwrap();
        let line = cart.find(&pid("a"), &m_black()).unwrap();
        assert_eq!(line.unit_price(), dollars(10));
        assert_eq!(cart.state().subtotal(), dollars(20));
    }

    #[test]
    fn test_add_rejects_non_positive_quantity() {
        let mut cart = CartStore::default();
        let before = cart.snapshot();
        assert_eq!(
            cart.add_item(pid("a"), m_black(), dollars(10), 0),
            Err(CartError::InvalidQuantity { quantity: 0 })
        );
        assert_eq!(
            cart.add_item(pid("a"), m_black(), dollars(10), -3),
            Err(CartError::InvalidQuantity { quantity: -3 })
        );
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn test_add_rejects_negative_price() {
        let mut cart = CartStore::default();
        assert!(matches!(
            cart.add_item(pid("a"), m_black(), dollars(-1), 1),
            Err(CartError::InvalidPrice(_))
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_remove_missing_is_benign() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(10), 1).unwrap();
        let before = cart.snapshot();
        let err = cart.remove_item(&pid("b"), &m_black()).unwrap_err();
        assert!(err.is_benign());
        assert_eq!(cart.snapshot(), before);
    }

    #[test]
    fn test_set_quantity_is_absolute() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(10), 5).unwrap();
        cart.set_quantity(&pid("a"), &m_black(), 2).unwrap();
        assert_eq!(cart.item_count(), 2);
        assert_eq!(cart.state().subtotal(), dollars(20));
    }

    #[test]
    fn test_set_quantity_zero_or_negative_removes() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(10), 1).unwrap();
        cart.add_item(pid("b"), m_black(), dollars(10), 1).unwrap();
        cart.set_quantity(&pid("a"), &m_black(), 0).unwrap();
        cart.set_quantity(&pid("b"), &m_black(), -1).unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.state().totals(), &CartTotals::ZERO);
    }

    #[test]
    fn test_set_quantity_missing_line() {
        let mut cart = CartStore::default();
        assert!(matches!(
            cart.set_quantity(&pid("a"), &m_black(), 3),
            Err(CartError::ItemNotFound { .. })
        ));
    }

    #[test]
    fn test_unknown_promo_keeps_previous_code() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(50), 1).unwrap();
        cart.apply_promo_code("save10").unwrap();
        let before = cart.snapshot();

        assert_eq!(
            cart.apply_promo_code("BOGUS"),
            Err(CartError::CodeNotFound("BOGUS".to_string()))
        );
        assert_eq!(cart.snapshot(), before);
        assert_eq!(cart.state().promo_code(), Some("SAVE10"));
    }

    #[test]
    fn test_new_code_replaces_old() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(50), 1).unwrap();
        cart.apply_promo_code("SAVE10").unwrap();
        cart.apply_promo_code("SAVE20").unwrap();
        assert_eq!(cart.state().promo_code(), Some("SAVE20"));
        assert_eq!(cart.state().discount(), dollars(10));
    }

    #[test]
    fn test_promo_on_empty_cart_discounts_nothing() {
        let mut cart = CartStore::default();
        cart.apply_promo_code("SAVE20").unwrap();
        assert_eq!(cart.state().totals(), &CartTotals::ZERO);
        cart.add_item(pid("a"), m_black(), dollars(50), 1).unwrap();
        assert_eq!(cart.state().discount(), dollars(10));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), dollars(50), 2).unwrap();
        cart.apply_promo_code("SAVE20").unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.state().promo_code(), None);
        assert_eq!(cart.state().totals(), &CartTotals::ZERO);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), Decimal::new(3333, 2), 3).unwrap();
        cart.apply_promo_code("WELCOME").unwrap();
        let first = *cart.recompute();
        let second = *cart.recompute();
        assert_eq!(first, second);
        assert_eq!(&first, cart.state().totals());
    }

    #[test]
    fn test_add_product_copies_catalog_price() {
        let p = product("tee", "Tee", Decimal::new(2500, 2), &["M"], &["Black"]);
        let mut cart = CartStore::default();
        cart.add_product(&p, m_black(), 2).unwrap();
        let line = cart.find(&p.id, &m_black()).unwrap();
        assert_eq!(line.unit_price(), Decimal::new(2500, 2));
        assert_eq!(line.name(), Some("Tee"));
    }

    #[test]
    fn test_add_product_rejects_unavailable_variant() {
        let p = product("tee", "Tee", Decimal::ONE, &["!M", "L"], &["Black"]);
        let mut cart = CartStore::default();
        assert!(matches!(
            cart.add_product(&p, m_black(), 1),
            Err(CartError::VariantUnavailable { .. })
        ));
        assert!(matches!(
            cart.add_product(&p, VariantKey::new("L", "Red"), 1),
            Err(CartError::VariantUnavailable { .. })
        ));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_product_rejects_out_of_stock() {
        let mut p = product("tee", "Tee", Decimal::ONE, &["M"], &["Black"]);
        p.in_stock = false;
        let mut cart = CartStore::default();
        assert_eq!(
            cart.add_product(&p, m_black(), 1),
            Err(CartError::OutOfStock(p.id.clone()))
        );
    }

    #[test]
    fn test_custom_config_is_used() {
        let config = PricingConfig::new(
            CurrencyCode::EUR,
            Decimal::new(50, 0),
            Decimal::new(499, 2),
            Decimal::new(20, 2),
        )
        .unwrap()
        .with_promos(PromoRuleTable::parse_list("HALF=0.5").unwrap());
        let mut cart = CartStore::new(config);
        cart.add_item(pid("a"), m_black(), dollars(40), 1).unwrap();
        assert_eq!(cart.state().shipping(), Decimal::new(499, 2));
        assert_eq!(cart.state().tax(), dollars(8));
        assert!(cart.apply_promo_code("SAVE20").is_err());
        cart.apply_promo_code("half").unwrap();
        assert_eq!(cart.state().discount(), dollars(20));
        assert_eq!(cart.state().tax(), dollars(4));
    }

    #[test]
    fn test_overflowing_add_leaves_cart_unchanged() {
        let half = Decimal::MAX / Decimal::from(2) + Decimal::ONE;
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), half, 1).unwrap();
        let before = cart.snapshot();

        assert_eq!(
            cart.add_item(pid("b"), m_black(), half, 1),
            Err(CartError::AmountOverflow)
        );
        assert_eq!(
            cart.add_item(pid("a"), m_black(), half, 1),
            Err(CartError::AmountOverflow)
        );
        assert_eq!(
            cart.set_quantity(&pid("a"), &m_black(), 2),
            Err(CartError::AmountOverflow)
        );
        assert_eq!(cart.snapshot(), before);
        assert_eq!(cart.line_count(), 1);
    }

    #[test]
    fn test_promo_round_trip_near_limit() {
        let big = Decimal::MAX / Decimal::from(2);
        let mut cart = CartStore::default();
        cart.add_item(pid("a"), m_black(), big, 1).unwrap();
        let undiscounted = *cart.state().totals();

        cart.apply_promo_code("SAVE20").unwrap();
        cart.remove_promo_code();
        assert_eq!(*cart.state().totals(), undiscounted);
    }

    #[test]
    fn test_amount_until_free_shipping() {
        let mut cart = CartStore::default();
        assert_eq!(cart.amount_until_free_shipping(), Decimal::ZERO);
        cart.add_item(pid("a"), m_black(), dollars(60), 1).unwrap();
        assert_eq!(cart.amount_until_free_shipping(), dollars(40));
        cart.add_item(pid("b"), m_black(), dollars(50), 1).unwrap();
        assert_eq!(cart.amount_until_free_shipping(), Decimal::ZERO);
    }
}
