//! Cart line items.

use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use maison_core::ProductId;

/// The size and color a product was added in.
///
/// Together with the product id this identifies a line within a cart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VariantKey {
    pub size: String,
    pub color: String,
}

impl VariantKey {
    #[must_use]
    pub fn new(size: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            size: size.into(),
            color: color.into(),
        }
    }
}

impl fmt::Display for VariantKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.size, self.color)
    }
}

/// One product variant and its quantity in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    product_id: ProductId,
    name: Option<String>,
    variant: VariantKey,
    unit_price: Decimal,
    quantity: u32,
}

impl LineItem {
    pub(crate) fn new(
        product_id: ProductId,
        name: Option<String>,
        variant: VariantKey,
        unit_price: Decimal,
        quantity: u32,
    ) -> Self {
        assert!(quantity > 0, "line item quantity must be positive");
        assert!(unit_price >= Decimal::ZERO, "unit price must not be negative");
        Self {
            product_id,
            name,
            variant,
            unit_price,
            quantity,
        }
    }

    #[must_use]
    pub const fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Product name captured when the line was created, if known.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    #[must_use]
    pub const fn variant(&self) -> &VariantKey {
        &self.variant
    }

    /// Price per unit, fixed when the line was created.
    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// `unit_price × quantity`, unrounded.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    /// Whether this line is for the given product and variant.
    #[must_use]
    pub fn is(&self, product_id: &ProductId, variant: &VariantKey) -> bool {
        &self.product_id == product_id && &self.variant == variant
    }

    pub(crate) fn set_quantity(&mut self, quantity: u32) {
        assert!(quantity > 0, "line item quantity must be positive");
        self.quantity = quantity;
    }
}
