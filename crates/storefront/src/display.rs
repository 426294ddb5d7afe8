//! Display formatting for cart amounts.
//!
//! Stored totals keep full precision; amounts are rounded only when they
//! are turned into strings here.

use serde::Serialize;

use maison_core::CurrencyCode;
pub use maison_core::money::format_amount;

use crate::cart::CartState;

/// One cart line formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLineView {
    pub product_id: String,
    pub title: String,
    pub variant: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

/// Cart totals formatted for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    pub items: Vec<CartLineView>,
    pub item_count: u64,
    pub promo_code: Option<String>,
    pub subtotal: String,
    pub discount: String,
    /// `None` when shipping is free.
    pub shipping: Option<String>,
    pub tax: String,
    pub total: String,
}

impl CartSummary {
    /// Format a cart snapshot.
    #[must_use]
    pub fn from_state(state: &CartState, currency: CurrencyCode) -> Self {
        let fmt = |amount| format_amount(amount, currency);
        Self {
            items: state
                .items()
                .iter()
                .map(|line| CartLineView {
                    product_id: line.product_id().to_string(),
                    title: line
                        .name()
                        .map_or_else(|| line.product_id().to_string(), str::to_string),
                    variant: line.variant().to_string(),
                    quantity: line.quantity(),
                    price: fmt(line.unit_price()),
                    line_price: fmt(line.line_total()),
                })
                .collect(),
            item_count: state.item_count(),
            promo_code: state.promo_code().map(str::to_string),
            subtotal: fmt(state.subtotal()),
            discount: fmt(state.discount()),
            shipping: (!state.shipping().is_zero()).then(|| fmt(state.shipping())),
            tax: fmt(state.tax()),
            total: fmt(state.total()),
        }
    }
}
