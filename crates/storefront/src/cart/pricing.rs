//! Derived cart totals.
//!
//! Totals are a pure function of the line items, the active discount rate
//! and the pricing configuration. Nothing here rounds; amounts keep full
//! decimal precision until they are formatted for display.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::PricingConfig;
use crate::error::{CartError, CartResult};

use super::LineItem;

/// Subtotal, discount, shipping, tax and total for a cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartTotals {
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
}

impl CartTotals {
    /// All-zero totals of an empty cart.
    pub const ZERO: Self = Self {
        subtotal: Decimal::ZERO,
        discount: Decimal::ZERO,
        shipping: Decimal::ZERO,
        tax: Decimal::ZERO,
        total: Decimal::ZERO,
    };
}

/// Compute totals in dependency order: subtotal, discount, shipping, tax, total.
///
/// The same lines must also be priceable without any discount, so dropping a
/// promo code from a cart that priced successfully cannot overflow.
///
/// # Errors
///
/// Returns [`CartError::AmountOverflow`] if any amount exceeds the `Decimal`
/// range.
///
/// # Panics
///
/// Panics if `discount_rate` is outside `[0, 1]`; promo tables never hold
/// such a rate.
pub fn compute_totals(
    items: &[LineItem],
    discount_rate: Decimal,
    config: &PricingConfig,
) -> CartResult<CartTotals> {
    assert!(
        discount_rate >= Decimal::ZERO && discount_rate <= Decimal::ONE,
        "discount rate out of range: {discount_rate}"
    );

    if items.is_empty() {
        return Ok(CartTotals::ZERO);
    }

    let subtotal = items
        .iter()
        .try_fold(Decimal::ZERO, |sum, line| {
            line.unit_price()
                .checked_mul(Decimal::from(line.quantity()))
                .and_then(|line_total| sum.checked_add(line_total))
        })
        .ok_or(CartError::AmountOverflow)?;
    assert!(subtotal >= Decimal::ZERO, "negative subtotal: {subtotal}");

    let discount = subtotal
        .checked_mul(discount_rate)
        .ok_or(CartError::AmountOverflow)?;
    assert!(discount <= subtotal, "discount {discount} exceeds subtotal {subtotal}");

    let shipping = if subtotal >= config.free_shipping_threshold {
        Decimal::ZERO
    } else {
        config.flat_shipping_fee
    };

    // undiscounted total bounds every discounted one
    gross_total(subtotal, shipping, config.tax_rate).ok_or(CartError::AmountOverflow)?;

    let taxable = subtotal - discount;
    let tax = taxable
        .checked_mul(config.tax_rate)
        .ok_or(CartError::AmountOverflow)?;
    let total = gross_total(taxable, shipping, config.tax_rate).ok_or(CartError::AmountOverflow)?;

    Ok(CartTotals {
        subtotal,
        discount,
        shipping,
        tax,
        total,
    })
}

fn gross_total(taxable: Decimal, shipping: Decimal, tax_rate: Decimal) -> Option<Decimal> {
    taxable
        .checked_mul(tax_rate)
        .and_then(|tax| taxable.checked_add(tax))
        .and_then(|sum| sum.checked_add(shipping))
}

/// Amount still needed before shipping becomes free; zero once reached.
#[must_use]
pub fn remaining_for_free_shipping(subtotal: Decimal, config: &PricingConfig) -> Decimal {
    (config.free_shipping_threshold - subtotal).max(Decimal::ZERO)
}
