//! Checkout: turning a cart into an order.
//!
//! Payment and shipping details are collected by the caller; this module
//! freezes the priced cart into an [`Order`] and empties the cart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use maison_core::{CurrencyCode, OrderId, OrderStatus, ProductId};

use crate::cart::{CartStore, LineItem, VariantKey};
use crate::error::CheckoutError;

/// A purchased line, frozen at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: ProductId,
    pub product_name: Option<String>,
    pub variant: VariantKey,
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl From<&LineItem> for OrderItem {
    fn from(line: &LineItem) -> Self {
        Self {
            product_id: line.product_id().clone(),
            product_name: line.name().map(str::to_string),
            variant: line.variant().clone(),
            unit_price: line.unit_price(),
            quantity: line.quantity(),
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub order_number: String,
    pub status: OrderStatus,
    pub currency: CurrencyCode,
    pub items: Vec<OrderItem>,
    pub promo_code: Option<String>,
    pub subtotal: Decimal,
    pub discount: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// Place an order for everything in the cart, then clear the cart.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if the cart has no lines; the cart
/// is left as it was.
#[instrument(skip(cart), fields(lines = cart.line_count()))]
pub fn place_order(cart: &mut CartStore) -> Result<Order, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let state = cart.snapshot();
    let id = OrderId::generate();
    let totals = *state.totals();
    let order = Order {
        order_number: order_number(&id),
        id,
        status: OrderStatus::Pending,
        currency: cart.currency(),
        items: state.items().iter().map(OrderItem::from).collect(),
        promo_code: state.promo_code().map(str::to_string),
        subtotal: totals.subtotal,
        discount: totals.discount,
        shipping: totals.shipping,
        tax: totals.tax,
        total: totals.total,
        created_at: Utc::now(),
    };

    cart.clear();
    info!(
        order_number = %order.order_number,
        total = %order.total,
        "Placed order"
    );
    Ok(order)
}

/// `ORD-` followed by the first eight hex digits of the id, upper-cased.
fn order_number(id: &OrderId) -> String {
    let digits: String = id
        .as_str()
        .chars()
        .filter(char::is_ascii_hexdigit)
        .take(8)
        .collect();
    format!("ORD-{}", digits.to_ascii_uppercase())
}
