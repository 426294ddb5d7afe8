//! Error types for storefront operations.
//!
//! Business-rule failures are ordinary values: every operation that returns
//! one of these errors has left its state untouched.

use rust_decimal::Decimal;
use thiserror::Error;

use maison_core::ProductId;

use crate::cart::VariantKey;

/// Non-fatal outcomes of a cart mutation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CartError {
    /// The quantity was zero or negative where a positive count is required.
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Quantity the caller supplied.
        quantity: i64,
    },

    /// The unit price is negative.
    #[error("Invalid unit price: {0}")]
    InvalidPrice(Decimal),

    /// The promo code is not in the promo table.
    #[error("Promo code not found: {0}")]
    CodeNotFound(String),

    /// No line matches the product and variant.
    #[error("No cart line for {product_id} ({variant})")]
    ItemNotFound {
        /// Requested product.
        product_id: ProductId,
        /// Requested variant.
        variant: VariantKey,
    },

    /// The size or color is not offered, or not currently available.
    #[error("Variant {variant} of {product_id} is unavailable")]
    VariantUnavailable {
        /// Requested product.
        product_id: ProductId,
        /// Requested variant.
        variant: VariantKey,
    },

    /// The product is out of stock.
    #[error("Product out of stock: {0}")]
    OutOfStock(ProductId),

    /// The cart's totals would not fit in a `Decimal`.
    #[error("Cart amounts exceed the supported range")]
    AmountOverflow,
}

impl CartError {
    /// Whether the caller can ignore this outcome.
    ///
    /// Removing or updating a line that no longer exists usually means the
    /// UI rendered a stale cart; the end state is what the user asked for.
    #[must_use]
    pub const fn is_benign(&self) -> bool {
        matches!(self, Self::ItemNotFound { .. })
    }
}

/// Errors placing an order.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// There is nothing to check out.
    #[error("Cannot check out an empty cart")]
    EmptyCart,
}

/// Errors building a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The catalog document is not valid JSON for the product schema.
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// Two products share an id.
    #[error("Duplicate product id: {0}")]
    DuplicateProduct(ProductId),

    /// A product has a negative list price.
    #[error("Negative price for product {0}")]
    NegativePrice(ProductId),
}

/// Result type alias for cart mutations.
pub type CartResult<T = ()> = std::result::Result<T, CartError>;
