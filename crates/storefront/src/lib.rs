//! Maison Storefront library.
//!
//! The storefront engine behind the browsing, cart, wishlist and checkout
//! screens. Everything runs in memory on the caller's thread; the UI layer
//! owns rendering, routing and persistence.
//!
//! # Modules
//!
//! - [`catalog`] - Product records and listing filters/sorts
//! - [`promo`] - Promo code table
//! - [`cart`] - Cart store with derived totals
//! - [`wishlist`] - Saved products
//! - [`checkout`] - Order placement
//! - [`display`] - Rounded, currency-formatted views
//! - [`config`] - Pricing parameters from the environment

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod display;
pub mod error;
pub mod promo;
pub mod wishlist;

pub use cart::{CartState, CartStore, CartTotals, LineItem, SharedCartStore, VariantKey};
pub use catalog::{Catalog, Product, ProductQuery, SortKey};
pub use config::PricingConfig;
pub use error::{CartError, CatalogError, CheckoutError};
pub use promo::PromoRuleTable;
pub use wishlist::Wishlist;
