//! Maison Core - Shared types library.
//!
//! This crate provides common types used across all Maison components:
//! - `storefront` - Catalog, cart, wishlist and checkout engine
//! - `cli` - Command-line driver for browsing a catalog and pricing carts
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no configuration loading,
//! no logging. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, currency formatting and order statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
