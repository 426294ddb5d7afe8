//! Integration tests for the Maison storefront engine.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p maison-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_pricing` - Derived totals, promo codes and quantity rules
//! - `catalog_listing` - Filter and sort semantics over a fixture catalog
//! - `checkout_flow` - Wishlist to cart to order
//!
//! This library holds the shared fixtures.

#![cfg_attr(not(test), forbid(unsafe_code))]

use rust_decimal::Decimal;

use maison_core::ProductId;
use maison_storefront::{Catalog, CatalogError, VariantKey};

/// Fixture catalog, modelled on the knitwear/trousers/shirts storefront.
///
/// | id | price | sizes (available) | colors (available) |
/// |----|-------|-------------------|--------------------|
/// | A  | 60.00 | S, M              | Black, Navy        |
/// | B  | 50.00 | M (no), L         | Black              |
/// | C  | 39.99 | M                 | Black (no), Cream  |
/// | D  | 145.00| L, XL             | Grey               |
/// | E  | 25.00 | M                 | Black (out of stock) |
pub const CATALOG_JSON: &str = r##"[
    {
        "id": "A", "name": "Slim Merino Mock-Neck Jumper", "price": "60.00",
        "category": "knitwear", "subcategory": "jumpers", "inStock": true, "featured": true,
        "sizes": [{"value": "S", "available": true}, {"value": "M", "available": true}],
        "colors": [{"name": "Black", "hex": "#000000", "available": true},
                   {"name": "Navy", "hex": "#1a2332", "available": true}]
    },
    {
        "id": "B", "name": "Essential Cotton Tee", "price": "50.00",
        "category": "t-shirts", "inStock": true,
        "sizes": [{"value": "M", "available": false}, {"value": "L", "available": true}],
        "colors": [{"name": "Black", "hex": "#000000", "available": true}]
    },
    {
        "id": "C", "name": "cashmere crew", "price": "39.99",
        "category": "knitwear", "inStock": true,
        "sizes": [{"value": "M", "available": true}],
        "colors": [{"name": "Black", "hex": "#000000", "available": false},
                   {"name": "Cream", "hex": "#f5f0e1", "available": true}]
    },
    {
        "id": "D", "name": "Relaxed-Fit Wool Trousers", "price": "145.00",
        "category": "trousers", "inStock": true, "featured": true,
        "sizes": [{"value": "L", "available": true}, {"value": "XL", "available": true}],
        "colors": [{"name": "Grey", "hex": "#4a4a4a", "available": true}]
    },
    {
        "id": "E", "name": "Linen Shirt", "price": "25.00",
        "category": "shirts", "inStock": false,
        "sizes": [{"value": "M", "available": true}],
        "colors": [{"name": "Black", "hex": "#000000", "available": true}]
    }
]"##;

/// Parse [`CATALOG_JSON`].
///
/// # Errors
///
/// Returns an error if the fixture no longer parses.
pub fn fixture_catalog() -> Result<Catalog, CatalogError> {
    Catalog::from_json(CATALOG_JSON)
}

/// Shorthand for a product id.
#[must_use]
pub fn pid(id: &str) -> ProductId {
    ProductId::new(id)
}

/// Shorthand for a size/color variant.
#[must_use]
pub fn variant(size: &str, color: &str) -> VariantKey {
    VariantKey::new(size, color)
}

/// Whole currency units.
#[must_use]
pub fn units(n: i64) -> Decimal {
    Decimal::new(n, 0)
}

/// Minor currency units (cents).
#[must_use]
pub fn cents(n: i64) -> Decimal {
    Decimal::new(n, 2)
}
