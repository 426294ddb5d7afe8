//! Product catalog.
//!
//! The catalog is read-only once built: carts copy prices out of it and the
//! listing screen derives filtered views from it, but nothing writes back.

pub mod query;

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use maison_core::ProductId;

use crate::cart::VariantKey;
use crate::error::CatalogError;

pub use query::{PriceRange, ProductListing, ProductQuery, SortKey, filter_products};

/// A size offered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeOption {
    pub value: String,
    pub available: bool,
}

/// A color offered for a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorOption {
    pub name: String,
    pub hex: String,
    pub available: bool,
}

/// A catalog product record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    /// List price in the store currency.
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub subcategory: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub sizes: Vec<SizeOption>,
    #[serde(default)]
    pub colors: Vec<ColorOption>,
    pub in_stock: bool,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub material: Option<String>,
    #[serde(default)]
    pub care_instructions: Vec<String>,
}

impl Product {
    /// Whether `size` is offered and available.
    #[must_use]
    pub fn has_available_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s.available && s.value == size)
    }

    /// Whether `color` is offered and available.
    #[must_use]
    pub fn has_available_color(&self, color: &str) -> bool {
        self.colors.iter().any(|c| c.available && c.name == color)
    }

    /// Whether the product can be bought in the given variant.
    #[must_use]
    pub fn variant_available(&self, variant: &VariantKey) -> bool {
        self.in_stock && self.has_available_size(&variant.size) && self.has_available_color(&variant.color)
    }

    /// The first available size and color, in catalog order.
    #[must_use]
    pub fn first_available_variant(&self) -> Option<VariantKey> {
        if !self.in_stock {
            return None;
        }
        let size = self.sizes.iter().find(|s| s.available)?;
        let color = self.colors.iter().find(|c| c.available)?;
        Some(VariantKey::new(&size.value, &color.name))
    }
}

/// Immutable product collection.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, keeping the given order.
    ///
    /// # Errors
    ///
    /// Returns an error if two products share an id or a price is negative.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            if !seen.insert(&product.id) {
                return Err(CatalogError::DuplicateProduct(product.id.clone()));
            }
            if product.price < Decimal::ZERO {
                return Err(CatalogError::NegativePrice(product.id.clone()));
            }
        }
        Ok(Self { products })
    }

    /// Parse a JSON array of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid or the products fail
    /// [`Catalog::new`] validation.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    /// Find a product by id.
    #[must_use]
    pub fn find(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// All products in catalog order.
    #[must_use]
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.products
            .iter()
            .map(|p| p.category.as_str())
            .filter(|c| seen.insert(*c))
            .collect()
    }

    /// Featured products in catalog order.
    pub fn featured(&self) -> impl Iterator<Item = &Product> {
        self.products.iter().filter(|p| p.featured)
    }

    /// Number of products.
    #[must_use]
    pub fn len(&self) -> usize {
        self.products.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    /// Build a product with the given sizes and colors, all available unless
    /// prefixed with `!`.
    pub(crate) fn product(id: &str, name: &str, price: Decimal, sizes: &[&str], colors: &[&str]) -> Product {
        Product {
            id: ProductId::new(id),
            name: name.to_string(),
            price,
            category: "knitwear".to_string(),
            subcategory: None,
            description: String::new(),
            images: Vec::new(),
            sizes: sizes
                .iter()
                .map(|s| SizeOption {
                    value: s.trim_start_matches('!').to_string(),
                    available: !s.starts_with('!'),
                })
                .collect(),
            colors: colors
                .iter()
                .map(|c| ColorOption {
                    name: c.trim_start_matches('!').to_string(),
                    hex: "#000000".to_string(),
                    available: !c.starts_with('!'),
                })
                .collect(),
            in_stock: true,
            featured: false,
            material: None,
            care_instructions: Vec::new(),
        }
    }

    #[test]
    fn test_from_json_camel_case() {
        let json = r##"[{
            "id": "1",
            "name": "SLIM MERINO WOOL MOCK-NECK JUMPER",
            "price": "99",
            "category": "knitwear",
            "sizes": [{"value": "M", "available": false}, {"value": "L", "available": true}],
            "colors": [{"name": "Navy", "hex": "#1a2332", "available": true}],
            "inStock": true,
            "featured": true,
            "careInstructions": ["Dry flat"]
        }]"##;
        let catalog = Catalog::from_json(json).unwrap();
        let p = catalog.find(&ProductId::new("1")).unwrap();
        assert_eq!(p.price, Decimal::new(99, 0));
        assert!(p.featured);
        assert_eq!(p.care_instructions, vec!["Dry flat".to_string()]);
        assert_eq!(catalog.featured().count(), 1);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let a = product("a", "A", Decimal::ONE, &["M"], &["Black"]);
        let result = Catalog::new(vec![a.clone(), a]);
        assert!(matches!(result, Err(CatalogError::DuplicateProduct(_))));
    }

    #[test]
    fn test_negative_price_rejected() {
        let a = product("a", "A", Decimal::NEGATIVE_ONE, &["M"], &["Black"]);
        assert!(matches!(
            Catalog::new(vec![a]),
            Err(CatalogError::NegativePrice(_))
        ));
    }

    #[test]
    fn test_first_available_variant_skips_unavailable() {
        let p = product("a", "A", Decimal::ONE, &["!S", "M"], &["!Navy", "Black"]);
        assert_eq!(p.first_available_variant(), Some(VariantKey::new("M", "Black")));
    }

    #[test]
    fn test_out_of_stock_has_no_variant() {
        let mut p = product("a", "A", Decimal::ONE, &["M"], &["Black"]);
        p.in_stock = false;
        assert_eq!(p.first_available_variant(), None);
        assert!(!p.variant_available(&VariantKey::new("M", "Black")));
    }

    #[test]
    fn test_categories_first_seen_order() {
        let mut a = product("a", "A", Decimal::ONE, &[], &[]);
        a.category = "shirts".to_string();
        let b = product("b", "B", Decimal::ONE, &[], &[]);
        let mut c = product("c", "C", Decimal::ONE, &[], &[]);
        c.category = "shirts".to_string();
        let catalog = Catalog::new(vec![a, b, c]).unwrap();
        assert_eq!(catalog.categories(), vec!["shirts", "knitwear"]);
    }
}
