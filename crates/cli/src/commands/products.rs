//! `maison products`: filtered catalog listing.

use std::path::Path;

use rust_decimal::Decimal;

use maison_core::money::format_amount;
use maison_storefront::catalog::{PriceRange, ProductQuery};
use maison_storefront::{PricingConfig, SortKey};

/// Filter arguments from the command line.
#[derive(Debug, Default)]
pub struct Filters {
    pub category: Option<String>,
    pub sizes: Vec<String>,
    pub colors: Vec<String>,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    pub sort: Option<String>,
}

impl Filters {
    /// Turn the arguments into a listing query.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown sort key.
    pub fn into_query(self) -> Result<ProductQuery, Box<dyn std::error::Error>> {
        let sort = self.sort.as_deref().map(str::parse::<SortKey>).transpose()?;
        Ok(ProductQuery {
            category: self.category,
            sizes: self.sizes.into_iter().collect(),
            colors: self.colors.into_iter().collect(),
            price_range: PriceRange::new(
                self.min.unwrap_or(PriceRange::ANY.min),
                self.max.unwrap_or(PriceRange::ANY.max),
            ),
            sort,
        })
    }
}

/// Print the products of `catalog_path` that match `filters`.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded or a filter is invalid.
#[allow(clippy::print_stdout)]
pub fn list(catalog_path: &Path, filters: Filters) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = super::load_catalog(catalog_path)?;
    let currency = PricingConfig::currency_from_env()?;
    let query = filters.into_query()?;
    let visible = query.apply(&catalog);

    tracing::info!(shown = visible.len(), total = catalog.len(), "Filtered catalog");

    for product in visible {
        let stock = if product.in_stock { "" } else { "  (out of stock)" };
        println!(
            "{:<8} {:<40} {:>10}  {}{stock}",
            product.id.as_str(),
            product.name,
            format_amount(product.price, currency),
            product.category,
        );
    }
    Ok(())
}
