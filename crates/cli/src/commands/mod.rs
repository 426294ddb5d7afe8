//! CLI subcommands and shared helpers.

pub mod products;
pub mod quote;

use std::path::Path;
use std::str::FromStr;

use thiserror::Error;
use tracing::info;

use maison_core::ProductId;
use maison_storefront::{Catalog, Product, VariantKey};

/// Errors specific to CLI input.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("invalid item '{0}', expected ID:SIZE:COLOR[:QTY]")]
    InvalidItemSpec(String),
    #[error("product not in catalog: {0}")]
    UnknownProduct(ProductId),
}

/// A cart item given on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemSpec {
    pub product_id: ProductId,
    pub variant: VariantKey,
    pub quantity: i64,
}

impl FromStr for ItemSpec {
    type Err = CliError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CliError::InvalidItemSpec(s.to_string());
        let parts: Vec<&str> = s.split(':').map(str::trim).collect();
        let (id, size, color, quantity) = match parts.as_slice() {
            [id, size, color] => (*id, *size, *color, 1),
            [id, size, color, qty] => (*id, *size, *color, qty.parse().map_err(|_| invalid())?),
            _ => return Err(invalid()),
        };
        if id.is_empty() || size.is_empty() || color.is_empty() {
            return Err(invalid());
        }
        Ok(Self {
            product_id: ProductId::new(id),
            variant: VariantKey::new(size, color),
            quantity,
        })
    }
}

/// Load a catalog file, choosing the format by extension.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if the
/// products fail catalog validation.
pub fn load_catalog(path: &Path) -> Result<Catalog, Box<dyn std::error::Error>> {
    let content = std::fs::read_to_string(path)?;
    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let catalog = if is_yaml {
        let products: Vec<Product> = serde_yaml::from_str(&content)?;
        Catalog::new(products)?
    } else {
        Catalog::from_json(&content)?
    };

    info!(path = %path.display(), products = catalog.len(), "Loaded catalog");
    Ok(catalog)
}
