//! `maison quote`: price a cart built from catalog items.

use std::path::Path;

use tracing::info;

use maison_storefront::display::CartSummary;
use maison_storefront::{CartStore, Catalog, PricingConfig};

use super::{CliError, ItemSpec};

/// Build a cart from `items`, apply `promo`, and print the summary.
///
/// # Errors
///
/// Returns an error if the catalog cannot be loaded, an item is unknown or
/// unavailable, or the promo code is not recognised.
#[allow(clippy::print_stdout)]
pub fn run(
    catalog_path: &Path,
    items: &[ItemSpec],
    promo: Option<&str>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let catalog = super::load_catalog(catalog_path)?;
    let config = PricingConfig::from_env()?;
    let cart = build_cart(&catalog, config, items, promo)?;
    let summary = CartSummary::from_state(cart.state(), cart.currency());

    info!(lines = cart.line_count(), items = cart.item_count(), "Built cart");

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }
    Ok(())
}

/// Fill a fresh cart with `items` and apply `promo`.
///
/// # Errors
///
/// Returns the first item or promo failure.
pub fn build_cart(
    catalog: &Catalog,
    config: PricingConfig,
    items: &[ItemSpec],
    promo: Option<&str>,
) -> Result<CartStore, Box<dyn std::error::Error>> {
    let mut cart = CartStore::new(config);
    for item in items {
        let product = catalog
            .find(&item.product_id)
            .ok_or_else(|| CliError::UnknownProduct(item.product_id.clone()))?;
        cart.add_product(product, item.variant.clone(), item.quantity)?;
    }
    if let Some(code) = promo {
        cart.apply_promo_code(code)?;
    }
    Ok(cart)
}

#[allow(clippy::print_stdout)]
fn print_summary(summary: &CartSummary) {
    for line in &summary.items {
        println!(
            "{:>3} x {:<40} {:<16} {:>10}",
            line.quantity, line.title, line.variant, line.line_price
        );
    }
    println!();
    println!("{:<14}{:>12}", "Subtotal", summary.subtotal);
    if let Some(code) = &summary.promo_code {
        println!("{:<14}{:>12}", format!("Promo {code}"), format!("-{}", summary.discount));
    }
    println!(
        "{:<14}{:>12}",
        "Shipping",
        summary.shipping.as_deref().unwrap_or("Free")
    );
    println!("{:<14}{:>12}", "Tax", summary.tax);
    println!("{:<14}{:>12}", "Total", summary.total);
}
