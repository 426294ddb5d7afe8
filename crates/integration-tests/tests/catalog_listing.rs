//! Catalog listing: filters combine, sorting is stable and never narrows.

#![allow(clippy::unwrap_used)]

use maison_integration_tests::{cents, fixture_catalog, units};
use maison_storefront::catalog::{PriceRange, ProductListing};
use maison_storefront::{Catalog, Product, ProductQuery, SortKey};

fn ids(products: &[&Product]) -> Vec<String> {
    products.iter().map(|p| p.id.to_string()).collect()
}

// =============================================================================
// Filtering
// =============================================================================

#[test]
fn test_size_and_color_need_available_options() {
    let catalog = fixture_catalog().unwrap();
    let query = ProductQuery::new().size("M").color("Black");

    // B offers M but not available; C offers Black but not available
    assert_eq!(ids(&query.apply(&catalog)), ["A", "E"]);
}

#[test]
fn test_only_product_with_both_options_available_matches() {
    let catalog = Catalog::from_json(
        r##"[
        {"id": "tee", "name": "Tee", "price": "20", "category": "t-shirts", "inStock": true,
         "sizes": [{"value": "M", "available": true}],
         "colors": [{"name": "Black", "hex": "#000000", "available": true}]},
        {"id": "polo", "name": "Polo", "price": "35", "category": "t-shirts", "inStock": true,
         "sizes": [{"value": "M", "available": false}, {"value": "L", "available": true}],
         "colors": [{"name": "Black", "hex": "#000000", "available": true}]},
        {"id": "crew", "name": "Crew", "price": "60", "category": "knitwear", "inStock": true,
         "sizes": [{"value": "M", "available": true}],
         "colors": [{"name": "Black", "hex": "#000000", "available": false},
                    {"name": "Navy", "hex": "#1a2332", "available": true}]}
    ]"##,
    )
    .unwrap();

    let query = ProductQuery::new().size("M").color("Black");
    assert_eq!(ids(&query.apply(&catalog)), ["tee"]);
}

#[test]
fn test_sizes_are_ored() {
    let catalog = fixture_catalog().unwrap();
    let query = ProductQuery::new().size("S").size("XL");
    assert_eq!(ids(&query.apply(&catalog)), ["A", "D"]);
}

#[test]
fn test_category_and_price_range() {
    let catalog = fixture_catalog().unwrap();
    let query = ProductQuery::new()
        .category("knitwear")
        .price_range(PriceRange::new(units(40), units(100)));
    assert_eq!(ids(&query.apply(&catalog)), ["A"]);

    let inclusive = ProductQuery::new().price_range(PriceRange::new(cents(3999), units(50)));
    assert_eq!(ids(&inclusive.apply(&catalog)), ["B", "C"]);
}

#[test]
fn test_empty_query_shows_everything_in_catalog_order() {
    let catalog = fixture_catalog().unwrap();
    assert_eq!(
        ids(&ProductQuery::new().apply(&catalog)),
        ["A", "B", "C", "D", "E"]
    );
}

// =============================================================================
// Sorting
// =============================================================================

#[test]
fn test_sort_by_price() {
    let catalog = fixture_catalog().unwrap();
    let asc = ProductQuery::new().sort(SortKey::PriceAsc);
    assert_eq!(ids(&asc.apply(&catalog)), ["E", "C", "B", "A", "D"]);

    let desc = ProductQuery::new().sort(SortKey::PriceDesc);
    assert_eq!(ids(&desc.apply(&catalog)), ["D", "A", "B", "C", "E"]);
}

#[test]
fn test_sort_by_name_ignores_case() {
    let catalog = fixture_catalog().unwrap();
    let asc = ProductQuery::new().sort(SortKey::NameAsc);
    assert_eq!(ids(&asc.apply(&catalog)), ["C", "B", "E", "D", "A"]);
}

#[test]
fn test_listing_rederives_from_full_catalog() {
    let catalog = fixture_catalog().unwrap();
    let mut listing = ProductListing::new(&catalog);

    listing.set_category(Some("knitwear".to_string()));
    assert_eq!(ids(&listing.visible()), ["A", "C"]);

    listing.set_sort(Some(SortKey::PriceAsc));
    assert_eq!(ids(&listing.visible()), ["C", "A"]);

    listing.set_category(None);
    assert_eq!(listing.visible().len(), catalog.len());

    listing.set_sizes(["XL"]);
    listing.reset();
    assert_eq!(ids(&listing.visible()), ["A", "B", "C", "D", "E"]);
}
