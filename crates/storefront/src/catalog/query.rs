//! Product listing derivation: filtering and sorting the catalog.
//!
//! Filtering is pure. The same catalog and query always yield the same
//! sequence of products.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::{Catalog, Product};

/// Listing sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortKey {
    PriceAsc,
    PriceDesc,
    NameAsc,
    NameDesc,
}

impl SortKey {
    /// Query-string form of the key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::NameDesc => "name-desc",
        }
    }

    fn compare(self, a: &Product, b: &Product) -> Ordering {
        match self {
            Self::PriceAsc => a.price.cmp(&b.price),
            Self::PriceDesc => b.price.cmp(&a.price),
            Self::NameAsc => compare_names(&a.name, &b.name),
            Self::NameDesc => compare_names(&b.name, &a.name),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned for an unrecognized sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key: {0}")]
pub struct UnknownSortKey(pub String);

impl FromStr for SortKey {
    type Err = UnknownSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            // "name" is the legacy spelling used by older listing links
            "name" | "name-asc" => Ok(Self::NameAsc),
            "name-desc" => Ok(Self::NameDesc),
            _ => Err(UnknownSortKey(s.to_string())),
        }
    }
}

/// Case-insensitive name order, falling back to the raw bytes on ties.
fn compare_names(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Inclusive list-price range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: Decimal,
    pub max: Decimal,
}

impl PriceRange {
    /// A range that admits every price.
    pub const ANY: Self = Self {
        min: Decimal::ZERO,
        max: Decimal::MAX,
    };

    /// Build a range. Bounds given in the wrong order are swapped.
    #[must_use]
    pub fn new(min: Decimal, max: Decimal) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    /// Whether `price` lies within the range, bounds included.
    #[must_use]
    pub fn contains(&self, price: Decimal) -> bool {
        self.min <= price && price <= self.max
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self::ANY
    }
}

/// Filter and sort specification for a product listing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductQuery {
    pub category: Option<String>,
    pub sizes: BTreeSet<String>,
    pub colors: BTreeSet<String>,
    pub price_range: PriceRange,
    pub sort: Option<SortKey>,
}

impl ProductQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    #[must_use]
    pub fn size(mut self, size: impl Into<String>) -> Self {
        self.sizes.insert(size.into());
        self
    }

    #[must_use]
    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.colors.insert(color.into());
        self
    }

    #[must_use]
    pub const fn price_range(mut self, range: PriceRange) -> Self {
        self.price_range = range;
        self
    }

    #[must_use]
    pub const fn sort(mut self, sort: SortKey) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Whether a product passes every filter in the query.
    ///
    /// Within the size set (and within the color set) one available match is
    /// enough; a product must pass both the size and the color filter.
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        if let Some(category) = &self.category
            && &product.category != category
        {
            return false;
        }

        if !self.sizes.is_empty()
            && !product
                .sizes
                .iter()
                .any(|s| s.available && self.sizes.contains(&s.value))
        {
            return false;
        }

        if !self.colors.is_empty()
            && !product
                .colors
                .iter()
                .any(|c| c.available && self.colors.contains(&c.name))
        {
            return false;
        }

        self.price_range.contains(product.price)
    }

    /// Apply the query to a catalog.
    #[must_use]
    pub fn apply<'a>(&self, catalog: &'a Catalog) -> Vec<&'a Product> {
        filter_products(catalog.products(), self)
    }
}

/// Filter then stably sort `products` according to `query`.
///
/// Without a sort key the result keeps the input order.
#[instrument(level = "trace", skip(products), fields(candidates = products.len()))]
#[must_use]
pub fn filter_products<'a>(products: &'a [Product], query: &ProductQuery) -> Vec<&'a Product> {
    let mut visible: Vec<&Product> = products.iter().filter(|p| query.matches(p)).collect();
    if let Some(sort) = query.sort {
        // sort_by is stable, equal keys keep catalog order
        visible.sort_by(|a, b| sort.compare(a, b));
    }
    visible
}

/// State behind the product listing screen.
///
/// Every setter only changes the query; [`ProductListing::visible`] always
/// derives the list from the full catalog, so a sort change can never act on
/// a stale filter result.
#[derive(Debug, Clone)]
pub struct ProductListing<'a> {
    catalog: &'a Catalog,
    query: ProductQuery,
}

impl<'a> ProductListing<'a> {
    /// A listing showing the whole catalog in catalog order.
    #[must_use]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self {
            catalog,
            query: ProductQuery::default(),
        }
    }

    /// The current query.
    #[must_use]
    pub const fn query(&self) -> &ProductQuery {
        &self.query
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.query.category = category;
    }

    pub const fn set_sort(&mut self, sort: Option<SortKey>) {
        self.query.sort = sort;
    }

    pub fn set_sizes<I, S>(&mut self, sizes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.sizes = sizes.into_iter().map(Into::into).collect();
    }

    pub fn set_colors<I, S>(&mut self, colors: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.query.colors = colors.into_iter().map(Into::into).collect();
    }

    pub const fn set_price_range(&mut self, range: PriceRange) {
        self.query.price_range = range;
    }

    /// Clear category, filters and sort.
    pub fn reset(&mut self) {
        self.query = ProductQuery::default();
    }

    /// Products currently visible.
    #[must_use]
    pub fn visible(&self) -> Vec<&'a Product> {
        self.query.apply(self.catalog)
    }
}
