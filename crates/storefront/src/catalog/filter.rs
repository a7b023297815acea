//! Catalog filtering and sorting for the product listing page.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use zapkart_core::Product;

/// Upper bound of the price slider, in rupees. Also the "no limit" value.
pub const DEFAULT_MAX_PRICE_INR: Decimal = Decimal::from_parts(100_000, 0, 0, false, 0);

/// Filters selected in the listing's filter bar.
///
/// A product is shown when every filter matches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    /// Case-insensitive substring of the product name.
    pub query: String,
    /// `None` shows every category.
    pub category: Option<String>,
    /// Maximum price in rupees, inclusive.
    pub max_price_inr: Decimal,
    /// Selected star thresholds; a product matches if it reaches any of them.
    pub min_ratings: Vec<Decimal>,
    /// Selected brands; products without a brand never match a selection.
    pub brands: Vec<String>,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            query: String::new(),
            category: None,
            max_price_inr: DEFAULT_MAX_PRICE_INR,
            min_ratings: Vec::new(),
            brands: Vec::new(),
        }
    }
}

impl ProductFilter {
    #[must_use]
    pub fn matches(&self, product: &Product) -> bool {
        let name = product
            .name
            .as_deref()
            .or(product.title.as_deref())
            .unwrap_or("");

        name.to_lowercase().contains(&self.query.to_lowercase())
            && self
                .category
                .as_ref()
                .is_none_or(|category| &product.category == category)
            && product.price_inr() <= self.max_price_inr
            && (self.min_ratings.is_empty()
                || self.min_ratings.iter().any(|r| product.rating >= *r))
            && (self.brands.is_empty()
                || self
                    .brands
                    .iter()
                    .any(|b| Some(b.as_str()) == product.brand.as_deref()))
    }

    /// Products that pass the filter, in catalog order.
    #[must_use]
    pub fn apply<'a>(&self, products: &'a [Product]) -> Vec<&'a Product> {
        products.iter().filter(|p| self.matches(p)).collect()
    }

    /// Whether any filter narrows the listing.
    #[must_use]
    pub fn has_active_filters(&self) -> bool {
        !self.query.is_empty()
            || self.category.is_some()
            || self.max_price_inr < DEFAULT_MAX_PRICE_INR
            || !self.min_ratings.is_empty()
            || !self.brands.is_empty()
    }

    /// Reset every filter.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Select `rating` if unselected, otherwise unselect it.
    pub fn toggle_rating(&mut self, rating: Decimal) {
        if let Some(index) = self.min_ratings.iter().position(|r| *r == rating) {
            self.min_ratings.remove(index);
        } else {
            self.min_ratings.push(rating);
        }
    }

    /// Select `brand` if unselected, otherwise unselect it.
    pub fn toggle_brand(&mut self, brand: &str) {
        if let Some(index) = self.brands.iter().position(|b| b == brand) {
            self.brands.remove(index);
        } else {
            self.brands.push(brand.to_string());
        }
    }
}

/// Sort order of the product listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    /// Catalog order.
    #[default]
    Featured,
    PriceAsc,
    PriceDesc,
    NameAsc,
    RatingDesc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Featured => "featured",
            Self::PriceAsc => "price-asc",
            Self::PriceDesc => "price-desc",
            Self::NameAsc => "name-asc",
            Self::RatingDesc => "rating-desc",
        }
    }

    /// Parse a sort key, falling back to `Featured` for anything unknown.
    #[must_use]
    pub fn parse_or_default(value: &str) -> Self {
        value.parse().unwrap_or_default()
    }

    /// Sort `products` in this order. Ties keep their relative order.
    #[must_use]
    pub fn sort(self, mut products: Vec<&Product>) -> Vec<&Product> {
        match self {
            Self::Featured => {}
            Self::PriceAsc => products.sort_by(|a, b| a.price.cmp(&b.price)),
            Self::PriceDesc => products.sort_by(|a, b| b.price.cmp(&a.price)),
            Self::NameAsc => products.sort_by(|a, b| compare_names(a, b)),
            Self::RatingDesc => products.sort_by(|a, b| b.rating.cmp(&a.rating)),
        }
        products
    }
}

fn compare_names(a: &Product, b: &Product) -> Ordering {
    let name = |p: &Product| {
        p.name
            .as_deref()
            .or(p.title.as_deref())
            .unwrap_or("")
            .to_lowercase()
    };
    name(a).cmp(&name(b))
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown sort key.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown sort order: {0}")]
pub struct ParseSortOrderError(String);

impl FromStr for SortOrder {
    type Err = ParseSortOrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "featured" => Ok(Self::Featured),
            "price-asc" => Ok(Self::PriceAsc),
            "price-desc" => Ok(Self::PriceDesc),
            "name-asc" => Ok(Self::NameAsc),
            "rating-desc" => Ok(Self::RatingDesc),
            other => Err(ParseSortOrderError(other.to_string())),
        }
    }
}
