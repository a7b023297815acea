//! Product records and the snapshots stored in carts and favorites.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::ProductId;
use super::price::{original_price, usd_to_inr};

/// Label used when a product has neither a name nor a title.
pub const DEFAULT_PRODUCT_NAME: &str = "Product";

/// Placeholder image URL for products without an image.
#[must_use]
pub fn placeholder_image(id: &ProductId) -> String {
    format!("https://picsum.photos/seed/{id}/300/300.jpg")
}

/// A product record as served by the product API.
///
/// Everything except `id` is optional on the wire; missing fields take their
/// defaults instead of failing the whole catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: String,
    /// Selling price in USD.
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub rating: Decimal,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub thumbnail: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

impl Product {
    /// Name shown to shoppers: `name`, then `title`, then a generic label.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or(DEFAULT_PRODUCT_NAME)
    }

    /// Image shown to shoppers: `image`, then `thumbnail`, then a placeholder.
    #[must_use]
    pub fn display_image(&self) -> String {
        self.image
            .clone()
            .or_else(|| self.thumbnail.clone())
            .unwrap_or_else(|| placeholder_image(&self.id))
    }

    /// Selling price in whole rupees.
    #[must_use]
    pub fn price_inr(&self) -> Decimal {
        usd_to_inr(self.price)
    }

    /// Pre-discount price in whole rupees.
    #[must_use]
    pub fn original_price_inr(&self) -> Decimal {
        usd_to_inr(original_price(self.price, self.discount_percentage))
    }

    /// Copy the display fields into a snapshot.
    #[must_use]
    pub fn snapshot(&self) -> ProductSnapshot {
        ProductSnapshot::from(self)
    }
}

/// Display fields copied from a [`Product`] when it is added to the cart or
/// favorites. Later catalog changes do not affect stored snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSnapshot {
    pub id: ProductId,
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub price: Decimal,
    #[serde(default)]
    pub discount_percentage: Decimal,
    #[serde(default)]
    pub rating: Decimal,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: Option<String>,
    /// Empty when the stored entry predates image capture; see [`Self::image_url`].
    #[serde(default)]
    pub image: String,
}

fn default_name() -> String {
    DEFAULT_PRODUCT_NAME.to_string()
}

impl ProductSnapshot {
    /// Image URL, falling back to the placeholder.
    #[must_use]
    pub fn image_url(&self) -> String {
        if self.image.is_empty() {
            placeholder_image(&self.id)
        } else {
            self.image.clone()
        }
    }

    /// Case-insensitive substring match on the name. An empty query matches.
    #[must_use]
    pub fn name_matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

impl From<&Product> for ProductSnapshot {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id.clone(),
            name: product.display_name().to_string(),
            price: product.price,
            discount_percentage: product.discount_percentage,
            rating: product.rating,
            category: product.category.clone(),
            brand: product.brand.clone(),
            image: product.display_image(),
        }
    }
}
