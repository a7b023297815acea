//! Product catalog client.
//!
//! # Architecture
//!
//! - Plain JSON over `reqwest`; the product API is the source of truth
//! - In-memory caching via `moka` for successful loads (5 minute TTL)
//! - Any failure falls back to a generated sample catalog so browsing
//!   keeps working offline
//!
//! # Example
//!
//! ```rust,ignore
//! let client = CatalogClient::new(&config.catalog);
//! let catalog = client.load().await;
//!
//! let mut filter = ProductFilter::default();
//! filter.query = "phone".to_string();
//! let visible = SortOrder::PriceAsc.sort(filter.apply(&catalog.products));
//! ```

mod filter;
mod sample;

pub use filter::{DEFAULT_MAX_PRICE_INR, ParseSortOrderError, ProductFilter, SortOrder};
pub use sample::{SAMPLE_CATALOG_SIZE, sample_products};

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, instrument, warn};
use zapkart_core::Product;

use crate::config::CatalogConfig;

/// Shown alongside the sample catalog when the product API is unavailable.
pub const SAMPLE_NOTICE: &str = "Could not load products from server. Showing sample data.";

/// Errors that can occur when fetching the product catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Product API answered with a non-success status.
    #[error("API status: {0}")]
    Status(u16),

    /// Response body was not a product listing.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Product API returned no products.
    #[error("No products found.")]
    Empty,
}

/// Where a loaded catalog came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogSource {
    /// Fetched from the product API (possibly from cache).
    Api,
    /// Generated locally after the API failed.
    Sample,
}

/// A loaded product catalog.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub products: Arc<Vec<Product>>,
    pub source: CatalogSource,
}

impl Catalog {
    /// Notice to show shoppers, if the catalog is not live data.
    #[must_use]
    pub const fn notice(&self) -> Option<&'static str> {
        match self.source {
            CatalogSource::Api => None,
            CatalogSource::Sample => Some(SAMPLE_NOTICE),
        }
    }

    /// Distinct categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> Vec<&str> {
        categories(&self.products)
    }

    /// Distinct brands in first-seen order.
    #[must_use]
    pub fn brands(&self) -> Vec<&str> {
        brands(&self.products)
    }
}

/// Distinct categories of `products` in first-seen order.
#[must_use]
pub fn categories(products: &[Product]) -> Vec<&str> {
    let mut seen = Vec::new();
    for product in products {
        if !seen.contains(&product.category.as_str()) {
            seen.push(product.category.as_str());
        }
    }
    seen
}

/// Distinct brands of `products` in first-seen order. Brandless products
/// are skipped.
#[must_use]
pub fn brands(products: &[Product]) -> Vec<&str> {
    let mut seen = Vec::new();
    for brand in products.iter().filter_map(|p| p.brand.as_deref()) {
        if !seen.contains(&brand) {
            seen.push(brand);
        }
    }
    seen
}

#[derive(Debug, Deserialize)]
struct ProductListing {
    #[serde(default)]
    products: Vec<Product>,
}

/// Parse a product listing body (`{ "products": [...] }`).
///
/// # Errors
///
/// Returns `CatalogError::Parse` for malformed JSON and `CatalogError::Empty`
/// when the listing has no products.
pub fn parse_listing(body: &str) -> Result<Vec<Product>, CatalogError> {
    let listing: ProductListing = serde_json::from_str(body)?;
    if listing.products.is_empty() {
        return Err(CatalogError::Empty);
    }
    Ok(listing.products)
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the product API.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    products_url: String,
    cache: Cache<String, Arc<Vec<Product>>>,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(16)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_default();

        Self {
            inner: Arc::new(CatalogClientInner {
                client,
                products_url: config.products_url(),
                cache,
            }),
        }
    }

    /// URL the client loads products from.
    #[must_use]
    pub fn products_url(&self) -> &str {
        &self.inner.products_url
    }

    /// Fetch the product listing, bypassing the cache.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, non-success status, malformed
    /// body, or an empty listing.
    #[instrument(skip(self), fields(url = %self.inner.products_url))]
    pub async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        let response = self
            .inner
            .client
            .get(&self.inner.products_url)
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let body = response.text().await?;
        let products = parse_listing(&body).inspect_err(|e| {
            if matches!(e, CatalogError::Parse(_)) {
                tracing::error!(
                    error = %e,
                    body = %body.chars().take(500).collect::<String>(),
                    "Failed to parse product listing"
                );
            }
        })?;

        debug!(count = products.len(), "Fetched products");
        Ok(products)
    }

    /// Load the catalog, falling back to sample data on any failure.
    ///
    /// Successful fetches are cached; sample catalogs are not, so the next
    /// load retries the API.
    #[instrument(skip(self))]
    pub async fn load(&self) -> Catalog {
        let cache_key = self.inner.products_url.clone();

        if let Some(products) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product listing");
            return Catalog {
                products,
                source: CatalogSource::Api,
            };
        }

        match self.fetch_products().await {
            Ok(products) => {
                let products = Arc::new(products);
                self.inner
                    .cache
                    .insert(cache_key, Arc::clone(&products))
                    .await;
                Catalog {
                    products,
                    source: CatalogSource::Api,
                }
            }
            Err(e) => {
                warn!(error = %e, "Using sample catalog");
                Catalog {
                    products: Arc::new(sample_products()),
                    source: CatalogSource::Sample,
                }
            }
        }
    }

    /// Drop the cached listing so the next load hits the API.
    pub async fn invalidate(&self) {
        self.inner.cache.invalidate(&self.inner.products_url).await;
    }
}
