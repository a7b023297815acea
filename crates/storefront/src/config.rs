//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `ZAPKART_STORAGE_DIR` - Directory backing local storage (default: .zapkart)
//! - `ZAPKART_CATALOG_URL` - Product API base URL (default: <https://dummyjson.com>)
//! - `ZAPKART_CATALOG_LIMIT` - Products requested per load (default: 100, max 1000)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::path::PathBuf;

use thiserror::Error;
use url::Url;

const DEFAULT_STORAGE_DIR: &str = ".zapkart";
const DEFAULT_CATALOG_URL: &str = "https://dummyjson.com";
const DEFAULT_CATALOG_LIMIT: u32 = 100;
const MAX_CATALOG_LIMIT: u32 = 1000;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront application configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Directory holding the cart and favorites storage files
    pub storage_dir: PathBuf,
    /// Product catalog API configuration
    pub catalog: CatalogConfig,
    /// Sentry DSN for error tracking
    pub sentry_dsn: Option<String>,
    /// Sentry environment name (e.g., production, staging)
    pub sentry_environment: Option<String>,
}

/// Product catalog API configuration.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Base URL of the product API
    pub base_url: Url,
    /// Number of products requested per load
    pub limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_CATALOG_URL)
                .expect("default catalog URL is a valid absolute URL"),
            limit: DEFAULT_CATALOG_LIMIT,
        }
    }
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is present but invalid. Every
    /// variable has a default, so an empty environment always loads.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let storage_dir = PathBuf::from(get_env_or_default(
            "ZAPKART_STORAGE_DIR",
            DEFAULT_STORAGE_DIR,
        ));
        let catalog = CatalogConfig::from_env()?;

        Ok(Self {
            storage_dir,
            catalog,
            sentry_dsn: get_optional_env("SENTRY_DSN"),
            sentry_environment: get_optional_env("SENTRY_ENVIRONMENT"),
        })
    }
}

impl CatalogConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let base_url = parse_catalog_url(&get_env_or_default(
            "ZAPKART_CATALOG_URL",
            DEFAULT_CATALOG_URL,
        ))?;
        let limit = parse_catalog_limit(&get_env_or_default(
            "ZAPKART_CATALOG_LIMIT",
            &DEFAULT_CATALOG_LIMIT.to_string(),
        ))?;

        Ok(Self { base_url, limit })
    }

    /// Full URL of the products listing endpoint.
    #[must_use]
    pub fn products_url(&self) -> String {
        format!(
            "{}/products?limit={}",
            self.base_url.as_str().trim_end_matches('/'),
            self.limit
        )
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse the catalog base URL, accepting only http(s).
fn parse_catalog_url(value: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidEnvVar("ZAPKART_CATALOG_URL".to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            "ZAPKART_CATALOG_URL".to_string(),
            format!("unsupported scheme '{}'", url.scheme()),
        ));
    }

    Ok(url)
}

/// Parse the catalog page size, which must be in `1..=MAX_CATALOG_LIMIT`.
fn parse_catalog_limit(value: &str) -> Result<u32, ConfigError> {
    let limit = value.parse::<u32>().map_err(|e| {
        ConfigError::InvalidEnvVar("ZAPKART_CATALOG_LIMIT".to_string(), e.to_string())
    })?;

    if limit == 0 || limit > MAX_CATALOG_LIMIT {
        return Err(ConfigError::InvalidEnvVar(
            "ZAPKART_CATALOG_LIMIT".to_string(),
            format!("must be between 1 and {MAX_CATALOG_LIMIT} (got {limit})"),
        ));
    }

    Ok(limit)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_catalog_url_valid() {
        let url = parse_catalog_url("https://dummyjson.com").unwrap();
        assert_eq!(url.host_str(), Some("dummyjson.com"));
    }

    #[test]
    fn test_parse_catalog_url_rejects_other_schemes() {
        let result = parse_catalog_url("ftp://dummyjson.com");
        assert!(matches!(result, Err(ConfigError::InvalidEnvVar(_, _))));
    }

    #[test]
    fn test_parse_catalog_url_rejects_garbage() {
        assert!(parse_catalog_url("not a url").is_err());
    }

    #[test]
    fn test_parse_catalog_limit() {
        assert_eq!(parse_catalog_limit("100").unwrap(), 100);
        assert_eq!(parse_catalog_limit("1000").unwrap(), 1000);
        assert!(parse_catalog_limit("0").is_err());
        assert!(parse_catalog_limit("1001").is_err());
        assert!(parse_catalog_limit("-5").is_err());
        assert!(parse_catalog_limit("lots").is_err());
    }

    #[test]
    fn test_products_url() {
        let config = CatalogConfig::default();
        assert_eq!(
            config.products_url(),
            "https://dummyjson.com/products?limit=100"
        );

        let config = CatalogConfig {
            base_url: Url::parse("http://127.0.0.1:8080/api/").unwrap(),
            limit: 20,
        };
        assert_eq!(
            config.products_url(),
            "http://127.0.0.1:8080/api/products?limit=20"
        );
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::InvalidEnvVar("ZAPKART_CATALOG_LIMIT".to_string(), "bad".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid environment variable ZAPKART_CATALOG_LIMIT: bad"
        );
    }
}
