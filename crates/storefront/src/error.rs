//! Unified error handling with Sentry integration.
//!
//! Each subsystem owns its error type. `AppError` covers what can abort
//! startup. Storage and catalog failures never reach it: the store logs and
//! swallows write errors, and the catalog falls back to sample data.

use thiserror::Error;

use crate::config::ConfigError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Report this error to Sentry and the log, returning the Sentry event id.
    pub fn capture(&self) -> sentry::types::Uuid {
        let event_id = sentry::capture_error(self);
        tracing::error!(
            error = %self,
            sentry_event_id = %event_id,
            "Storefront error"
        );
        event_id
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for user actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of user actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "123")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_error_display() {
        let err = AppError::Internal("boom".to_string());
        assert_eq!(err.to_string(), "Internal error: boom");

        let err = AppError::from(ConfigError::InvalidEnvVar(
            "ZAPKART_CATALOG_LIMIT".to_string(),
            "must be between 1 and 1000".to_string(),
        ));
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().starts_with("Config error: "));
        assert!(err.to_string().contains("ZAPKART_CATALOG_LIMIT"));
    }

    #[test]
    fn test_breadcrumb_without_client_is_harmless() {
        add_breadcrumb("cart", "Added to cart", Some(&[("product_id", "1")]));
        add_breadcrumb("cart", "Cleared", None);
    }
}
