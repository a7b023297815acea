//! Application state shared across the storefront.

use std::sync::Arc;

use tokio::runtime::Handle;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::error::{AppError, Result};
use crate::notifications::{Notifier, ToastDriver, ToastTimings};
use crate::storage::{FileStore, KeyValueStore};
use crate::store::Store;

/// Application state shared across the storefront.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the catalog client, local storage and toasts.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    storage: Arc<dyn KeyValueStore>,
    toasts: ToastDriver,
}

impl AppState {
    /// Create application state with an explicit storage backend.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `storage` - Backend for the cart and favorites
    /// * `runtime` - Runtime the toast timers run on
    #[must_use]
    pub fn new(
        config: StorefrontConfig,
        storage: Arc<dyn KeyValueStore>,
        runtime: Handle,
    ) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let toasts = ToastDriver::new(ToastTimings::default(), runtime);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
                toasts,
            }),
        }
    }

    /// Create application state backed by files in `config.storage_dir`,
    /// running toasts on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns an error if called outside a tokio runtime.
    pub fn from_config(config: StorefrontConfig) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| AppError::Internal(format!("no tokio runtime: {e}")))?;
        let storage = Arc::new(FileStore::new(config.storage_dir.clone()));

        Ok(Self::new(config, storage, runtime))
    }

    /// Open the shopper's cart and favorites, announcing changes as toasts.
    #[must_use]
    pub fn open_store(&self) -> Store {
        let notifier: Arc<dyn Notifier> = Arc::new(self.inner.toasts.clone());
        Store::open(Arc::clone(&self.inner.storage), notifier)
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the product catalog client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the toast driver.
    #[must_use]
    pub fn toasts(&self) -> &ToastDriver {
        &self.inner.toasts
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use zapkart_core::{NotificationKind, Product};

    use super::*;
    use crate::config::CatalogConfig;
    use crate::storage::{CART_KEY, MemoryStore};

    fn config() -> StorefrontConfig {
        StorefrontConfig {
            storage_dir: ".zapkart-test".into(),
            catalog: CatalogConfig::default(),
            sentry_dsn: None,
            sentry_environment: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_mutations_raise_toasts() {
        let storage = Arc::new(MemoryStore::new());
        let state = AppState::new(config(), storage.clone(), Handle::current());
        let mut store = state.open_store();

        let product: Product =
            serde_json::from_str(r#"{"id": 1, "title": "Lamp", "price": 20}"#).unwrap();
        store.add_to_cart(&product);

        tokio::time::sleep(Duration::from_millis(150)).await;
        let toast = state.toasts().state();
        assert!(toast.visible);
        assert_eq!(toast.kind, NotificationKind::Success);
        assert_eq!(toast.message.as_deref(), Some("\"Lamp\" added to cart"));
        assert!(storage.get(CART_KEY).unwrap().is_some());
    }

    #[tokio::test]
    async fn test_from_config_uses_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = config();
        config.storage_dir = dir.path().to_path_buf();

        let state = AppState::from_config(config).unwrap();
        let mut store = state.open_store();
        store.clear_cart();

        assert!(dir.path().join("zapkart-cart.json").exists());
        assert_eq!(state.config().storage_dir, dir.path());
    }

    #[test]
    fn test_from_config_outside_runtime_fails() {
        assert!(matches!(
            AppState::from_config(config()),
            Err(AppError::Internal(_))
        ));
    }
}
