//! Local key-value storage for the cart and favorites.
//!
//! # Architecture
//!
//! - [`KeyValueStore`] is the seam: string keys, string values, nothing else
//! - [`FileStore`] keeps one JSON file per key in a directory
//! - [`MemoryStore`] keeps values in memory (tests, throwaway sessions)
//!
//! # Persistence policy
//!
//! Persistence is best-effort. [`load_collection`] turns missing or corrupt
//! data into an empty collection and [`save_collection`] logs write failures
//! instead of returning them. The in-memory state owned by the caller stays
//! authoritative for the session either way.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Storage key holding the serialized cart.
pub const CART_KEY: &str = "zapkart-cart";

/// Storage key holding the serialized favorites.
pub const FAVORITES_KEY: &str = "zapkart-favorites";

/// Errors that can occur when reading or writing local storage.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error for key {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Stored value is not valid JSON for the expected type.
    #[error("Corrupt value for key {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized.
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Write would exceed the storage quota.
    #[error("Quota exceeded writing {key} ({needed} bytes, {available} available)")]
    QuotaExceeded {
        key: String,
        needed: usize,
        available: usize,
    },

    /// Key contains characters the backend cannot store.
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),
}

/// Opaque string key-value storage.
///
/// Implementations must be safe to share between threads; callers treat
/// every method as synchronous and cheap.
pub trait KeyValueStore: Send + Sync {
    /// Read the value under `key`, `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to write or is full.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete the value under `key`. Deleting an absent key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to delete.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and deserialize a JSON collection.
///
/// # Errors
///
/// Returns an error if the backend fails or the stored JSON does not match `T`.
pub fn read_collection<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    key: &str,
) -> Result<Option<Vec<T>>, StorageError> {
    let Some(raw) = store.get(key)? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_string(),
            source,
        })
}

/// Serialize a collection and overwrite `key` with it.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_collection<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> Result<(), StorageError> {
    let json = serde_json::to_string(items)?;
    store.set(key, &json)
}

/// Load a collection, falling back to empty on any failure.
///
/// Never fails: a missing key is silent, a read or parse failure is logged.
pub fn load_collection<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Vec<T> {
    match read_collection(store, key) {
        Ok(Some(items)) => {
            debug!(key, count = items.len(), "Restored collection from storage");
            items
        }
        Ok(None) => Vec::new(),
        Err(e) => {
            warn!(key, error = %e, "Failed to read storage, starting empty");
            Vec::new()
        }
    }
}

/// Persist a collection, logging instead of returning failures.
///
/// Returns whether the write succeeded so callers can record it if they care.
pub fn save_collection<T: Serialize>(store: &dyn KeyValueStore, key: &str, items: &[T]) -> bool {
    match write_collection(store, key, items) {
        Ok(()) => true,
        Err(e) => {
            error!(key, error = %e, "Failed to write storage, keeping in-memory state");
            false
        }
    }
}
