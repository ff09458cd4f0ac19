//! Durable key/value storage for client state.
//!
//! The cart and session stores persist every change immediately, one record
//! per key. Values are opaque strings: the cart and profile records are JSON,
//! the token record is the raw bearer token.
//!
//! Two backends are provided:
//! - [`FileStorage`] - one file per key under a data directory
//! - [`MemoryStorage`] - process-local map, for tests and embedding

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys for persisted records.
pub mod keys {
    /// JSON array of cart line items.
    pub const CART: &str = "cart";

    /// Plain bearer token string.
    pub const TOKEN: &str = "token";

    /// JSON object with the signed-in user's profile.
    pub const USER: &str = "user";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing file failed.
    #[error("storage I/O error for '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backend.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// The backend refused the operation.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// A string key/value store that survives restarts.
///
/// Implementations must be cheap to call synchronously: the stores write
/// through on every mutation before returning to the caller.
pub trait Storage: Send + Sync {
    /// Read a record. A missing key is `Ok(None)`, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Create or replace a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a record. Removing a missing key succeeds.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Outcome of reading a persisted record back at startup.
#[derive(Debug)]
pub enum Restored<T> {
    /// No record was stored.
    Absent,
    /// The record decoded cleanly.
    Present(T),
    /// The record exists but could not be read or decoded.
    Corrupt(String),
}

/// Read and decode a JSON record.
pub fn restore_json<T: DeserializeOwned>(storage: &dyn Storage, key: &str) -> Restored<T> {
    match storage.get(key) {
        Ok(None) => Restored::Absent,
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => Restored::Present(value),
            Err(e) => Restored::Corrupt(e.to_string()),
        },
        Err(e) => Restored::Corrupt(e.to_string()),
    }
}

/// Write a record, logging instead of failing.
///
/// Persistence is best-effort: a full disk must not turn a cart update into
/// an error for the shopper.
pub(crate) fn write_best_effort(storage: &dyn Storage, key: &str, value: &str) {
    if let Err(e) = storage.set(key, value) {
        tracing::warn!(key, error = %e, "Failed to persist record");
    }
}

/// Delete a record, logging instead of failing.
pub(crate) fn remove_best_effort(storage: &dyn Storage, key: &str) {
    if let Err(e) = storage.remove(key) {
        tracing::warn!(key, error = %e, "Failed to remove persisted record");
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Storage, StorageError};

    /// A backend whose every operation fails, like a browser with storage
    /// disabled or over quota.
    pub struct BrokenStorage;

    impl Storage for BrokenStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }

        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("quota exceeded".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("disabled".to_string()))
        }
    }
}
