//! Key-value storage backing the site.
//!
//! # Scopes
//!
//! - Durable storage (one per origin) holds the user registry, the active
//!   session and the tip list. [`FileStorage`] keeps it in a JSON file.
//! - Ephemeral storage (one per tab) holds the purchase-entry flag.
//!   [`MemoryStorage`] lives as long as the page state.
//!
//! # Keys
//!
//! See [`keys`]. Values are JSON documents written by the stores in
//! `services`.
//!
//! All calls are synchronous. Stores catch [`StorageError`] at their own
//! boundary; it never reaches page code.

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Storage keys used by the site.
pub mod keys {
    /// Durable: ordered list of user records.
    pub const USERS: &str = "mv_users";

    /// Durable: the active session record.
    pub const SESSION: &str = "mv_session";

    /// Durable: ordered list of travel tips, newest first.
    pub const TIPS: &str = "mv_tips";

    /// Ephemeral: set by a "buy" action, consumed by the confirmation page.
    pub const PURCHASE_ENTRY: &str = "mvPurchaseEntry";
}

/// Errors raised by a storage backend.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Storage is disabled or cannot be reached.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// A write would exceed the storage quota.
    #[error("storage quota of {limit} bytes exceeded")]
    QuotaExceeded {
        /// Quota in bytes.
        limit: usize,
    },

    /// Underlying file operation failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored value is not valid JSON for the expected type.
    #[error("corrupt value under {key}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Value could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A string key-value store with browser storage semantics.
///
/// Implementations must be safe to share between the tasks of one page.
pub trait Storage: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Store `value` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend rejects the write.
    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove `key`. Removing a missing key is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Read and decode a JSON value.
///
/// # Errors
///
/// Returns `StorageError::Corrupt` when the stored text does not decode, or
/// the backend error when the read fails.
pub fn read_json<T: DeserializeOwned>(
    storage: &dyn Storage,
    key: &str,
) -> Result<Option<T>, StorageError> {
    let Some(raw) = storage.get_item(key)? else {
        return Ok(None);
    };
    if raw.trim().is_empty() {
        return Ok(None);
    }
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StorageError::Corrupt {
            key: key.to_owned(),
            source,
        })
}

/// Encode a value as JSON and store it.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_json<T: Serialize + ?Sized>(
    storage: &dyn Storage,
    key: &str,
    value: &T,
) -> Result<(), StorageError> {
    let raw = serde_json::to_string(value)?;
    storage.set_item(key, &raw)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_read_json_missing_and_blank() {
        let storage = MemoryStorage::new();
        assert_eq!(read_json::<Vec<u8>>(&storage, "k").unwrap(), None);

        storage.set_item("k", "  ").unwrap();
        assert_eq!(read_json::<Vec<u8>>(&storage, "k").unwrap(), None);
    }

    #[test]
    fn test_read_json_corrupt() {
        let storage = MemoryStorage::new();
        storage.set_item("k", "{not json").unwrap();
        let err = read_json::<Vec<u8>>(&storage, "k").unwrap_err();
        assert!(matches!(err, StorageError::Corrupt { ref key, .. } if key == "k"));
    }

    #[test]
    fn test_write_then_read_json() {
        let storage = MemoryStorage::new();
        write_json(&storage, "k", &[1_u8, 2, 3]).unwrap();
        assert_eq!(storage.get_item("k").unwrap().as_deref(), Some("[1,2,3]"));
        assert_eq!(read_json::<Vec<u8>>(&storage, "k").unwrap(), Some(vec![1, 2, 3]));
    }
}
