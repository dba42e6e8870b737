//! Persistence seam for the cart.
//!
//! The cart is written as one serialized array under a fixed namespace key,
//! read once when the store is created and rewritten on every mutation.
//! Backends implement [`CartStorage`]; an in-memory slot serves ephemeral
//! sessions and tests, a JSON file on disk is the durable equivalent of the
//! browser's local storage slot.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use crate::store::CartLine;

/// Namespace key under which the serialized cart is stored.
pub const CART_NAMESPACE: &str = "tavola-cart";

/// Errors raised by a cart storage backend.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The stored payload could not be (de)serialized.
    #[error("cart serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The backing slot could not be read or written.
    #[error("cart storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A key-value slot holding the serialized cart.
pub trait CartStorage {
    /// Load the persisted cart, or an empty one when the slot is vacant.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the slot exists but cannot be read or
    /// parsed.
    fn load(&self) -> Result<Vec<CartLine>, StorageError>;

    /// Persist the full cart snapshot, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] when the slot cannot be written.
    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError>;
}

impl<T: CartStorage + ?Sized> CartStorage for &T {
    fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        (**self).load()
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        (**self).save(lines)
    }
}

/// In-memory slot, for tests and sessions that do not outlive the process.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: RefCell<Option<String>>,
}

impl MemoryStorage {
    /// Create an empty in-memory slot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CartStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        match self.slot.borrow().as_deref() {
            Some(raw) => Ok(serde_json::from_str(raw)?),
            None => Ok(Vec::new()),
        }
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(lines)?;
        *self.slot.borrow_mut() = Some(raw);
        Ok(())
    }
}

/// File-backed slot: the cart array as JSON at `<dir>/tavola-cart.json`.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    /// Create a file-backed slot inside `dir`.
    #[must_use]
    pub fn new(dir: &Path) -> Self {
        Self {
            path: dir.join(format!("{CART_NAMESPACE}.json")),
        }
    }

    /// The file the cart is stored in.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CartStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<CartLine>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, lines: &[CartLine]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(lines)?;
        std::fs::write(&self.path, raw)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::store::test_support::snapshot;

    #[test]
    fn test_memory_storage_round_trip() {
        let storage = MemoryStorage::new();
        assert!(storage.load().unwrap().is_empty());

        let lines = vec![CartLine {
            item: snapshot("Crispy Calamari", "14.99"),
            quantity: 2,
        }];
        storage.save(&lines).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, lines);
    }

    #[test]
    fn test_file_storage_missing_file_is_empty_cart() {
        let dir = std::env::temp_dir().join("tavola-cart-test-missing");
        std::fs::create_dir_all(&dir).unwrap();
        let storage = JsonFileStorage::new(&dir);
        let _ = std::fs::remove_file(storage.path());

        assert!(storage.load().unwrap().is_empty());
    }

    #[test]
    fn test_file_storage_round_trip() {
        let dir = std::env::temp_dir().join("tavola-cart-test-roundtrip");
        std::fs::create_dir_all(&dir).unwrap();
        let storage = JsonFileStorage::new(&dir);

        let lines = vec![
            CartLine {
                item: snapshot("Pan-Seared Salmon", "32.99"),
                quantity: 1,
            },
            CartLine {
                item: snapshot("Artisan Lemonade", "5.99"),
                quantity: 3,
            },
        ];
        storage.save(&lines).unwrap();

        let loaded = storage.load().unwrap();
        assert_eq!(loaded, lines);

        let _ = std::fs::remove_file(storage.path());
    }

    #[test]
    fn test_file_storage_corrupt_payload_errors() {
        let dir = std::env::temp_dir().join("tavola-cart-test-corrupt");
        std::fs::create_dir_all(&dir).unwrap();
        let storage = JsonFileStorage::new(&dir);
        std::fs::write(storage.path(), "not json").unwrap();

        assert!(matches!(
            storage.load(),
            Err(StorageError::Serialization(_))
        ));

        let _ = std::fs::remove_file(storage.path());
    }
}
