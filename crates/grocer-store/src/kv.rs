//! Key-value store port with automatic serialization.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::StoreError;
use serde::{de::DeserializeOwned, Serialize};

/// A byte-oriented key-value store.
///
/// Every write replaces the whole value stored under a key. Implementations
/// must make `compare_and_swap` atomic with respect to other callers sharing
/// the same instance; that is the only primitive the versioned slots rely on.
pub trait KeyValueStore: Send + Sync {
    /// Read the bytes stored under `key`.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Overwrite the bytes stored under `key`.
    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError>;

    /// Remove `key`. Removing a missing key is not an error.
    fn delete(&self, key: &str) -> Result<(), StoreError>;

    /// Check if a key exists.
    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.get(key)?.is_some())
    }

    /// List all keys, sorted.
    fn keys(&self) -> Result<Vec<String>, StoreError>;

    /// Write `new` only if the current value equals `expected`
    /// (`None` meaning "key absent"). Returns whether the write happened.
    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        new: &[u8],
    ) -> Result<bool, StoreError>;
}

macro_rules! forward_store {
    ($($ty:ty),+) => {$(
        impl<S: KeyValueStore + ?Sized> KeyValueStore for $ty {
            fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
                (**self).get(key)
            }

            fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
                (**self).set(key, value)
            }

            fn delete(&self, key: &str) -> Result<(), StoreError> {
                (**self).delete(key)
            }

            fn exists(&self, key: &str) -> Result<bool, StoreError> {
                (**self).exists(key)
            }

            fn keys(&self) -> Result<Vec<String>, StoreError> {
                (**self).keys()
            }

            fn compare_and_swap(
                &self,
                key: &str,
                expected: Option<&[u8]>,
                new: &[u8],
            ) -> Result<bool, StoreError> {
                (**self).compare_and_swap(key, expected, new)
            }
        }
    )+};
}

forward_store!(&S, Arc<S>, Box<S>);

/// In-process store, mainly for tests and embedding.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, BTreeMap<String, Vec<u8>>>, StoreError> {
        self.entries
            .lock()
            .map_err(|_| StoreError::StoreError("memory store lock poisoned".to_string()))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.lock()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.lock()?.remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool, StoreError> {
        Ok(self.lock()?.contains_key(key))
    }

    fn keys(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.keys().cloned().collect())
    }

    fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&[u8]>,
        new: &[u8],
    ) -> Result<bool, StoreError> {
        let mut entries = self.lock()?;
        if entries.get(key).map(Vec::as_slice) != expected {
            return Ok(false);
        }
        entries.insert(key.to_string(), new.to_vec());
        Ok(true)
    }
}

/// Typed view over a [`KeyValueStore`].
///
/// Provides automatic JSON serialization for any type that implements
/// `Serialize` and `DeserializeOwned`.
///
/// # Example
///
/// ```rust,ignore
/// let store = Store::new(MemoryStore::new());
/// store.set("catalog:default:overlay", &document)?;
/// let document: Option<OverlayDocument> = store.get("catalog:default:overlay")?;
/// ```
#[derive(Debug, Clone)]
pub struct Store<S> {
    backend: S,
}

impl<S: KeyValueStore> Store<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    /// Borrow the underlying byte store.
    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Get a value from the store.
    ///
    /// Returns `None` if the key doesn't exist and [`StoreError::Serialize`]
    /// if it exists but holds something that does not decode as `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.backend.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a value in the store.
    pub fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.backend.set(key, &bytes)
    }

    /// Delete a value from the store.
    pub fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)
    }

    /// Check if a key exists in the store.
    pub fn exists(&self, key: &str) -> Result<bool, StoreError> {
        self.backend.exists(key)
    }

    /// Get all keys in the store.
    pub fn keys(&self) -> Result<Vec<String>, StoreError> {
        self.backend.keys()
    }
}

/// Helper to build slot keys with namespacing.
///
/// # Example
///
/// ```rust,ignore
/// let key = slot_key!("catalog", namespace, "overlay");
/// // Returns "catalog:default:overlay"
/// ```
#[macro_export]
macro_rules! slot_key {
    ($prefix:expr, $($part:expr),+) => {{
        let mut key = String::from($prefix);
        $(
            key.push(':');
            key.push_str(&$part.to_string());
        )+
        key
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Shelf {
        name: String,
        items: Vec<String>,
    }

    #[test]
    fn test_memory_get_set_delete() {
        let store = MemoryStore::new();
        assert_eq!(store.get("a").unwrap(), None);

        store.set("a", b"one").unwrap();
        assert_eq!(store.get("a").unwrap(), Some(b"one".to_vec()));
        assert!(store.exists("a").unwrap());

        store.delete("a").unwrap();
        assert!(!store.exists("a").unwrap());
        // Deleting again is fine
        store.delete("a").unwrap();
    }

    #[test]
    fn test_memory_compare_and_swap() {
        let store = MemoryStore::new();

        assert!(store.compare_and_swap("k", None, b"v1").unwrap());
        assert!(!store.compare_and_swap("k", None, b"v2").unwrap());
        assert!(!store.compare_and_swap("k", Some(&b"stale"[..]), b"v2").unwrap());
        assert!(store.compare_and_swap("k", Some(&b"v1"[..]), b"v2").unwrap());
        assert_eq!(store.get("k").unwrap(), Some(b"v2".to_vec()));
    }

    #[test]
    fn test_keys_sorted() {
        let store = MemoryStore::new();
        store.set("b", b"2").unwrap();
        store.set("a", b"1").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_typed_roundtrip() {
        let store = Store::new(MemoryStore::new());
        let shelf = Shelf {
            name: "pantry".to_string(),
            items: vec!["rice".to_string(), "dal".to_string()],
        };

        store.set("shelf", &shelf).unwrap();
        let loaded: Option<Shelf> = store.get("shelf").unwrap();
        assert_eq!(loaded, Some(shelf));
    }

    #[test]
    fn test_typed_get_reports_corrupt_value() {
        let store = Store::new(MemoryStore::new());
        store.backend().set("shelf", b"{not json").unwrap();

        let err = store.get::<Shelf>("shelf").unwrap_err();
        assert!(err.is_corrupt());
    }

    #[test]
    fn test_arc_shares_backend() {
        let shared = Arc::new(MemoryStore::new());
        let store = Store::new(Arc::clone(&shared));
        store.set("n", &5u32).unwrap();
        assert!(shared.exists("n").unwrap());
    }

    #[test]
    fn test_slot_key_macro() {
        let namespace = "default";
        assert_eq!(
            crate::slot_key!("catalog", namespace, "overlay"),
            "catalog:default:overlay"
        );
    }
}
