//! In-memory key-value store.

use std::collections::BTreeMap;
use std::sync::Mutex;

use tracing::debug;

use crate::domain::ports::{KeyValueStore, StorageError};

/// Mutex-guarded map implementing [`KeyValueStore`].
///
/// Nothing survives the process; use it for tests and embedded callers that
/// do not need durability.
#[derive(Debug, Default)]
pub struct InMemoryKeyValueStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl InMemoryKeyValueStore {
    /// Create a store pre-populated with `entries`.
    ///
    /// # Examples
    /// ```
    /// use portal::domain::ports::KeyValueStore;
    /// use portal::outbound::InMemoryKeyValueStore;
    ///
    /// let store = InMemoryKeyValueStore::with_entries([("user", "{}")]);
    /// assert_eq!(store.get("user").unwrap().as_deref(), Some("{}"));
    /// ```
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self {
            entries: Mutex::new(entries),
        }
    }

    /// Keys currently stored, in sorted order.
    pub fn keys(&self) -> Result<Vec<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::poisoned())?;
        Ok(entries.keys().cloned().collect())
    }
}

impl KeyValueStore for InMemoryKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.lock().map_err(|_| StorageError::poisoned())?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::poisoned())?;
        entries.insert(key.to_owned(), value.to_owned());
        debug!(key, bytes = value.len(), "slot written");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.lock().map_err(|_| StorageError::poisoned())?;
        if entries.remove(key).is_some() {
            debug!(key, "slot removed");
        }
        Ok(())
    }
}
