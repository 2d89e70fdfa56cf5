//! In-memory store.

use crate::KeyValueStore;
use masal_error::{MasalResult, StorageError, StorageErrorKind};
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

/// Key-value store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    data: Mutex<HashMap<String, String>>,
}

impl InMemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.data.lock().map(|d| d.len()).unwrap_or(0)
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MasalResult<MutexGuard<'_, HashMap<String, String>>> {
        self.data.lock().map_err(|e| {
            StorageError::new(StorageErrorKind::LockPoisoned(e.to_string())).into()
        })
    }
}

impl KeyValueStore for InMemoryStore {
    fn get(&self, key: &str) -> MasalResult<Option<String>> {
        Ok(self.lock()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> MasalResult<()> {
        self.lock()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> MasalResult<()> {
        self.lock()?.remove(key);
        Ok(())
    }
}
