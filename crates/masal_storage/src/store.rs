//! Key-value store trait.

use masal_error::MasalResult;
use std::sync::Arc;

/// String-keyed persistent storage.
///
/// Absent keys read as `None`. Implementations need not make
/// read-modify-write sequences atomic.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> MasalResult<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> MasalResult<()>;

    /// Delete `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> MasalResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Arc<S> {
    fn get(&self, key: &str) -> MasalResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> MasalResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> MasalResult<()> {
        (**self).remove(key)
    }
}
