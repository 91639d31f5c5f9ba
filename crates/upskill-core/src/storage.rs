//! Durable client-side key/value persistence.

use crate::error::UpskillResult;

/// Synchronous string key/value storage, the local analogue of
/// browser storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> UpskillResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> UpskillResult<()>;
    /// Removing an absent key is not an error.
    fn remove(&self, key: &str) -> UpskillResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> UpskillResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> UpskillResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> UpskillResult<()> {
        (**self).remove(key)
    }
}
