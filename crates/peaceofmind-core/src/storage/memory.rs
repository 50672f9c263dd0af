//! In-memory key-value namespace for tests and ephemeral sessions.

use std::collections::HashMap;
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::StorageError;

#[derive(Debug, Default)]
struct Inner {
    values: HashMap<String, String>,
    writes: usize,
}

/// HashMap-backed [`KeyValueStore`] that counts writes.
#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `kv_set` calls made so far.
    pub fn writes(&self) -> usize {
        self.inner.lock().map(|inner| inner.writes).unwrap_or(0)
    }

    /// Raw stored text under `key`, if any.
    pub fn raw(&self, key: &str) -> Option<String> {
        self.inner
            .lock()
            .ok()
            .and_then(|inner| inner.values.get(key).cloned())
    }
}

impl KeyValueStore for MemoryStore {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let inner = self.inner.lock().map_err(|_| StorageError::Locked)?;
        Ok(inner.values.get(key).cloned())
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().map_err(|_| StorageError::Locked)?;
        inner.values.insert(key.to_string(), value.to_string());
        inner.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_every_write() {
        let mem = MemoryStore::new();
        mem.kv_set("a", "1").unwrap();
        mem.kv_set("a", "2").unwrap();
        assert_eq!(mem.writes(), 2);
        assert_eq!(mem.raw("a").as_deref(), Some("2"));
        assert!(mem.kv_get("b").unwrap().is_none());
    }
}
