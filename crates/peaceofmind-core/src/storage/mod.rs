mod config;
pub mod database;
pub mod keys;
mod memory;

pub use config::{BreathConfig, Config, WorryWindowDefaults};
pub use database::Database;
pub use memory::MemoryStore;

use std::path::PathBuf;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{Result, StorageError};

/// Returns the data directory holding `peaceofmind.db` and `config.toml`.
///
/// `PEACEOFMIND_DATA_DIR` wins when set. Otherwise `~/.config/peaceofmind/`,
/// or `~/.config/peaceofmind-dev/` when `PEACEOFMIND_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let dir = match std::env::var("PEACEOFMIND_DATA_DIR") {
        Ok(explicit) if !explicit.trim().is_empty() => PathBuf::from(explicit),
        _ => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");

            let env = std::env::var("PEACEOFMIND_ENV").unwrap_or_else(|_| "production".to_string());

            if env == "dev" {
                base_dir.join("peaceofmind-dev")
            } else {
                base_dir.join("peaceofmind")
            }
        }
    };

    std::fs::create_dir_all(&dir)
        .map_err(|e| StorageError::DataDir(format!("{}: {e}", dir.display())))?;
    Ok(dir)
}

/// Raw string key-value namespace.
///
/// Every persisted value in the application lives under a string key in one
/// shared namespace. Components never reach for a global; they are handed an
/// implementation of this trait.
pub trait KeyValueStore {
    /// Get the raw serialized value under `key`.
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the raw serialized value under `key`.
    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn kv_get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).kv_get(key)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).kv_set(key, value)
    }
}

/// Typed JSON access over a [`KeyValueStore`].
///
/// Reads never fail: a missing key, a stored `null`, a value of the wrong
/// shape or a backend read error all yield the caller's fallback.
#[derive(Debug, Clone)]
pub struct KeyedStore<S> {
    backend: S,
}

impl<S: KeyValueStore> KeyedStore<S> {
    pub fn new(backend: S) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Deserialized value under `key`, or `fallback`.
    pub fn get<T: DeserializeOwned>(&self, key: &str, fallback: T) -> T {
        let raw = match self.backend.kv_get(key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return fallback,
            Err(e) => {
                tracing::warn!(key, error = %e, "store read failed, using fallback");
                return fallback;
            }
        };

        let value: serde_json::Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value is not JSON, using fallback");
                return fallback;
            }
        };
        if value.is_null() {
            return fallback;
        }

        match serde_json::from_value(value) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(key, error = %e, "stored value has unexpected shape, using fallback");
                fallback
            }
        }
    }

    /// Serialize `value` and persist it under `key`.
    ///
    /// # Errors
    /// Returns an error if serialization or the backend write fails.
    pub fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.backend.kv_set(key, &raw)?;
        tracing::debug!(key, bytes = raw.len(), "stored value");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Pair {
        a: u32,
        b: String,
    }

    #[test]
    fn get_on_empty_store_returns_fallback_without_writing() {
        let mem = MemoryStore::new();
        let store = KeyedStore::new(&mem);
        for key in keys::ARCHIVE_KEYS {
            let got: Vec<u32> = store.get(key, vec![7]);
            assert_eq!(got, vec![7]);
        }
        assert_eq!(mem.writes(), 0);
    }

    #[test]
    fn stored_null_yields_fallback() {
        let mem = MemoryStore::new();
        mem.kv_set("k", "null").unwrap();
        let store = KeyedStore::new(&mem);
        assert_eq!(store.get("k", 3u32), 3);
    }

    #[test]
    fn corrupt_json_yields_fallback() {
        let mem = MemoryStore::new();
        mem.kv_set("k", "{not json").unwrap();
        let store = KeyedStore::new(&mem);
        assert_eq!(store.get("k", String::from("fallback")), "fallback");
    }

    #[test]
    fn type_mismatch_yields_fallback() {
        let mem = MemoryStore::new();
        mem.kv_set("k", "\"a string\"").unwrap();
        let store = KeyedStore::new(&mem);
        let got: Vec<Pair> = store.get("k", Vec::new());
        assert!(got.is_empty());
    }

    #[test]
    fn set_then_get_returns_equal_value() {
        let store = KeyedStore::new(MemoryStore::new());
        let value = Pair {
            a: 9,
            b: "nine".into(),
        };
        store.set("pair", &value).unwrap();
        let got: Option<Pair> = store.get("pair", None);
        assert_eq!(got, Some(value));
    }

    #[test]
    fn set_replaces_previous_value() {
        let store = KeyedStore::new(MemoryStore::new());
        store.set("n", &1u32).unwrap();
        store.set("n", &2u32).unwrap();
        assert_eq!(store.get("n", 0u32), 2);
    }
}
