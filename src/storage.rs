//! Namespaced key-value storage port.
//!
//! History, the feedback log and UI preferences all persist through this
//! trait as JSON strings. `Database` is the durable implementation;
//! `MemoryStore` backs tests and ephemeral sessions.

use std::{
    collections::HashMap,
    sync::{Mutex, PoisonError},
};

use anyhow::{Context, Result};
use serde::{de::DeserializeOwned, Serialize};

pub trait KeyValueStore: Send + Sync {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>>;
    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()>;
    fn remove(&self, namespace: &str, key: &str) -> Result<()>;
}

/// Reads and decodes a JSON value. Returns `Ok(None)` when the key is absent.
pub fn get_json<T: DeserializeOwned>(
    store: &dyn KeyValueStore,
    namespace: &str,
    key: &str,
) -> Result<Option<T>> {
    match store.get(namespace, key)? {
        Some(raw) => {
            let value = serde_json::from_str(&raw)
                .with_context(|| format!("failed to decode {namespace}/{key}"))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

pub fn set_json<T: Serialize + ?Sized>(
    store: &dyn KeyValueStore,
    namespace: &str,
    key: &str,
    value: &T,
) -> Result<()> {
    let serialized = serde_json::to_string(value)
        .with_context(|| format!("failed to encode {namespace}/{key}"))?;
    store.set(namespace, key, &serialized)
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<(String, String), String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, namespace: &str, key: &str) -> Result<Option<String>> {
        let guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard
            .get(&(namespace.to_string(), key.to_string()))
            .cloned())
    }

    fn set(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.insert((namespace.to_string(), key.to_string()), value.to_string());
        Ok(())
    }

    fn remove(&self, namespace: &str, key: &str) -> Result<()> {
        let mut guard = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        guard.remove(&(namespace.to_string(), key.to_string()));
        Ok(())
    }
}
