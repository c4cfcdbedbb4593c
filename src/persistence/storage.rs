//! Key-value storage backends
//!
//! LocalStorage in the browser, an in-memory map everywhere else.

use std::collections::HashMap;

/// String key-value store. Failures are reported as `false`/`None`, never panics.
pub trait StorageBackend {
    fn get_item(&self, key: &str) -> Option<String>;

    /// Returns false if the write was rejected (quota, privacy mode, ...)
    fn set_item(&mut self, key: &str, value: &str) -> bool;
}

/// Process-local storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get(key).cloned()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        self.items.insert(key.to_string(), value.to_string());
        true
    }
}

/// Browser LocalStorage
#[cfg(target_arch = "wasm32")]
pub struct LocalStorage {
    storage: Option<web_sys::Storage>,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    pub fn new() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();
        if storage.is_none() {
            log::warn!("LocalStorage unavailable - progress will not persist");
        }
        Self { storage }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for LocalStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(target_arch = "wasm32")]
impl StorageBackend for LocalStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set_item(&mut self, key: &str, value: &str) -> bool {
        match &self.storage {
            Some(storage) => storage.set_item(key, value).is_ok(),
            None => false,
        }
    }
}

/// Platform default backend
#[cfg(target_arch = "wasm32")]
pub fn default_backend() -> LocalStorage {
    LocalStorage::new()
}

/// Platform default backend
#[cfg(not(target_arch = "wasm32"))]
pub fn default_backend() -> MemoryStorage {
    MemoryStorage::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get_item("k"), None);
        assert!(storage.set_item("k", "v"));
        assert_eq!(storage.get_item("k").as_deref(), Some("v"));
    }
}
