//! Key-value persistence backends.
//!
//! The game only ever needs string keys mapped to string values, the same
//! shape as the browser's `localStorage`. Writes are fire-and-forget: a
//! failing backend logs and carries on.

use std::collections::BTreeMap;

/// A string key-value store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-memory store. Used natively and in tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-populated with the given pairs.
    pub fn with_entries<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: pairs
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Browser `localStorage`. Every call re-resolves the storage handle so a
/// page that revokes storage mid-session degrades to no-ops.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Default)]
pub struct LocalStorage;

#[cfg(target_arch = "wasm32")]
impl LocalStorage {
    fn handle() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

#[cfg(target_arch = "wasm32")]
impl KeyValueStore for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::handle()?.get_item(key).ok()?
    }

    fn set(&mut self, key: &str, value: &str) {
        match Self::handle() {
            Some(storage) => {
                if let Err(e) = storage.set_item(key, value) {
                    log::warn!("localStorage write failed ({key}): {e:?}");
                }
            }
            None => log::warn!("localStorage is unavailable, dropping write to {key}"),
        }
    }

    fn remove(&mut self, key: &str) {
        match Self::handle() {
            Some(storage) => {
                if let Err(e) = storage.remove_item(key) {
                    log::warn!("localStorage remove failed ({key}): {e:?}");
                }
            }
            None => log::warn!("localStorage is unavailable, dropping removal of {key}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_store_set_get_remove() {
        let mut store = MemoryStore::new();
        assert!(store.get("linesOfCode").is_none());
        store.set("linesOfCode", "42");
        assert_eq!(store.get("linesOfCode").as_deref(), Some("42"));
        store.set("linesOfCode", "43");
        assert_eq!(store.get("linesOfCode").as_deref(), Some("43"));
        assert_eq!(store.len(), 1);
        store.remove("linesOfCode");
        assert!(store.is_empty());
    }

    #[test]
    fn memory_store_with_entries() {
        let store = MemoryStore::with_entries([("theme", "light"), ("bestScore", "10")]);
        assert_eq!(store.get("theme").as_deref(), Some("light"));
        assert_eq!(store.get("bestScore").as_deref(), Some("10"));
    }
}
