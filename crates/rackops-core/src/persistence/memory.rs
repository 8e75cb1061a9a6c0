//! In-memory key/value store, the swappable fake for tests.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::persistence::{KeyValueStore, errors::PersistenceError};

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        let entries = self.entries.lock().expect("memory store lock poisoned");
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().expect("memory store lock poisoned");
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_round_trip() {
        let store = MemoryStore::new();
        assert!(store.get("JOBS").unwrap().is_none());

        store.set("JOBS", "[]").unwrap();
        assert_eq!(store.get("JOBS").unwrap().unwrap(), "[]");

        store.set("JOBS", "[1]").unwrap();
        assert_eq!(store.get("JOBS").unwrap().unwrap(), "[1]");
    }
}
