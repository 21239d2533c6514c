use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::Result;

use super::SlotStore;

/// In-memory slot store. Used by tests and as an ephemeral backend;
/// contents are lost when the store is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.slots.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.slots
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.slots.lock().unwrap().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(store.get("books").unwrap(), None);
    }

    #[test]
    fn test_set_overwrites() {
        let store = MemoryStore::new();
        store.set("books", "[]").unwrap();
        store.set("books", "[1]").unwrap();
        assert_eq!(store.get("books").unwrap().as_deref(), Some("[1]"));
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        store.set("session", "{}").unwrap();
        store.remove("session").unwrap();
        assert_eq!(store.get("session").unwrap(), None);
    }
}
