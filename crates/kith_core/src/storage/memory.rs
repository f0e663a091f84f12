//! Process-local key-value store.

use super::{check_quota, KeyValueStore, StorageResult};
use std::cell::RefCell;
use std::collections::BTreeMap;

/// In-memory slot store, mainly for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slots: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that rejects writes pushing total key+value bytes past `quota_bytes`.
    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            slots: RefCell::new(BTreeMap::new()),
            quota_bytes: Some(quota_bytes),
        }
    }

    /// Total bytes of all keys and values currently stored.
    pub fn used_bytes(&self) -> usize {
        self.slots
            .borrow()
            .iter()
            .map(|(key, value)| key.len() + value.len())
            .sum()
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.slots.borrow().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        let previous = self
            .slots
            .borrow()
            .get(key)
            .map_or(0, |old| key.len() + old.len());
        let required = self.used_bytes() - previous + key.len() + value.len();
        check_quota(key, required, self.quota_bytes)?;

        self.slots
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.slots.borrow_mut().remove(key);
        Ok(())
    }

    fn clear(&self) -> StorageResult<()> {
        self.slots.borrow_mut().clear();
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.slots.borrow().keys().cloned().collect())
    }
}
