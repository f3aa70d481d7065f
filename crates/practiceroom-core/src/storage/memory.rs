//! In-process key-value store.

use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::{Result, StorageError};

/// Map-backed store. Used by tests and as the fallback when the database
/// cannot be opened.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, as a full or disabled storage would.
    pub fn fail_writes(&mut self, fail: bool) {
        self.fail_writes = fail;
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        if self.fail_writes {
            return Err(StorageError::Unavailable(format!("write to '{key}' refused")).into());
        }
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
