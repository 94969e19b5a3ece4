//! In-memory record store for tests and embedding.

use std::collections::HashMap;

use super::StateStore;
use crate::error::StorageError;

/// `HashMap`-backed store. Non-durable.
///
/// [`MemoryStore::failing`] builds a store whose writes always fail, for
/// exercising the engine's lossy-write policy.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: HashMap<String, String>,
    fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write, as if the quota were exhausted.
    pub fn failing() -> Self {
        Self {
            records: HashMap::new(),
            fail_writes: true,
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl StateStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.records.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        if self.fail_writes {
            return Err(StorageError::QueryFailed("store quota exhausted".into()));
        }
        self.records.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
