use crate::ports::key_value_store::{KeyValueStore as KeyValueStoreTrait, Result};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

/// Error returned by injected faults.
#[derive(Debug, thiserror::Error)]
#[error("injected {operation} failure for key `{key}`")]
pub struct InjectedFault {
    pub operation: &'static str,
    pub key: String,
}

/// In-memory implementation of KeyValueStore
///
/// Keeps values in a mutex-guarded map. `set_many` is applied atomically:
/// either every entry is written or none is.
///
/// Supports fault injection for testing: reads or writes of selected keys
/// can be made to fail.
#[derive(Default)]
pub struct KeyValueStore {
    values: Mutex<HashMap<String, String>>,
    failing_reads: Mutex<HashSet<String>>,
    failing_writes: Mutex<HashSet<String>>,
}

impl KeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every read of `key` fail until cleared
    pub fn fail_reads_for(&self, key: &str) {
        self.failing_reads.lock().unwrap().insert(key.to_string());
    }

    /// Make every write or removal of `key` fail until cleared
    pub fn fail_writes_for(&self, key: &str) {
        self.failing_writes.lock().unwrap().insert(key.to_string());
    }

    /// Remove all injected faults
    pub fn clear_faults(&self) {
        self.failing_reads.lock().unwrap().clear();
        self.failing_writes.lock().unwrap().clear();
    }

    /// Current raw value, bypassing fault injection
    pub fn raw(&self, key: &str) -> Option<String> {
        self.values.lock().unwrap().get(key).cloned()
    }

    /// Write a raw value, bypassing fault injection
    pub fn insert_raw(&self, key: &str, value: impl Into<String>) {
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.into());
    }

    fn check_write(&self, key: &str) -> Result<()> {
        if self.failing_writes.lock().unwrap().contains(key) {
            return Err(Box::new(InjectedFault {
                operation: "write",
                key: key.to_string(),
            }));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStoreTrait for KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.failing_reads.lock().unwrap().contains(key) {
            return Err(Box::new(InjectedFault {
                operation: "read",
                key: key.to_string(),
            }));
        }
        Ok(self.values.lock().unwrap().get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_write(key)?;
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<()> {
        self.check_write(key)?;
        self.values.lock().unwrap().remove(key);
        Ok(())
    }

    /// Validate every key first, then apply all entries under one lock
    async fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, _) in entries {
            self.check_write(key)?;
        }

        let mut values = self.values.lock().unwrap();
        for (key, value) in entries {
            values.insert(key.to_string(), value.clone());
        }
        Ok(())
    }
}
