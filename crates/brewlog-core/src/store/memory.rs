//! In-process store implementation

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;
use tokio::sync::Mutex;

use super::LocalStore;
use crate::error::{Error, Result};

/// Volatile `LocalStore` backed by a hash map.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: Arc<Mutex<HashMap<String, Value>>>,
    fail_writes: Arc<AtomicBool>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent `set` fail, simulating a full or broken disk.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Keys currently stored, sorted.
    pub async fn keys(&self) -> Vec<String> {
        let mut keys = self.values.lock().await.keys().cloned().collect::<Vec<_>>();
        keys.sort();
        keys
    }
}

impl LocalStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.values.lock().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<Value> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(Error::Store(format!("write to '{key}' refused")));
        }
        self.values
            .lock()
            .await
            .insert(key.to_string(), value.clone());
        Ok(value)
    }
}
