//! 内存存储实现

use std::collections::HashMap;
use std::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::traits::KeyValueStore;

/// 进程内存存储，进程退出即丢失
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// 预置一个键值，便于构造启动时已有数据的场景
    #[must_use]
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        if let Ok(mut entries) = self.entries.write() {
            entries.insert(key.into(), value.into());
        }
        self
    }
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::StorageError("Memory storage lock poisoned".to_string())
}

impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        let mut entries = self.entries.write().map_err(poisoned)?;
        entries.remove(key);
        Ok(())
    }
}
