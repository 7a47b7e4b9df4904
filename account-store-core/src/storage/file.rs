//! 文件存储实现
//!
//! 所有键值保存在一个 JSON 对象文件中，写入时先写临时文件再重命名

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use crate::error::{CoreError, CoreResult};
use crate::traits::KeyValueStore;

type Entries = BTreeMap<String, String>;

/// 单文件 JSON 存储
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    /// 内存缓存，读取不触发磁盘 I/O
    entries: RwLock<Entries>,
}

impl FileStorage {
    /// 打开存储文件，文件不存在时视为空
    pub fn open(path: impl Into<PathBuf>) -> CoreResult<Self> {
        let path = path.into();
        let entries = Self::read_file(&path)?;
        log::debug!(
            "Opened file storage {} with {} keys",
            path.display(),
            entries.len()
        );

        Ok(Self {
            path,
            entries: RwLock::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_file(path: &Path) -> CoreResult<Entries> {
        if !path.exists() {
            return Ok(Entries::new());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::StorageError(format!("Failed to read {}: {e}", path.display()))
        })?;
        if content.trim().is_empty() {
            return Ok(Entries::new());
        }

        serde_json::from_str(&content).map_err(|e| {
            CoreError::StorageError(format!("Malformed store file {}: {e}", path.display()))
        })
    }

    fn write_file(&self, entries: &Entries) -> CoreResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(entries)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, content).map_err(|e| {
            CoreError::StorageError(format!("Failed to write {}: {e}", tmp.display()))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            let _ = fs::remove_file(&tmp);
            CoreError::StorageError(format!("Failed to replace {}: {e}", self.path.display()))
        })
    }

    /// 修改副本并落盘，成功后才更新缓存
    fn update<F>(&self, f: F) -> CoreResult<()>
    where
        F: FnOnce(&mut Entries),
    {
        let mut entries = self.entries.write().map_err(poisoned)?;
        let mut next = entries.clone();
        f(&mut next);

        self.write_file(&next)?;
        *entries = next;
        Ok(())
    }
}

fn poisoned<T>(_: T) -> CoreError {
    CoreError::StorageError("File storage lock poisoned".to_string())
}

impl KeyValueStore for FileStorage {
    fn get(&self, key: &str) -> CoreResult<Option<String>> {
        let entries = self.entries.read().map_err(poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> CoreResult<()> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}
