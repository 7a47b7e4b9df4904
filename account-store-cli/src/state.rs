//! 应用状态

use std::sync::Arc;

use account_store_core::{AccountStore, FileStorage, KeyValueStore, MemoryStorage};

use crate::config::{StorageBackend, StorageConfig};

/// 应用状态，持有整个会话共享的账户存储
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<AccountStore>,
}

impl AppState {
    pub fn new(store: AccountStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// 按配置打开存储后端并加载账户
    pub fn from_config(config: &StorageConfig) -> anyhow::Result<Self> {
        let storage: Arc<dyn KeyValueStore> = match config.backend {
            StorageBackend::File => Arc::new(FileStorage::open(&config.path)?),
            StorageBackend::Memory => Arc::new(MemoryStorage::new()),
        };

        Ok(Self::new(AccountStore::new(storage)))
    }
}
