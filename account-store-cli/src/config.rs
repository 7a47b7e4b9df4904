//! 配置模块
//!
//! 从 TOML 文件加载配置，文件不存在时使用默认值

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// 应用配置
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub log: LogConfig,
}

/// 存储后端
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    File,
    Memory,
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// `file` 后端的数据文件路径
    pub path: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::File,
            path: PathBuf::from("account-store.json"),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` 语法，`RUST_LOG` 优先
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// 加载配置文件
    ///
    /// 返回配置以及是否来自文件
    pub fn load(path: &Path) -> anyhow::Result<(Self, bool)> {
        if !path.exists() {
            return Ok((Self::default(), false));
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let config = Self::parse(&content)
            .with_context(|| format!("解析配置文件失败: {}", path.display()))?;

        Ok((config, true))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}
