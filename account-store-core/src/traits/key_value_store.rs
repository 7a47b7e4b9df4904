//! 键值存储抽象 Trait

use crate::error::CoreResult;

/// 同步的字符串键值存储
///
/// 实现:
/// - `MemoryStorage`: 进程内存
/// - `FileStorage`: 单个 JSON 文件
pub trait KeyValueStore: Send + Sync {
    /// 读取键对应的值
    ///
    /// # Arguments
    /// * `key` - 存储键
    fn get(&self, key: &str) -> CoreResult<Option<String>>;

    /// 写入值，覆盖已有内容
    ///
    /// # Arguments
    /// * `key` - 存储键
    /// * `value` - 序列化后的值
    fn set(&self, key: &str, value: &str) -> CoreResult<()>;

    /// 删除键，键不存在时不报错
    fn remove(&self, key: &str) -> CoreResult<()>;
}
