//! 键值存储实现

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;
