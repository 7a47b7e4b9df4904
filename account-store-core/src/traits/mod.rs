//! 平台抽象 Trait

mod key_value_store;

pub use key_value_store::KeyValueStore;
