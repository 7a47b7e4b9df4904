//! Account Store 核心库
//!
//! 提供账户记录的内存有序集合，以及每次变更后写回键值存储的持久化逻辑。
//!
//! - [`services::AccountStore`]: 账户增删改查 + 自动保存
//! - [`traits::KeyValueStore`]: 持久化抽象
//! - [`storage`]: 内存 / 文件两种存储实现

pub mod error;
pub mod services;
pub mod storage;
pub mod traits;
pub mod types;

pub use error::{CoreError, CoreResult};
pub use services::{AccountStore, ACCOUNTS_KEY};
pub use storage::{FileStorage, MemoryStorage};
pub use traits::KeyValueStore;
pub use types::{
    account_type_options, Account, AccountErrors, AccountFormData, AccountFormPatch, AccountType,
    MetkaItem, SelectOption,
};
