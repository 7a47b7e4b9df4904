//! 业务服务层

mod account_store;

pub use account_store::{AccountStore, ACCOUNTS_KEY};
