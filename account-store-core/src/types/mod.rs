//! 类型定义

mod account;

pub use account::{
    account_type_options, Account, AccountErrors, AccountFormData, AccountFormPatch, AccountType,
    MetkaItem, SelectOption,
};
