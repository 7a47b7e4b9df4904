//! Account 处理模块

use account_store_core::{
    account_type_options, Account, AccountErrors, AccountFormPatch, MetkaItem, SelectOption,
};
use serde::Deserialize;

use crate::error::ApiError;
use crate::state::AppState;

// ============ 请求参数类型 ============

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountIdArgs {
    pub account_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountArgs {
    pub account_id: String,
    pub form_data: AccountFormPatch,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateErrorsArgs {
    pub account_id: String,
    pub errors: AccountErrors,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMetkaArgs {
    pub account_id: String,
    pub metka: Vec<MetkaItem>,
}

// ============ Handler 实现 ============

/// 获取所有账户
pub fn list_accounts(state: &AppState) -> Vec<Account> {
    (*state.store.accounts()).clone()
}

/// 获取单个账户
pub fn get_account(state: &AppState, account_id: &str) -> Result<Account, ApiError> {
    state
        .store
        .find_by_id(account_id)
        .ok_or_else(|| ApiError::AccountNotFound(account_id.to_string()))
}

/// 新增账户
pub fn add_account(state: &AppState) -> Result<Account, ApiError> {
    let account = state.store.add_account()?;
    tracing::info!("已创建账户: {}", account.id);
    Ok(account)
}

/// 更新表单数据
pub fn update_account(state: &AppState, args: UpdateAccountArgs) -> Result<(), ApiError> {
    let found = state
        .store
        .update_account(&args.account_id, args.form_data)?;
    ensure_found(found, &args.account_id)
}

/// 替换校验错误
pub fn update_errors(state: &AppState, args: UpdateErrorsArgs) -> Result<(), ApiError> {
    let found = state.store.update_errors(&args.account_id, args.errors)?;
    ensure_found(found, &args.account_id)
}

/// 替换标签
pub fn update_metka(state: &AppState, args: UpdateMetkaArgs) -> Result<(), ApiError> {
    let found = state.store.update_metka(&args.account_id, args.metka)?;
    ensure_found(found, &args.account_id)
}

/// 删除账户
pub fn delete_account(state: &AppState, account_id: &str) -> Result<(), ApiError> {
    let removed = state.store.delete_account(account_id)?;
    ensure_found(removed, account_id)?;
    tracing::info!("已删除账户: {account_id}");
    Ok(())
}

/// 获取账户类型选项
pub fn list_account_types() -> Vec<SelectOption> {
    account_type_options()
}

// ============ 辅助函数 ============

fn ensure_found(found: bool, account_id: &str) -> Result<(), ApiError> {
    if found {
        Ok(())
    } else {
        Err(ApiError::AccountNotFound(account_id.to_string()))
    }
}
