//! 账户相关类型定义
//!
//! 字段命名与持久化的 JSON 结构保持一致（camelCase）

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// 账户类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[default]
    Local,
    Ldap,
}

impl AccountType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Ldap => "ldap",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 标签项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetkaItem {
    pub text: String,
}

impl MetkaItem {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// 账户表单数据
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFormData {
    /// 标签原始输入
    pub metka_raw: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub login: String,
    /// `None` 序列化为 `null`
    pub password: Option<String>,
}

impl Default for AccountFormData {
    fn default() -> Self {
        Self {
            metka_raw: String::new(),
            account_type: AccountType::Local,
            login: String::new(),
            password: Some(String::new()),
        }
    }
}

/// 表单字段的校验错误，缺省字段表示无错误
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountErrors {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metka: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub account_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

impl AccountErrors {
    pub const fn is_empty(&self) -> bool {
        self.metka.is_none()
            && self.account_type.is_none()
            && self.login.is_none()
            && self.password.is_none()
    }
}

/// 账户记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: String,
    pub form_data: AccountFormData,
    #[serde(default)]
    pub errors: AccountErrors,
    #[serde(default)]
    pub metka: Vec<MetkaItem>,
}

impl Account {
    /// 以默认表单创建账户
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            form_data: AccountFormData::default(),
            errors: AccountErrors::default(),
            metka: Vec::new(),
        }
    }
}

/// 表单的部分更新
///
/// 未提供的字段保持原值。`password` 为 `Some(None)` 时写入 `null`。
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountFormPatch {
    #[serde(default)]
    pub metka_raw: Option<String>,
    #[serde(default, rename = "type")]
    pub account_type: Option<AccountType>,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub password: Option<Option<String>>,
}

impl AccountFormPatch {
    /// 浅合并到已有表单
    pub fn apply_to(self, form: &mut AccountFormData) {
        if let Some(metka_raw) = self.metka_raw {
            form.metka_raw = metka_raw;
        }
        if let Some(account_type) = self.account_type {
            form.account_type = account_type;
        }
        if let Some(login) = self.login {
            form.login = login;
        }
        if let Some(password) = self.password {
            form.password = password;
        }
    }
}

/// 字段出现即为 `Some`，包括显式的 `null`
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// 下拉选项
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOption {
    pub label: String,
    pub value: AccountType,
}

/// 账户类型的下拉选项列表
pub fn account_type_options() -> Vec<SelectOption> {
    vec![
        SelectOption {
            label: "Локальная".to_string(),
            value: AccountType::Local,
        },
        SelectOption {
            label: "LDAP".to_string(),
            value: AccountType::Ldap,
        },
    ]
}
