//! 错误处理模块

use account_store_core::CoreError;
use serde::Serialize;

/// 命令错误类型
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("账户未找到: {0}")]
    AccountNotFound(String),

    #[error("存储错误: {0}")]
    Storage(String),

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("未知命令: {0}")]
    UnknownCommand(String),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 响应包装
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        Self::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON 解析错误: {err}"))
    }
}
