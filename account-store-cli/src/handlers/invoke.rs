//! RPC 风格的统一调用入口
//!
//! 单次调用 (`invoke`) 与逐行会话 (`serve`) 都经过 [`dispatch_command`]

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ApiError, ApiResponse};
use crate::state::AppState;

use super::account;

/// RPC 请求
#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub command: String,
    #[serde(default)]
    pub args: Value,
}

/// 执行一个请求，失败时转换为错误响应
///
/// 返回响应体以及是否成功
pub fn invoke(state: &AppState, req: &InvokeRequest) -> (Value, bool) {
    tracing::debug!("收到 RPC 请求: {} {:?}", req.command, req.args);

    match dispatch_command(state, &req.command, req.args.clone()) {
        Ok(value) => (value, true),
        Err(e) => {
            tracing::error!("命令 {} 执行失败: {}", req.command, e);
            (error_response(&e), false)
        }
    }
}

/// 以原始 JSON 字符串作为参数执行命令，参数解析失败同样返回错误响应
pub fn invoke_raw(state: &AppState, command: String, raw_args: &str) -> (Value, bool) {
    match serde_json::from_str::<Value>(raw_args) {
        Ok(args) => invoke(state, &InvokeRequest { command, args }),
        Err(e) => {
            tracing::warn!("命令 {command} 的参数无效: {e}");
            (error_response(&ApiError::from(e)), false)
        }
    }
}

/// 逐行读取请求并逐行写出响应，直到输入结束
pub fn serve<R, W>(state: &AppState, input: R, mut output: W) -> std::io::Result<()>
where
    R: BufRead,
    W: Write,
{
    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<InvokeRequest>(&line) {
            Ok(req) => invoke(state, &req).0,
            Err(e) => {
                tracing::warn!("无效的请求: {e}");
                error_response(&ApiError::from(e))
            }
        };

        writeln!(output, "{response}")?;
        output.flush()?;
    }

    Ok(())
}

fn error_response(err: &ApiError) -> Value {
    serde_json::to_value(ApiResponse::<()>::error(err.to_string())).unwrap_or(Value::Null)
}

fn success<T: Serialize>(data: T) -> Result<Value, ApiError> {
    serde_json::to_value(ApiResponse::success(data)).map_err(|e| ApiError::Internal(e.to_string()))
}

/// 命令分发
fn dispatch_command(state: &AppState, command: &str, args: Value) -> Result<Value, ApiError> {
    match command {
        "list_accounts" => success(account::list_accounts(state)),
        "get_account" => {
            let req: account::AccountIdArgs = serde_json::from_value(args)?;
            success(account::get_account(state, &req.account_id)?)
        }
        "add_account" => success(account::add_account(state)?),
        "update_account" => {
            let req: account::UpdateAccountArgs = serde_json::from_value(args)?;
            account::update_account(state, req)?;
            success(())
        }
        "update_errors" => {
            let req: account::UpdateErrorsArgs = serde_json::from_value(args)?;
            account::update_errors(state, req)?;
            success(())
        }
        "update_metka" => {
            let req: account::UpdateMetkaArgs = serde_json::from_value(args)?;
            account::update_metka(state, req)?;
            success(())
        }
        "delete_account" => {
            let req: account::AccountIdArgs = serde_json::from_value(args)?;
            account::delete_account(state, &req.account_id)?;
            success(())
        }
        "list_account_types" => success(account::list_account_types()),

        // 不支持的命令
        _ => Err(ApiError::UnknownCommand(command.to_string())),
    }
}
