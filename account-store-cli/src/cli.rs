//! 命令行参数

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "account-store", version, about = "Account record store")]
pub struct Cli {
    /// 配置文件路径
    #[arg(short, long, default_value = "account-store.toml")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// 执行单个命令并输出 JSON 响应
    Invoke {
        /// 命令名，如 `add_account`
        command: String,
        /// JSON 格式的命令参数
        #[arg(long, default_value = "null")]
        args: String,
    },
    /// 从标准输入逐行读取 JSON 请求
    Serve,
}
