//! Account Store 命令行前端
//!
//! 加载配置、初始化日志，然后以 RPC 风格分发账户命令

mod cli;
mod config;
mod error;
mod handlers;
mod state;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Command};
use config::{AppConfig, LogConfig};
use handlers::invoke;
use state::AppState;

/// 初始化日志，输出到 stderr，stdout 只用于 JSON 响应
fn init_logging(config: &LogConfig) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| config.level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // 加载配置
    let (config, from_file) = AppConfig::load(&cli.config)?;
    init_logging(&config.log);

    if from_file {
        tracing::info!("配置加载完成: {}", cli.config.display());
    } else {
        tracing::info!("未找到配置文件 {}，使用默认配置", cli.config.display());
    }

    // 打开存储
    let state = AppState::from_config(&config.storage)?;
    tracing::info!(
        "存储已就绪 ({:?})，共 {} 个账户",
        config.storage.backend,
        state.store.len()
    );

    match cli.command {
        Command::Invoke { command, args } => {
            let (response, ok) = invoke::invoke_raw(&state, command, &args);
            println!("{response}");
            Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
        }
        Command::Serve => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            invoke::serve(&state, stdin.lock(), stdout.lock())?;
            tracing::info!("输入结束，会话退出");
            Ok(ExitCode::SUCCESS)
        }
    }
}
