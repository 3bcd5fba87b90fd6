use clap::Parser;
use std::process::ExitCode;
use tracing::error;

use miniapp_lib::cli::{self, Cli};
use miniapp_lib::utils::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    // 初始化日志系统，失败信息已由 init_logging 输出
    if init_logging().is_err() {
        return ExitCode::FAILURE;
    }

    let cli = Cli::parse();
    match cli::run(cli).await {
        Ok(code) => code,
        Err(e) => {
            error!("miniapp failed: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
