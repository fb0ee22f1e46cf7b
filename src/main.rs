//! # Social Login 主程序

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use social_login::{
    Result,
    api::LoginServer,
    app::AppContext,
    config::ConfigManager,
    lerror, linfo,
    logging::{self, LogComponent, LogStage},
};

/// 命令行参数
#[derive(Debug, Parser)]
#[command(name = "social-login", version, about = "Facebook / Google social login backend")]
struct Args {
    /// 配置文件路径，默认 config/config.{RUST_ENV}.toml
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// 日志级别（RUST_LOG 优先）
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    logging::init_logging(args.log_level.as_deref());

    if let Err(e) = run(args).await {
        lerror!(
            "system",
            LogStage::Startup,
            LogComponent::Main,
            "service_start_failed",
            &format!("服务启动失败: {e:?}")
        );
        std::process::exit(1);
    }

    linfo!(
        "system",
        LogStage::Shutdown,
        LogComponent::Main,
        "service_shutdown",
        "服务正常关闭"
    );
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let config_manager = ConfigManager::new(args.config.as_deref())?;
    let config = config_manager.get_config();

    linfo!(
        "system",
        LogStage::Configuration,
        LogComponent::Config,
        "config_loaded",
        &format!("配置加载完成: {}", config_manager.config_path().display())
    );

    let context = Arc::new(AppContext::bootstrap(Arc::clone(&config)).await?);

    linfo!(
        "system",
        LogStage::Startup,
        LogComponent::Main,
        "service_starting",
        "服务启动"
    );
    LoginServer::new(config.server.clone(), context).serve().await
}
