use restaurant_server::{Config, Server, ServerState, init_logger, setup_environment};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. 设置环境 (.env)
    setup_environment();

    // 2. 加载配置
    let config = Config::from_env()?;

    // 3. 日志
    init_logger(Some(&config.log_level), config.log_dir.as_deref());
    tracing::info!(
        environment = %config.environment,
        work_dir = %config.work_dir,
        "🦀 Restaurant Server starting..."
    );

    // 4. 初始化服务器状态
    let state = ServerState::initialize(&config).await?;

    // 5. 启动 HTTP 服务器
    let server = Server::with_state(config, state);
    if let Err(e) = server.run().await {
        tracing::error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}
