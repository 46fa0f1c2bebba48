use quote_comparison_rust::{api, AppConfig};
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 比价服务 + 进程内采购申请存储
    let state = api::AppState::from_config(&config);
    let app = api::router(state);

    // 启动服务器
    let addr = config.bind_address();
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  POST /api/compare              - single comparison");
    info!("  POST /api/compare/batch        - parallel batch comparison");
    info!("  POST /api/compare/export       - comparison as CSV");
    info!("  POST /api/requests             - save purchase request");
    info!("  GET  /api/requests/:id         - fetch purchase request");
    info!("  POST /api/requests/:id/compare - compare stored request");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
