use freight_bi_rust::{api, AppConfig, BusinessRules, DashboardService, DatasetCache};
use std::sync::Arc;
use tower::ServiceBuilder;
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
    let config = AppConfig::from_env();
    info!("Starting server with config: {:?}", config);

    // 业务规则 (客户表 / 区域 / 状态)
    let rules = Arc::new(BusinessRules::load(&config.dataset.rules_path)?);

    // 原始表缓存 + 看板服务
    let cache = Arc::new(DatasetCache::new(
        config.dataset.path.clone(),
        config.dataset.cache_ttl(),
    ));
    let service = Arc::new(DashboardService::new(cache, rules, config.pipeline.clone()));

    let app = api::router(service).layer(ServiceBuilder::new());

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/options           - 筛选项");
    info!("  POST /api/view              - 筛选后的记录与汇总");
    info!("  POST /api/report            - 各页签数据");
    info!("  POST /api/export            - 导出 CSV");
    info!("  POST /api/cache/invalidate  - 缓存失效");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
