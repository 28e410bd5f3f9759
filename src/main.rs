use anyhow::Context;
use persona::api::{self, app_state::AppState};
use persona::config::loader::ConfigLoader;
use persona::models::InMemoryMessageSource;
use persona::observability::{
    HealthCheckResult, ObservabilityState, create_observability_router, init_tracing,
    metrics_middleware,
};
use persona::services::create_personality_analyzer;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing("persona");

    let config = ConfigLoader::load().context("加载配置失败")?;
    ConfigLoader::validate(&config).context("配置验证失败")?;
    info!("Configuration loaded successfully");

    // 开发与演示环境使用内存消息来源，生产部署替换为平台消息存储的实现
    let source = Arc::new(InMemoryMessageSource::new());

    let observability_state = Arc::new(ObservabilityState::new(
        env!("CARGO_PKG_VERSION").to_string(),
    ));
    let metrics = observability_state.metrics.clone();

    let started = std::time::Instant::now();
    let analyzer = Arc::new(create_personality_analyzer(
        &config,
        source,
        metrics,
    )?);
    observability_state
        .add_health_check(HealthCheckResult {
            name: "analyzer".to_string(),
            healthy: true,
            message: format!("cache backend: {}", config.cache.backend),
            latency_ms: started.elapsed().as_millis() as u64,
        })
        .await;
    info!("Personality analyzer initialized");

    // MCP stdio 模式
    if std::env::var("PERSONA_MCP_MODE").is_ok() {
        info!("Starting Persona in MCP server mode...");
        return persona::mcp::run_mcp_server(analyzer)
            .await
            .map_err(|e| anyhow::anyhow!("MCP 服务退出: {e}"));
    }

    info!("Starting Persona...");

    let app_state = AppState::new(analyzer);
    let api_router = api::create_router(app_state);
    let metrics_state = observability_state.clone();
    let router = create_observability_router(observability_state)
        .merge(api_router)
        .layer(axum::middleware::from_fn(move |req, next| {
            metrics_middleware(req, next, metrics_state.clone())
        }));
    info!("API router created with observability endpoints");

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("无法监听 {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, router).await?;

    Ok(())
}
