//! MCP 服务模块
//!
//! 通过 MCP (Model Context Protocol) 把性格分析能力暴露给 AI 代理，
//! 使用 stdio 传输。

pub mod server;

/// 以 stdio 传输运行 MCP 服务
pub async fn run_mcp_server(
    analyzer: std::sync::Arc<crate::services::PersonalityAnalyzer>,
) -> Result<(), Box<dyn std::error::Error>> {
    use rmcp::{ServiceExt, transport::stdio};
    use server::PersonaMcpServer;
    use tracing::info;

    info!("MCP server starting with stdio transport...");

    let mcp_server = PersonaMcpServer::new(analyzer)
        .serve(stdio())
        .await
        .inspect_err(|e| {
            tracing::error!("MCP server error: {}", e);
        })?;

    mcp_server.waiting().await?;

    Ok(())
}
