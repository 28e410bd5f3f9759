//! MCP 服务实现
//!
//! 提供 analyze_user_personality、get_personality_report 与
//! clear_personality_cache 三个工具，结果以 Markdown 文本返回。

use crate::error::AppError;
use crate::services::PersonalityAnalyzer;
use rmcp::{
    ServerHandler,
    handler::server::tool::Parameters,
    model::{
        CallToolResult, Content, ErrorData, Implementation, ProtocolVersion, ServerCapabilities,
        ServerInfo,
    },
    tool, tool_handler, tool_router,
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::future::Future;
use std::sync::Arc;
use tracing::{error, info};

/// MCP 性格分析服务
#[derive(Clone)]
pub struct PersonaMcpServer {
    analyzer: Arc<PersonalityAnalyzer>,
    tool_router: rmcp::handler::server::tool::ToolRouter<Self>,
}

impl PersonaMcpServer {
    /// 创建 MCP 服务实例
    pub fn new(analyzer: Arc<PersonalityAnalyzer>) -> Self {
        Self {
            analyzer,
            tool_router: Self::tool_router(),
        }
    }
}

/// analyze_user_personality 工具参数
#[derive(Deserialize, JsonSchema)]
pub struct AnalyzePersonalityParams {
    /// 会话标识
    pub chat_key: String,
    /// 目标用户 ID
    pub user_id: String,
    /// 分析时间范围（天），缺省取配置默认值
    pub days: Option<u32>,
    /// 最大分析消息数，缺省取配置默认值
    pub max_messages: Option<usize>,
    /// 忽略缓存强制重新分析
    pub force_refresh: Option<bool>,
}

/// get_personality_report / clear_personality_cache 工具参数
#[derive(Deserialize, JsonSchema)]
pub struct PersonalityTargetParams {
    /// 会话标识
    pub chat_key: String,
    /// 目标用户 ID
    pub user_id: String,
}

impl From<AppError> for ErrorData {
    fn from(error: AppError) -> Self {
        match error {
            AppError::NotFound(msg) => ErrorData::resource_not_found(msg, None),
            AppError::Validation(msg) => ErrorData::invalid_params(msg, None),
            AppError::InsufficientData(msg) => ErrorData::invalid_request(msg, None),
            _ => ErrorData::internal_error(error.to_string(), None),
        }
    }
}

#[tool_router]
impl PersonaMcpServer {
    /// 执行性格分析并返回 Markdown 报告
    #[tool(
        description = "Analyze a user's personality from their chat history and return a Markdown report (Big Five traits, MBTI type, behavior patterns)"
    )]
    async fn analyze_user_personality(
        &self,
        params: Parameters<AnalyzePersonalityParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let params = params.0;

        info!(
            "MCP 分析请求: chat_key={}, user_id={}",
            params.chat_key, params.user_id
        );

        match self
            .analyzer
            .run_analysis(
                &params.chat_key,
                &params.user_id,
                params.days,
                params.max_messages,
                params.force_refresh.unwrap_or(false),
            )
            .await
        {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(
                result.report_markdown,
            )])),
            Err(e) => {
                error!("MCP 分析失败: {}", e);
                Err(ErrorData::from(e))
            }
        }
    }

    /// 读取已缓存的分析报告
    #[tool(
        description = "Fetch the cached personality report for a user without running a new analysis"
    )]
    async fn get_personality_report(
        &self,
        params: Parameters<PersonalityTargetParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let params = params.0;

        match self
            .analyzer
            .get_report(&params.chat_key, &params.user_id)
            .await
        {
            Ok(result) => Ok(CallToolResult::success(vec![Content::text(
                result.report_markdown,
            )])),
            Err(e) => Err(ErrorData::from(e)),
        }
    }

    /// 清除缓存的分析结果
    #[tool(description = "Clear the cached personality analysis for a user")]
    async fn clear_personality_cache(
        &self,
        params: Parameters<PersonalityTargetParams>,
    ) -> Result<CallToolResult, ErrorData> {
        let params = params.0;

        match self
            .analyzer
            .invalidate_cache(&params.chat_key, &params.user_id)
            .await
        {
            Ok(()) => Ok(CallToolResult::success(vec![Content::text(format!(
                "已清除用户 {} 在会话 {} 的分析缓存",
                params.user_id, params.chat_key
            ))])),
            Err(e) => {
                error!("MCP 清除缓存失败: {}", e);
                Err(ErrorData::from(e))
            }
        }
    }
}

#[tool_handler]
impl ServerHandler for PersonaMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "persona-analysis".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                ..Default::default()
            },
            instructions: Some(
                "Personality analysis service. Use analyze_user_personality to generate a \
                 personality report from a user's chat history (results are cached); \
                 get_personality_report to fetch an existing report without re-analysis; \
                 clear_personality_cache to force the next analysis to run fresh. Reports \
                 are entertainment-grade references, not professional assessments."
                    .to_string(),
            ),
        }
    }
}
