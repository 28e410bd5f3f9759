//! 性格分析编排服务
//!
//! 把采集、统计、推理、叙述、渲染、缓存串成一次完整分析。所有
//! 协作方显式注入，编排层不持有任何全局状态。同一 (会话, 用户)
//! 的并发分析不互斥，缓存写入后写覆盖先写。

use crate::config::{AnalysisConfig, AppConfig};
use crate::error::{AppError, Result};
use crate::llm::OpenAiChatClient;
use crate::models::{AnalysisResult, MessageSource};
use crate::observability::AppMetrics;
use crate::services::inference::InferenceEngine;
use crate::services::narrative::{
    compose_communication_style, compose_emotional_tendency, compose_summary,
};
use crate::services::patterns::detect_patterns;
use crate::services::prompt::build_analysis_input;
use crate::services::report::render_report;
use crate::services::statistics::analyze_messages;
use crate::storage::{AnalysisCache, create_kv_store};
use std::sync::Arc;
use tracing::{info, warn};

/// 单次分析可接受的消息数上限
const MAX_MESSAGES_CEILING: usize = 5000;

/// 分析时间范围上限（天）
const MAX_DAYS: u32 = 365;

/// 采集不到发送者昵称时的占位名
const UNKNOWN_USERNAME: &str = "未知用户";

/// 性格分析编排器
#[derive(Clone)]
pub struct PersonalityAnalyzer {
    source: Arc<dyn MessageSource>,
    inference: InferenceEngine,
    cache: AnalysisCache,
    config: AnalysisConfig,
    metrics: Arc<AppMetrics>,
}

impl PersonalityAnalyzer {
    /// 创建编排器
    pub fn new(
        source: Arc<dyn MessageSource>,
        inference: InferenceEngine,
        cache: AnalysisCache,
        config: AnalysisConfig,
        metrics: Arc<AppMetrics>,
    ) -> Self {
        Self {
            source,
            inference,
            cache,
            config,
            metrics,
        }
    }

    /// 执行一次完整的性格分析
    ///
    /// `days` 与 `max_messages` 缺省时取配置默认值。参数校验先于
    /// 任何数据采集；`force_refresh` 跳过缓存读取但不跳过写入。
    pub async fn run_analysis(
        &self,
        chat_key: &str,
        user_id: &str,
        days: Option<u32>,
        max_messages: Option<usize>,
        force_refresh: bool,
    ) -> Result<AnalysisResult> {
        let days = days.unwrap_or(self.config.default_days);
        let max_messages = max_messages.unwrap_or(self.config.default_max_messages);
        self.validate_request(chat_key, user_id, days, max_messages)?;

        if !force_refresh {
            if let Some(cached) = self.cache.get(chat_key, user_id).await {
                info!("命中缓存分析结果: chat_key={chat_key}, user_id={user_id}");
                self.metrics.record_cache_hit();
                return Ok(cached);
            }
            self.metrics.record_cache_miss();
        }

        let started = std::time::Instant::now();
        let now = chrono::Utc::now().timestamp();
        let start_time = now - i64::from(days) * 86400;

        let messages = self
            .source
            .query_user_messages(chat_key, user_id, start_time, max_messages)
            .await?;

        if messages.is_empty() {
            return Err(AppError::InsufficientData(format!(
                "用户 {user_id} 在会话 {chat_key} 最近 {days} 天内没有可分析的消息"
            )));
        }
        if messages.len() < self.config.min_message_threshold {
            warn!(
                "消息样本量不足: {} 条（建议至少 {} 条），分析结果可能不够准确",
                messages.len(),
                self.config.min_message_threshold
            );
        }

        let stats = analyze_messages(&messages);
        let input = build_analysis_input(&messages, &stats);

        let trait_scores = if self.config.enable_big_five {
            Some(self.inference.analyze_big_five(&input).await)
        } else {
            None
        };
        let type_classification = if self.config.enable_mbti {
            Some(self.inference.analyze_mbti(&input).await)
        } else {
            None
        };
        let behavior_patterns = if self.config.enable_behavior_pattern {
            detect_patterns(&stats)
        } else {
            Vec::new()
        };

        // 消息按时间倒序，首条即最新，昵称以最新消息为准
        let username = messages
            .first()
            .map(|m| m.sender_name.clone())
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_USERNAME.to_string());

        let mut result = AnalysisResult {
            target_user_id: user_id.to_string(),
            target_username: username.clone(),
            analysis_timestamp: now,
            message_sample_size: messages.len(),
            time_range_start: start_time,
            time_range_end: now,
            trait_scores,
            type_classification,
            personality_summary: compose_summary(&username, trait_scores.as_ref()),
            behavior_patterns,
            communication_style: compose_communication_style(&stats),
            emotional_tendency: compose_emotional_tendency(trait_scores.as_ref()),
            report_markdown: String::new(),
        };
        result.report_markdown = render_report(&result);

        self.metrics
            .record_analysis_run(started.elapsed().as_millis() as u64);
        info!(
            "分析完成: chat_key={chat_key}, user_id={user_id}, 样本量={}",
            result.message_sample_size
        );

        if let Err(e) = self.cache.set(chat_key, user_id, &result).await {
            warn!("缓存分析结果失败: {e}");
        }

        Ok(result)
    }

    /// 读取缓存的分析报告
    ///
    /// 没有有效缓存时返回 `NotFound`，不触发新的分析。
    pub async fn get_report(&self, chat_key: &str, user_id: &str) -> Result<AnalysisResult> {
        match self.cache.get(chat_key, user_id).await {
            Some(result) => {
                self.metrics.record_cache_hit();
                Ok(result)
            }
            None => {
                self.metrics.record_cache_miss();
                Err(AppError::NotFound(format!(
                    "用户 {user_id} 在会话 {chat_key} 没有有效的分析报告，请先执行分析"
                )))
            }
        }
    }

    /// 清除缓存的分析结果，幂等
    pub async fn invalidate_cache(&self, chat_key: &str, user_id: &str) -> Result<()> {
        self.cache.delete(chat_key, user_id).await
    }

    fn validate_request(
        &self,
        chat_key: &str,
        user_id: &str,
        days: u32,
        max_messages: usize,
    ) -> Result<()> {
        if user_id.trim().is_empty() {
            return Err(AppError::Validation("用户ID不能为空".to_string()));
        }
        if chat_key.trim().is_empty() {
            return Err(AppError::Validation("会话标识不能为空".to_string()));
        }
        if days < 1 || days > MAX_DAYS {
            return Err(AppError::Validation(format!(
                "分析时间范围必须在 1 到 {MAX_DAYS} 天之间，当前为 {days} 天"
            )));
        }
        if max_messages < self.config.min_message_threshold
            || max_messages > MAX_MESSAGES_CEILING
        {
            return Err(AppError::Validation(format!(
                "最大消息数必须在 {} 到 {MAX_MESSAGES_CEILING} 之间，当前为 {max_messages}",
                self.config.min_message_threshold
            )));
        }
        Ok(())
    }
}

/// 按配置装配编排器及其全部协作方
pub fn create_personality_analyzer(
    config: &AppConfig,
    source: Arc<dyn MessageSource>,
    metrics: Arc<AppMetrics>,
) -> Result<PersonalityAnalyzer> {
    let store = create_kv_store(&config.cache)?;
    let cache = AnalysisCache::new(store, config.cache.expire_days);
    let chat = Arc::new(OpenAiChatClient::new(config.model.clone())?);
    let inference = InferenceEngine::new(chat, config.model.clone(), metrics.clone());

    Ok(PersonalityAnalyzer::new(
        source,
        inference,
        cache,
        config.analysis.clone(),
        metrics,
    ))
}
