//! 分析 DTO
//!
//! 定义性格分析相关的请求和响应数据结构。

use crate::models::{AnalysisResult, TraitScores, TypeClassification};
use serde::{Deserialize, Serialize};

/// 分析请求
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct AnalyzeRequest {
    /// 分析时间范围（天），缺省取配置默认值
    pub days: Option<u32>,
    /// 最大分析消息数，缺省取配置默认值
    pub max_messages: Option<usize>,
    /// 忽略缓存强制重新分析
    pub force_refresh: bool,
}

/// 分析响应
#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    /// 目标用户 ID
    pub target_user_id: String,
    /// 目标用户昵称
    pub target_username: String,
    /// 分析时间（Unix 秒）
    pub analysis_timestamp: i64,
    /// 消息样本量
    pub message_sample_size: usize,
    /// 数据范围起点（Unix 秒）
    pub time_range_start: i64,
    /// 数据范围终点（Unix 秒）
    pub time_range_end: i64,
    /// 大五人格评分
    pub trait_scores: Option<TraitScores>,
    /// MBTI 类型判断
    pub type_classification: Option<TypeClassification>,
    /// 行为模式标签
    pub behavior_patterns: Vec<String>,
    /// 沟通风格描述
    pub communication_style: String,
    /// 情感倾向描述
    pub emotional_tendency: String,
    /// 综合性格画像
    pub personality_summary: String,
    /// Markdown 格式报告
    pub report_markdown: String,
}

impl From<AnalysisResult> for AnalysisResponse {
    fn from(result: AnalysisResult) -> Self {
        Self {
            target_user_id: result.target_user_id,
            target_username: result.target_username,
            analysis_timestamp: result.analysis_timestamp,
            message_sample_size: result.message_sample_size,
            time_range_start: result.time_range_start,
            time_range_end: result.time_range_end,
            trait_scores: result.trait_scores,
            type_classification: result.type_classification,
            behavior_patterns: result.behavior_patterns,
            communication_style: result.communication_style,
            emotional_tendency: result.emotional_tendency,
            personality_summary: result.personality_summary,
            report_markdown: result.report_markdown,
        }
    }
}

/// 清除缓存响应
#[derive(Debug, Serialize)]
pub struct InvalidateResponse {
    /// 会话标识
    pub chat_key: String,
    /// 目标用户 ID
    pub user_id: String,
    /// 操作结果
    pub cleared: bool,
}
