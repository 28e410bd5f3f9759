//! 性格推理引擎
//!
//! 两个相互独立的子分析：大五人格评分与 MBTI 类型判断。模型输出是
//! 不可信文本，每次推理的结果只有两种：解析且校验通过的结构化值，
//! 或确定性的中性回退值。失败吸收在本层，只记日志，不向上抛出。

use crate::config::ModelConfig;
use crate::error::{AppError, Result};
use crate::llm::{ChatClient, ChatMessage};
use crate::models::{TraitScores, TypeClassification};
use crate::observability::AppMetrics;
use std::sync::Arc;
use tracing::{error, warn};

/// 大五人格分析提示词
fn big_five_prompt(input_data: &str) -> String {
    format!(
        r#"你是一位经验丰富的心理学专家，专精于基于文本行为分析进行大五人格评估。

请基于以下聊天消息样本和统计信息，分析用户在大五人格各维度的得分（0-100分）：

1. 开放性（Openness）：对新体验的接受程度，创造性，好奇心
2. 尽责性（Conscientiousness）：组织性，可靠性，自律性
3. 外向性（Extraversion）：社交性，活力，主动性
4. 宜人性（Agreeableness）：合作性，同理心，友善性
5. 神经质（Neuroticism）：情绪稳定性（分数越高越不稳定）

{input_data}

请严格按照以下JSON格式输出（仅输出JSON，不要任何其他内容）：
{{
    "openness": 整数（0-100）,
    "conscientiousness": 整数（0-100）,
    "extraversion": 整数（0-100）,
    "agreeableness": 整数（0-100）,
    "neuroticism": 整数（0-100）,
    "reasoning": "简要说明评分理由"
}}"#
    )
}

/// MBTI 分析提示词
fn mbti_prompt(input_data: &str) -> String {
    format!(
        r#"你是一位MBTI认证分析师，擅长从行为模式识别人格类型。

请根据用户的聊天行为和语言风格，判断其在MBTI四个维度上的倾向：

1. E（外向）vs I（内向）：能量来源
2. S（感觉）vs N（直觉）：信息处理
3. T（思考）vs F（情感）：决策方式
4. J（判断）vs P（知觉）：生活态度

{input_data}

请严格按照以下JSON格式输出（仅输出JSON，不要任何其他内容）：
{{
    "mbti_type": "四个字母的MBTI类型（如INFP）",
    "confidence": 0.0到1.0之间的小数,
    "dimension_scores": {{
        "E-I": 0.0到1.0（越接近0越I，越接近1越E）,
        "S-N": 0.0到1.0（越接近0越S，越接近1越N）,
        "T-F": 0.0到1.0（越接近0越T，越接近1越F）,
        "J-P": 0.0到1.0（越接近0越J，越接近1越P）
    }},
    "reasoning": "简要说明判断理由"
}}"#
    )
}

/// 性格推理引擎
#[derive(Clone)]
pub struct InferenceEngine {
    chat: Arc<dyn ChatClient>,
    config: ModelConfig,
    metrics: Arc<AppMetrics>,
}

impl InferenceEngine {
    /// 创建推理引擎
    pub fn new(chat: Arc<dyn ChatClient>, config: ModelConfig, metrics: Arc<AppMetrics>) -> Self {
        Self {
            chat,
            config,
            metrics,
        }
    }

    /// 大五人格分析
    ///
    /// 任何失败（网络、空响应、解析、缺字段、越界）都返回中性回退值
    /// `(50,50,50,50,50)`，不向调用方抛出。
    pub async fn analyze_big_five(&self, input_data: &str) -> TraitScores {
        let content = match self.request(&big_five_prompt(input_data)).await {
            Ok(content) => content,
            Err(e) => {
                error!("大五人格分析失败: {e}");
                self.metrics.record_model_fallback();
                return TraitScores::neutral();
            }
        };

        let content = content.trim();
        if content.is_empty() {
            warn!("大五人格分析返回内容为空，使用默认值");
            self.metrics.record_model_fallback();
            return TraitScores::neutral();
        }

        match parse_trait_scores(content) {
            Ok(scores) => scores,
            Err(e) => {
                error!("大五人格分析失败: {e}");
                self.metrics.record_model_fallback();
                TraitScores::neutral()
            }
        }
    }

    /// MBTI 类型判断
    ///
    /// 与大五人格分析相同的容错纪律；回退值为哨兵类型 `XXXX`、
    /// 置信度 0.5、各维度 0.5。
    pub async fn analyze_mbti(&self, input_data: &str) -> TypeClassification {
        let content = match self.request(&mbti_prompt(input_data)).await {
            Ok(content) => content,
            Err(e) => {
                error!("MBTI分析失败: {e}");
                self.metrics.record_model_fallback();
                return TypeClassification::neutral();
            }
        };

        let content = content.trim();
        if content.is_empty() {
            warn!("MBTI分析返回内容为空，使用默认值");
            self.metrics.record_model_fallback();
            return TypeClassification::neutral();
        }

        match parse_type_classification(content) {
            Ok(classification) => classification,
            Err(e) => {
                error!("MBTI分析失败: {e}");
                self.metrics.record_model_fallback();
                TypeClassification::neutral()
            }
        }
    }

    async fn request(&self, prompt: &str) -> Result<String> {
        self.chat
            .complete(
                &[ChatMessage::user(prompt)],
                self.config.temperature,
                self.config.max_tokens,
            )
            .await
    }
}

/// 宽容地解析 JSON：先按原文解析，失败后提取最外层 `{...}` 重试
fn parse_json_lenient(content: &str) -> Result<serde_json::Value> {
    if let Ok(value) = serde_json::from_str(content) {
        return Ok(value);
    }

    let extracted = extract_json_object(content)
        .ok_or_else(|| AppError::Serialization("响应中未找到 JSON 对象".to_string()))?;
    serde_json::from_str(extracted)
        .map_err(|e| AppError::Serialization(format!("响应 JSON 解析失败: {e}")))
}

/// 定位最外层的 `{...}` 片段
fn extract_json_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

/// 解析大五人格响应，五个整数字段缺一不可
pub(crate) fn parse_trait_scores(content: &str) -> Result<TraitScores> {
    let value = parse_json_lenient(content)?;
    let field = |key: &str| -> Result<i64> {
        value
            .get(key)
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| AppError::Serialization(format!("字段 {key} 缺失或不是整数")))
    };

    TraitScores::new(
        field("openness")?,
        field("conscientiousness")?,
        field("extraversion")?,
        field("agreeableness")?,
        field("neuroticism")?,
    )
}

/// 解析 MBTI 响应
pub(crate) fn parse_type_classification(content: &str) -> Result<TypeClassification> {
    let value = parse_json_lenient(content)?;

    let type_code = value
        .get("mbti_type")
        .and_then(serde_json::Value::as_str)
        .ok_or_else(|| AppError::Serialization("字段 mbti_type 缺失或不是字符串".to_string()))?;
    let confidence = value
        .get("confidence")
        .and_then(serde_json::Value::as_f64)
        .ok_or_else(|| AppError::Serialization("字段 confidence 缺失或不是数值".to_string()))?;

    let dimensions = value
        .get("dimension_scores")
        .ok_or_else(|| AppError::Serialization("字段 dimension_scores 缺失".to_string()))?;
    let dimension = |key: &str| -> Result<f64> {
        dimensions
            .get(key)
            .and_then(serde_json::Value::as_f64)
            .ok_or_else(|| AppError::Serialization(format!("维度 {key} 缺失或不是数值")))
    };

    TypeClassification::new(
        type_code,
        confidence,
        dimension("E-I")?,
        dimension("S-N")?,
        dimension("T-F")?,
        dimension("J-P")?,
    )
}
