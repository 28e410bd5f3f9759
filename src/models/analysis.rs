//! 性格分析结果数据模型
//!
//! `TraitScores` 与 `TypeClassification` 的取值约束在构造函数中强制：
//! 越界输入是调用方可见的构造失败，而不是被悄悄截断。

use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};

/// MBTI 分析失败时的哨兵类型码
pub const FALLBACK_TYPE_CODE: &str = "XXXX";

/// 大五人格评分，各维度取值 [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitScores {
    /// 开放性
    pub openness: u8,
    /// 尽责性
    pub conscientiousness: u8,
    /// 外向性
    pub extraversion: u8,
    /// 宜人性
    pub agreeableness: u8,
    /// 神经质（分数越高情绪越不稳定）
    pub neuroticism: u8,
}

impl TraitScores {
    /// 构造评分，任一维度越界即失败
    pub fn new(
        openness: i64,
        conscientiousness: i64,
        extraversion: i64,
        agreeableness: i64,
        neuroticism: i64,
    ) -> Result<Self> {
        let check = |name: &str, value: i64| -> Result<u8> {
            if (0..=100).contains(&value) {
                Ok(value as u8)
            } else {
                Err(AppError::Validation(format!(
                    "人格维度 {name} 取值越界: {value}（应在 0 到 100 之间）"
                )))
            }
        };

        Ok(Self {
            openness: check("openness", openness)?,
            conscientiousness: check("conscientiousness", conscientiousness)?,
            extraversion: check("extraversion", extraversion)?,
            agreeableness: check("agreeableness", agreeableness)?,
            neuroticism: check("neuroticism", neuroticism)?,
        })
    }

    /// 中性回退值：全部维度 50 分
    pub fn neutral() -> Self {
        Self {
            openness: 50,
            conscientiousness: 50,
            extraversion: 50,
            agreeableness: 50,
            neuroticism: 50,
        }
    }
}

/// MBTI 四维度得分，各维度取值 [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DimensionScores {
    /// 能量来源：越接近 0 越内向(I)，越接近 1 越外向(E)
    #[serde(rename = "E-I")]
    pub e_i: f64,

    /// 信息处理：越接近 0 越感觉(S)，越接近 1 越直觉(N)
    #[serde(rename = "S-N")]
    pub s_n: f64,

    /// 决策方式：越接近 0 越思考(T)，越接近 1 越情感(F)
    #[serde(rename = "T-F")]
    pub t_f: f64,

    /// 生活态度：越接近 0 越判断(J)，越接近 1 越知觉(P)
    #[serde(rename = "J-P")]
    pub j_p: f64,
}

/// MBTI 类型判断结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypeClassification {
    /// 四字母类型码，如 INFP；回退时为 [`FALLBACK_TYPE_CODE`]
    pub type_code: String,

    /// 置信度 [0, 1]
    pub confidence: f64,

    /// 各维度得分
    pub dimension_scores: DimensionScores,
}

impl TypeClassification {
    /// 构造分类结果，类型码或任一得分越界即失败
    pub fn new(
        type_code: &str,
        confidence: f64,
        e_i: f64,
        s_n: f64,
        t_f: f64,
        j_p: f64,
    ) -> Result<Self> {
        if type_code.len() != 4 || !type_code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AppError::Validation(format!(
                "MBTI 类型码无效: {type_code}（应为 4 个字母）"
            )));
        }

        let check = |name: &str, value: f64| -> Result<f64> {
            if (0.0..=1.0).contains(&value) {
                Ok(value)
            } else {
                Err(AppError::Validation(format!(
                    "MBTI 维度 {name} 取值越界: {value}（应在 0 到 1 之间）"
                )))
            }
        };

        Ok(Self {
            type_code: type_code.to_uppercase(),
            confidence: check("confidence", confidence)?,
            dimension_scores: DimensionScores {
                e_i: check("E-I", e_i)?,
                s_n: check("S-N", s_n)?,
                t_f: check("T-F", t_f)?,
                j_p: check("J-P", j_p)?,
            },
        })
    }

    /// 中性回退值：哨兵类型码，置信度与各维度均为 0.5
    pub fn neutral() -> Self {
        Self {
            type_code: FALLBACK_TYPE_CODE.to_string(),
            confidence: 0.5,
            dimension_scores: DimensionScores {
                e_i: 0.5,
                s_n: 0.5,
                t_f: 0.5,
                j_p: 0.5,
            },
        }
    }

    /// 是否为回退结果
    pub fn is_fallback(&self) -> bool {
        self.type_code == FALLBACK_TYPE_CODE
    }
}

/// 一次性格分析的完整结果
///
/// 按原样序列化写入缓存；`time_range_start < time_range_end` 且
/// `message_sample_size` 等于实际参与统计的消息数。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// 目标用户 ID
    pub target_user_id: String,

    /// 目标用户昵称
    pub target_username: String,

    /// 分析时间（Unix 秒）
    pub analysis_timestamp: i64,

    /// 样本消息数
    pub message_sample_size: usize,

    /// 数据范围起点（Unix 秒）
    pub time_range_start: i64,

    /// 数据范围终点（Unix 秒）
    pub time_range_end: i64,

    /// 大五人格评分（未启用时缺省）
    pub trait_scores: Option<TraitScores>,

    /// MBTI 分析结果（未启用时缺省）
    pub type_classification: Option<TypeClassification>,

    /// 综合性格画像
    pub personality_summary: String,

    /// 行为模式标签
    pub behavior_patterns: Vec<String>,

    /// 沟通风格描述
    pub communication_style: String,

    /// 情感倾向描述
    pub emotional_tendency: String,

    /// 渲染后的 Markdown 报告
    pub report_markdown: String,
}
