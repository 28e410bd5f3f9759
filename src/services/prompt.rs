//! 分析输入构建服务
//!
//! 把消息样本与统计信息整理成一段模型输入文本。清洗与截断不可逆，
//! 两次推理调用共用同一个输入块。

use crate::models::{MessageRecord, MessageStatistics};
use chrono::{Local, TimeZone};
use once_cell::sync::Lazy;
use regex::Regex;

/// 进入模型输入的消息条数上限（与调用方配置的最大消息数无关）
pub const PROMPT_SAMPLE_LIMIT: usize = 100;

static CQ_CODE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[CQ:.*?\]").expect("CQ 码正则无效"));
static WHITESPACE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("空白正则无效"));
static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"1[3-9]\d{9}").expect("手机号正则无效"));
static NATIONAL_ID_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{17}[\dXx]").expect("身份证正则无效"));

/// 清洗消息文本
///
/// 依次：剥离平台内联标记、折叠空白、掩码手机号、掩码身份证号、去首尾空白。
pub fn clean_message_text(text: &str) -> String {
    let text = CQ_CODE_PATTERN.replace_all(text, "");
    let text = WHITESPACE_PATTERN.replace_all(&text, " ");
    let text = PHONE_PATTERN.replace_all(&text, "[手机号]");
    let text = NATIONAL_ID_PATTERN.replace_all(&text, "[身份证]");
    text.trim().to_string()
}

/// 构建分析输入文本块
///
/// 取样本前 [`PROMPT_SAMPLE_LIMIT`] 条（保持原有顺序），逐条清洗并
/// 标注本地时间，末尾附统计摘要。
pub fn build_analysis_input(messages: &[MessageRecord], stats: &MessageStatistics) -> String {
    let sample = &messages[..messages.len().min(PROMPT_SAMPLE_LIMIT)];

    let mut message_texts = Vec::with_capacity(sample.len());
    for message in sample {
        let cleaned = clean_message_text(&message.content);
        if cleaned.is_empty() {
            continue;
        }
        let timestamp = format_local_time(message.send_timestamp);
        message_texts.push(format!("[{timestamp}] {cleaned}"));
    }

    let mut input = String::from("消息样本：\n");
    input.push_str(&message_texts.join("\n"));
    input.push_str("\n\n统计信息：\n");
    input.push_str(&format!("- 总消息数：{}\n", stats.total_count));
    input.push_str(&format!("- 平均消息长度：{:.1}字\n", stats.avg_length));
    input.push_str(&format!(
        "- 时间分布：早晨{}条，下午{}条，傍晚{}条，夜晚{}条\n",
        stats.time_distribution.morning,
        stats.time_distribution.afternoon,
        stats.time_distribution.evening,
        stats.time_distribution.night,
    ));
    input.push_str(&format!("- 表情符号使用：{}次\n", stats.emoji_count));
    input.push_str(&format!("- @他人频率：{}次\n", stats.mention_count));
    input.push_str(&format!("- 提问频率：{}次\n", stats.question_count));

    input
}

fn format_local_time(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.format("%H:%M").to_string(),
        None => "00:00".to_string(),
    }
}
