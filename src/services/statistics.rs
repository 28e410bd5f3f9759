//! 消息统计服务
//!
//! 对消息样本做纯函数聚合：计数、平均长度、本地时段分布、
//! 表情/提及/提问计数。相同输入必得相同输出，无副作用。

use crate::models::{MessageRecord, MessageStatistics, TimeBucket};
use chrono::{Local, TimeZone, Timelike};
use once_cell::sync::Lazy;
use regex::Regex;

/// 表情符号范围：常用图形符号、表情与交通符号区段
static EMOJI_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{1F300}-\x{1F9FF}\x{1F600}-\x{1F64F}\x{1F680}-\x{1F6FF}]")
        .expect("emoji 正则无效")
});

/// 分析消息统计信息
///
/// 空样本返回全零统计（四时段均为 0），不报错。
pub fn analyze_messages(messages: &[MessageRecord]) -> MessageStatistics {
    if messages.is_empty() {
        return MessageStatistics::default();
    }

    let mut stats = MessageStatistics {
        total_count: messages.len() as u32,
        ..Default::default()
    };
    let mut total_length: u64 = 0;

    for message in messages {
        total_length += message.content.chars().count() as u64;

        stats
            .time_distribution
            .increment(TimeBucket::from_hour(local_hour(message.send_timestamp)));

        stats.emoji_count += EMOJI_PATTERN.find_iter(&message.content).count() as u32;

        if message.content.contains('@') {
            stats.mention_count += 1;
        }

        if message.content.contains('?') || message.content.contains('？') {
            stats.question_count += 1;
        }
    }

    stats.avg_length = total_length as f64 / messages.len() as f64;
    stats
}

/// 取时间戳对应的本地小时
fn local_hour(timestamp: i64) -> u32 {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.hour(),
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record_at(content: &str, hour: u32) -> MessageRecord {
        let timestamp = Local
            .with_ymd_and_hms(2024, 6, 1, hour, 30, 0)
            .unwrap()
            .timestamp();
        MessageRecord {
            chat_key: "group_1".into(),
            sender_id: "user_1".into(),
            sender_name: "小明".into(),
            content: content.into(),
            send_timestamp: timestamp,
            is_system: false,
            is_recalled: false,
        }
    }

    #[test]
    fn test_empty_sample_returns_zeroed_statistics() {
        let stats = analyze_messages(&[]);
        assert_eq!(stats.total_count, 0);
        assert_eq!(stats.avg_length, 0.0);
        assert_eq!(stats.time_distribution.total(), 0);
        assert_eq!(stats.emoji_count, 0);
        assert_eq!(stats.mention_count, 0);
        assert_eq!(stats.question_count, 0);
    }

    #[test]
    fn test_buckets_sum_to_total_count() {
        let messages = vec![
            record_at("早安", 7),
            record_at("午饭吃什么", 13),
            record_at("下班了", 19),
            record_at("睡不着", 2),
            record_at("又是一天", 23),
        ];
        let stats = analyze_messages(&messages);
        assert_eq!(stats.total_count, 5);
        assert_eq!(stats.time_distribution.total(), stats.total_count);
        assert_eq!(stats.time_distribution.morning, 1);
        assert_eq!(stats.time_distribution.afternoon, 1);
        assert_eq!(stats.time_distribution.evening, 1);
        assert_eq!(stats.time_distribution.night, 2);
    }

    #[test]
    fn test_average_length_in_chars() {
        let messages = vec![record_at("一二三四", 10), record_at("一二", 10)];
        let stats = analyze_messages(&messages);
        assert_eq!(stats.avg_length, 3.0);
    }

    #[test]
    fn test_emoji_counted_per_occurrence() {
        let messages = vec![record_at("今天超开心😀😀🚀", 10), record_at("平平无奇", 10)];
        let stats = analyze_messages(&messages);
        assert_eq!(stats.emoji_count, 3);
    }

    #[test]
    fn test_mention_and_question_counted_per_message() {
        let messages = vec![
            record_at("@小红 @小刚 在吗？", 10),
            record_at("这是什么？？？", 10),
            record_at("全角问号也算吗？", 10),
            record_at("没有问题", 10),
        ];
        let stats = analyze_messages(&messages);
        // 提及和提问都按消息计数，而不是按出现次数
        assert_eq!(stats.mention_count, 1);
        assert_eq!(stats.question_count, 3);
    }

    #[test]
    fn test_reserved_sentiment_counts_stay_zero() {
        let stats = analyze_messages(&[record_at("开心到飞起", 10)]);
        assert_eq!(stats.positive_count, 0);
        assert_eq!(stats.negative_count, 0);
    }
}
