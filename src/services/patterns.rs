//! 行为模式识别服务
//!
//! 由一组按固定顺序求值的阈值规则组成，每条规则独立决定是否产出
//! 一个标签。比例类规则在总数为 0 时视为无定义并跳过。

use crate::models::{MessageStatistics, TimeBucket};

/// 单条行为模式规则
type PatternRule = fn(&MessageStatistics) -> Option<String>;

/// 规则表，求值顺序即标签顺序
const RULES: &[PatternRule] = &[
    dominant_time_rule,
    mention_rule,
    emoji_rule,
    length_rule,
    question_rule,
];

/// 识别行为模式标签
pub fn detect_patterns(stats: &MessageStatistics) -> Vec<String> {
    RULES.iter().filter_map(|rule| rule(stats)).collect()
}

/// 规则一：主导时段，并列时取枚举顺序靠前的时段
fn dominant_time_rule(stats: &MessageStatistics) -> Option<String> {
    let label = match stats.time_distribution.dominant() {
        TimeBucket::Morning => "早起鸟（经常在早晨活跃）",
        TimeBucket::Afternoon => "午间活跃者（下午时段最为活跃）",
        TimeBucket::Evening => "傍晚时段活跃",
        TimeBucket::Night => "夜猫子（深夜时段活跃）",
    };
    Some(label.to_string())
}

/// 规则二：提及比例 > 0.3 或 < 0.1（互斥，可同时缺席）
fn mention_rule(stats: &MessageStatistics) -> Option<String> {
    let ratio = stats.mention_ratio()?;
    if ratio > 0.3 {
        Some("高频互动者（喜欢@他人）".to_string())
    } else if ratio < 0.1 {
        Some("独立表达者（较少@他人）".to_string())
    } else {
        None
    }
}

/// 规则三：表情比例 > 0.5 或 < 0.1（互斥）
fn emoji_rule(stats: &MessageStatistics) -> Option<String> {
    let ratio = stats.emoji_ratio()?;
    if ratio > 0.5 {
        Some("emoji爱好者（频繁使用表情符号）".to_string())
    } else if ratio < 0.1 {
        Some("纯文本派（很少使用表情）".to_string())
    } else {
        None
    }
}

/// 规则四：平均长度 > 50 或 < 15（互斥）
fn length_rule(stats: &MessageStatistics) -> Option<String> {
    if stats.avg_length > 50.0 {
        Some("详细表达者（消息通常较长）".to_string())
    } else if stats.avg_length < 15.0 {
        Some("简洁派（消息简短精炼）".to_string())
    } else {
        None
    }
}

/// 规则五：提问比例 > 0.3
fn question_rule(stats: &MessageStatistics) -> Option<String> {
    let ratio = stats.question_ratio()?;
    (ratio > 0.3).then(|| "好奇提问者（经常提出问题）".to_string())
}
