//! 叙述合成服务
//!
//! 由统计信息和人格评分驱动的规则表，拼出沟通风格、情感倾向与
//! 综合画像三段叙述文本。规则按固定顺序独立求值。

use crate::models::{MessageStatistics, TraitScores};

/// 叙述片段规则：谓词命中则拼接对应文本
struct StyleFragment {
    applies: fn(&MessageStatistics) -> bool,
    text: &'static str,
}

/// 沟通风格片段表
const STYLE_FRAGMENTS: &[StyleFragment] = &[
    StyleFragment {
        applies: |s| s.avg_length > 50.0,
        text: "喜欢详细表达，消息内容丰富；",
    },
    StyleFragment {
        applies: |s| s.avg_length <= 50.0,
        text: "倾向简洁沟通，言简意赅；",
    },
    StyleFragment {
        applies: |s| s.emoji_ratio().is_some_and(|r| r > 0.3),
        text: "频繁使用表情符号增强表达；",
    },
    StyleFragment {
        applies: |s| s.mention_ratio().is_some_and(|r| r > 0.2),
        text: "主动与他人互动，喜欢@提及他人。",
    },
];

/// 合成沟通风格描述
pub fn compose_communication_style(stats: &MessageStatistics) -> String {
    let mut text = String::from("该用户的沟通风格表现为：");
    for fragment in STYLE_FRAGMENTS {
        if (fragment.applies)(stats) {
            text.push_str(fragment.text);
        }
    }
    text
}

/// 情感倾向规则：首个命中的谓词决定结论
struct TendencyRule {
    applies: fn(Option<&TraitScores>) -> bool,
    text: &'static str,
}

const TENDENCY_RULES: &[TendencyRule] = &[
    TendencyRule {
        applies: |t| t.is_some_and(|t| t.neuroticism < 40),
        text: "该用户情绪较为稳定，表现出良好的心理韧性。",
    },
    TendencyRule {
        applies: |t| t.is_some_and(|t| t.neuroticism > 60),
        text: "该用户情感表达较为丰富，有时会表现出情绪波动。",
    },
    TendencyRule {
        applies: |_| true,
        text: "该用户的情感表达处于正常范围。",
    },
];

/// 合成情感倾向描述
pub fn compose_emotional_tendency(traits: Option<&TraitScores>) -> String {
    let mut text = String::from("从情感表达来看，");
    for rule in TENDENCY_RULES {
        if (rule.applies)(traits) {
            text.push_str(rule.text);
            break;
        }
    }
    text
}

/// 综合画像片段规则
struct SummaryFragment {
    applies: fn(&TraitScores) -> bool,
    text: &'static str,
}

const SUMMARY_FRAGMENTS: &[SummaryFragment] = &[
    SummaryFragment {
        applies: |t| t.extraversion > 60,
        text: "外向活跃、",
    },
    SummaryFragment {
        applies: |t| t.extraversion < 40,
        text: "内敛深思、",
    },
    SummaryFragment {
        applies: |t| t.openness > 60,
        text: "富有创造力、",
    },
    SummaryFragment {
        applies: |t| t.conscientiousness > 60,
        text: "做事认真、",
    },
    SummaryFragment {
        applies: |t| t.agreeableness > 60,
        text: "友善合作的人。",
    },
    SummaryFragment {
        applies: |t| t.agreeableness <= 60,
        text: "独立自主的人。",
    },
];

/// 合成综合性格画像
pub fn compose_summary(username: &str, traits: Option<&TraitScores>) -> String {
    let mut text = format!("综合来看，{username}是一个");
    match traits {
        Some(traits) => {
            for fragment in SUMMARY_FRAGMENTS {
                if (fragment.applies)(traits) {
                    text.push_str(fragment.text);
                }
            }
        }
        None => text.push_str("有独特个性的人。"),
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(
        openness: i64,
        conscientiousness: i64,
        extraversion: i64,
        agreeableness: i64,
        neuroticism: i64,
    ) -> TraitScores {
        TraitScores::new(
            openness,
            conscientiousness,
            extraversion,
            agreeableness,
            neuroticism,
        )
        .unwrap()
    }

    #[test]
    fn test_style_detailed_with_emoji_and_mentions() {
        let stats = MessageStatistics {
            total_count: 10,
            avg_length: 60.0,
            emoji_count: 4,
            mention_count: 3,
            ..Default::default()
        };
        let style = compose_communication_style(&stats);
        assert!(style.starts_with("该用户的沟通风格表现为：喜欢详细表达"));
        assert!(style.contains("频繁使用表情符号"));
        assert!(style.contains("喜欢@提及他人"));
    }

    #[test]
    fn test_style_concise_plain() {
        let stats = MessageStatistics {
            total_count: 10,
            avg_length: 8.0,
            ..Default::default()
        };
        assert_eq!(
            compose_communication_style(&stats),
            "该用户的沟通风格表现为：倾向简洁沟通，言简意赅；"
        );
    }

    #[test]
    fn test_tendency_thresholds() {
        let stable = scores(50, 50, 50, 50, 30);
        assert!(compose_emotional_tendency(Some(&stable)).contains("情绪较为稳定"));

        let volatile = scores(50, 50, 50, 50, 70);
        assert!(compose_emotional_tendency(Some(&volatile)).contains("情绪波动"));

        let neutral = scores(50, 50, 50, 50, 50);
        assert!(compose_emotional_tendency(Some(&neutral)).contains("正常范围"));

        assert!(compose_emotional_tendency(None).contains("正常范围"));
    }

    #[test]
    fn test_summary_with_scores() {
        let traits = scores(70, 70, 70, 70, 40);
        assert_eq!(
            compose_summary("小明", Some(&traits)),
            "综合来看，小明是一个外向活跃、富有创造力、做事认真、友善合作的人。"
        );

        let traits = scores(30, 30, 30, 30, 40);
        assert_eq!(
            compose_summary("小明", Some(&traits)),
            "综合来看，小明是一个内敛深思、独立自主的人。"
        );
    }

    #[test]
    fn test_summary_without_scores() {
        assert_eq!(
            compose_summary("小明", None),
            "综合来看，小明是一个有独特个性的人。"
        );
    }
}
