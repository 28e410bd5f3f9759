//! 报告渲染服务
//!
//! 把完整的 [`AnalysisResult`] 确定性地渲染为规范的 Markdown 文本。
//! 章节顺序固定，数据缺席的章节整体省略而不是渲染为空。

use crate::models::AnalysisResult;
use chrono::{Local, TimeZone};

/// 进度条段数
const PROGRESS_BAR_SEGMENTS: usize = 10;

/// 生成文本进度条，实心段数 = score / 10（向下取整）
pub fn progress_bar(score: u8) -> String {
    let filled = (score / 10) as usize;
    let bar: String = "█".repeat(filled) + &"░".repeat(PROGRESS_BAR_SEGMENTS - filled);
    format!("{bar} {score}/100")
}

/// 16 型人格描述查找表，未知类型码渲染为“未知类型”
pub fn type_description(type_code: &str) -> &'static str {
    match type_code {
        "INTJ" => "建筑师型 - 富有想象力和战略性的思想家",
        "INTP" => "逻辑学家型 - 具有创新精神的发明家",
        "ENTJ" => "指挥官型 - 大胆、富有想象力的强大领导者",
        "ENTP" => "辩论家型 - 聪明好奇的思想家",
        "INFJ" => "提倡者型 - 安静而神秘的理想主义者",
        "INFP" => "调停者型 - 诗意、善良的利他主义者",
        "ENFJ" => "主人公型 - 富有魅力、鼓舞人心的领导者",
        "ENFP" => "竞选者型 - 热情、有创造力的社交者",
        "ISTJ" => "物流师型 - 实用、注重事实的可靠者",
        "ISFJ" => "守卫者型 - 非常专注、温暖的保护者",
        "ESTJ" => "总经理型 - 出色的管理者",
        "ESFJ" => "执政官型 - 极有同情心、受欢迎的人",
        "ISTP" => "鉴赏家型 - 大胆而实际的实验者",
        "ISFP" => "探险家型 - 灵活、有魅力的艺术家",
        "ESTP" => "企业家型 - 精明、善于感知的实干者",
        "ESFP" => "表演者型 - 自发的、充满活力的表演者",
        _ => "未知类型",
    }
}

/// 渲染 Markdown 格式分析报告
pub fn render_report(result: &AnalysisResult) -> String {
    let mut lines: Vec<String> = Vec::new();

    lines.push("# 📊 用户性格分析报告".to_string());
    lines.push(String::new());
    lines.push(format!("**分析对象**: {}", result.target_username));
    lines.push(format!(
        "**分析时间**: {}",
        format_datetime(result.analysis_timestamp)
    ));
    lines.push(format!(
        "**数据范围**: {} 至 {}",
        format_date(result.time_range_start),
        format_date(result.time_range_end)
    ));
    lines.push(format!("**样本量**: {} 条消息", result.message_sample_size));
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    if let Some(scores) = &result.trait_scores {
        lines.push("## 🎯 大五人格评估".to_string());
        lines.push(String::new());

        let traits = [
            ("开放性 (Openness)", scores.openness, "对新体验的接受程度、创造性、好奇心"),
            ("尽责性 (Conscientiousness)", scores.conscientiousness, "组织性、可靠性、自律性"),
            ("外向性 (Extraversion)", scores.extraversion, "社交性、活力、主动性"),
            ("宜人性 (Agreeableness)", scores.agreeableness, "合作性、同理心、友善性"),
            ("神经质 (Neuroticism)", scores.neuroticism, "情绪稳定性（分数越低越稳定）"),
        ];
        for (name, score, description) in traits {
            lines.push(format!("**{name}**"));
            lines.push(progress_bar(score));
            lines.push(description.to_string());
            lines.push(String::new());
        }
        lines.push("---".to_string());
        lines.push(String::new());
    }

    if let Some(classification) = &result.type_classification {
        if !classification.is_fallback() {
            lines.push("## 🧩 MBTI人格类型".to_string());
            lines.push(String::new());
            lines.push(format!(
                "**类型**: **{}** - {}",
                classification.type_code,
                type_description(&classification.type_code)
            ));
            lines.push(format!(
                "**置信度**: {:.1}%",
                classification.confidence * 100.0
            ));
            lines.push(String::new());
            lines.push("**各维度倾向**:".to_string());

            let dims = &classification.dimension_scores;
            let ei_label = if dims.e_i > 0.5 { "外向(E)" } else { "内向(I)" };
            let sn_label = if dims.s_n > 0.5 { "直觉(N)" } else { "感觉(S)" };
            let tf_label = if dims.t_f > 0.5 { "情感(F)" } else { "思考(T)" };
            let jp_label = if dims.j_p > 0.5 { "知觉(P)" } else { "判断(J)" };

            lines.push(format!("- 能量来源: {ei_label} ({:.0}%)", dims.e_i * 100.0));
            lines.push(format!("- 信息处理: {sn_label} ({:.0}%)", dims.s_n * 100.0));
            lines.push(format!("- 决策方式: {tf_label} ({:.0}%)", dims.t_f * 100.0));
            lines.push(format!("- 生活态度: {jp_label} ({:.0}%)", dims.j_p * 100.0));
            lines.push(String::new());
            lines.push("---".to_string());
            lines.push(String::new());
        }
    }

    if !result.behavior_patterns.is_empty() {
        lines.push("## 🔍 行为模式洞察".to_string());
        lines.push(String::new());
        for pattern in &result.behavior_patterns {
            lines.push(format!("- {pattern}"));
        }
        lines.push(String::new());
        lines.push("---".to_string());
        lines.push(String::new());
    }

    lines.push("## 💬 沟通风格".to_string());
    lines.push(String::new());
    lines.push(result.communication_style.clone());
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## 😊 情感倾向".to_string());
    lines.push(String::new());
    lines.push(result.emotional_tendency.clone());
    lines.push(String::new());
    lines.push("---".to_string());
    lines.push(String::new());

    lines.push("## 🎨 综合性格画像".to_string());
    lines.push(String::new());
    lines.push(result.personality_summary.clone());
    lines.push(String::new());

    lines.push("---".to_string());
    lines.push(String::new());
    lines.push(
        "> ⚠️ **免责声明**: 本报告基于聊天记录的AI分析生成，仅供娱乐参考，不构成专业心理评估。"
            .to_string(),
    );

    lines.join("\n")
}

fn format_datetime(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.format("%Y-%m-%d %H:%M:%S").to_string(),
        None => timestamp.to_string(),
    }
}

fn format_date(timestamp: i64) -> String {
    match Local.timestamp_opt(timestamp, 0).single() {
        Some(datetime) => datetime.format("%Y-%m-%d").to_string(),
        None => timestamp.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{TraitScores, TypeClassification};
    use rstest::rstest;

    fn base_result() -> AnalysisResult {
        AnalysisResult {
            target_user_id: "user_1".into(),
            target_username: "小明".into(),
            analysis_timestamp: 1_700_000_000,
            message_sample_size: 60,
            time_range_start: 1_700_000_000 - 30 * 86400,
            time_range_end: 1_700_000_000,
            trait_scores: None,
            type_classification: None,
            personality_summary: "综合来看，小明是一个有独特个性的人。".into(),
            behavior_patterns: vec![],
            communication_style: "该用户的沟通风格表现为：倾向简洁沟通，言简意赅；".into(),
            emotional_tendency: "从情感表达来看，该用户的情感表达处于正常范围。".into(),
            report_markdown: String::new(),
        }
    }

    #[rstest]
    #[case(0, "░░░░░░░░░░ 0/100")]
    #[case(55, "█████░░░░░ 55/100")]
    #[case(100, "██████████ 100/100")]
    fn test_progress_bar(#[case] score: u8, #[case] expected: &str) {
        assert_eq!(progress_bar(score), expected);
    }

    #[test]
    fn test_type_description_lookup() {
        assert!(type_description("INFP").contains("调停者型"));
        assert_eq!(type_description("ABCD"), "未知类型");
    }

    #[test]
    fn test_absent_sections_are_omitted() {
        let report = render_report(&base_result());
        assert!(report.starts_with("# 📊 用户性格分析报告"));
        assert!(!report.contains("大五人格评估"));
        assert!(!report.contains("MBTI人格类型"));
        assert!(!report.contains("行为模式洞察"));
        assert!(report.contains("## 💬 沟通风格"));
        assert!(report.contains("免责声明"));
    }

    #[test]
    fn test_trait_section_rendered_when_present() {
        let mut result = base_result();
        result.trait_scores = Some(TraitScores::new(72, 58, 66, 80, 35).unwrap());

        let report = render_report(&result);
        assert!(report.contains("## 🎯 大五人格评估"));
        assert!(report.contains("███████░░░ 72/100"));
        assert!(report.contains("神经质 (Neuroticism)"));
    }

    #[test]
    fn test_fallback_type_section_is_suppressed() {
        let mut result = base_result();
        result.type_classification = Some(TypeClassification::neutral());

        let report = render_report(&result);
        assert!(!report.contains("MBTI人格类型"));
        assert!(!report.contains("XXXX"));
    }

    #[test]
    fn test_type_section_with_dimension_labels() {
        let mut result = base_result();
        result.type_classification =
            Some(TypeClassification::new("ENFP", 0.82, 0.7, 0.6, 0.65, 0.8).unwrap());

        let report = render_report(&result);
        assert!(report.contains("**类型**: **ENFP** - 竞选者型"));
        assert!(report.contains("**置信度**: 82.0%"));
        assert!(report.contains("- 能量来源: 外向(E) (70%)"));
        assert!(report.contains("- 生活态度: 知觉(P) (80%)"));
    }

    #[test]
    fn test_behavior_tags_rendered_in_order() {
        let mut result = base_result();
        result.behavior_patterns = vec![
            "傍晚时段活跃".into(),
            "emoji爱好者（频繁使用表情符号）".into(),
        ];

        let report = render_report(&result);
        let tags_index = report.find("## 🔍 行为模式洞察").unwrap();
        let evening_index = report.find("- 傍晚时段活跃").unwrap();
        let emoji_index = report.find("- emoji爱好者").unwrap();
        assert!(tags_index < evening_index && evening_index < emoji_index);
    }

    #[test]
    fn test_rendering_is_deterministic() {
        let mut result = base_result();
        result.trait_scores = Some(TraitScores::neutral());
        assert_eq!(render_report(&result), render_report(&result));
    }
}
