//! 业务服务模块
//!
//! 统计、输入构建、推理、模式识别、叙述合成、报告渲染与分析编排。

pub mod analyzer;
pub mod inference;
pub mod narrative;
pub mod patterns;
pub mod prompt;
pub mod report;
pub mod statistics;

pub use analyzer::{PersonalityAnalyzer, create_personality_analyzer};
pub use inference::InferenceEngine;
pub use patterns::detect_patterns;
pub use report::render_report;
pub use statistics::analyze_messages;
