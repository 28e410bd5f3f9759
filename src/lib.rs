//! Persona - 聊天行为性格分析服务
//!
//! 基于聊天历史为指定用户生成性格画像：大五人格评分、MBTI 类型判断、
//! 行为模式标签与 Markdown 格式分析报告。结果仅供娱乐参考，
//! 不构成专业心理评估。

pub mod api;
pub mod config;
pub mod error;
pub mod llm;
pub mod mcp;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
