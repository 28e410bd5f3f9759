//! 模型调用模块
//!
//! 定义统一的对话模型调用接口，一次调用对应一次补全，不支持流式输出。

pub mod openai;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use openai::OpenAiChatClient;

/// 对话轮次
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// 角色: "system" / "user" / "assistant"
    pub role: String,
    /// 文本内容
    pub content: String,
}

impl ChatMessage {
    /// 构造用户轮次
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// 对话模型客户端
///
/// 实现方负责网络与认证失败的错误转换；调用方（推理引擎）负责把
/// 任何失败吸收为确定性的回退值。
#[async_trait]
pub trait ChatClient: Send + Sync {
    /// 请求一次补全，返回模型输出的文本内容
    async fn complete(
        &self,
        messages: &[ChatMessage],
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String>;
}
