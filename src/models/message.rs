//! 聊天消息数据模型
//!
//! 消息由外部消息存储所有，本核心仅持有只读视图。
//! `MessageSource` 抽象了消息采集的过滤契约。

use crate::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

/// 聊天消息记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    /// 会话标识
    pub chat_key: String,

    /// 发送者平台 ID
    pub sender_id: String,

    /// 发送者昵称
    pub sender_name: String,

    /// 消息文本内容
    pub content: String,

    /// 发送时间（Unix 秒）
    pub send_timestamp: i64,

    /// 是否系统消息
    pub is_system: bool,

    /// 是否已撤回
    pub is_recalled: bool,
}

impl MessageRecord {
    /// 消息是否可用于分析
    ///
    /// 过滤条件：未撤回、非系统消息、去除首尾空白后长度不小于 2。
    pub fn is_usable(&self) -> bool {
        !self.is_recalled && !self.is_system && self.content.trim().chars().count() >= 2
    }
}

/// 消息来源
///
/// 采集契约：返回指定会话中指定用户在 `start_time` 之后的消息，
/// 按时间倒序（最新在前），最多 `max_messages` 条，且仅包含可用消息
/// （见 [`MessageRecord::is_usable`]）。
#[async_trait]
pub trait MessageSource: Send + Sync {
    async fn query_user_messages(
        &self,
        chat_key: &str,
        user_id: &str,
        start_time: i64,
        max_messages: usize,
    ) -> Result<Vec<MessageRecord>>;
}

/// 内存消息来源
///
/// 用于测试与开发环境，按 (chat_key, sender_id) 维护消息列表。
#[derive(Default)]
pub struct InMemoryMessageSource {
    messages: DashMap<(String, String), Vec<MessageRecord>>,
}

impl InMemoryMessageSource {
    /// 创建空的内存消息来源
    pub fn new() -> Self {
        Self::default()
    }

    /// 写入一条消息
    pub fn push(&self, message: MessageRecord) {
        self.messages
            .entry((message.chat_key.clone(), message.sender_id.clone()))
            .or_default()
            .push(message);
    }

    /// 批量写入消息
    pub fn extend(&self, messages: impl IntoIterator<Item = MessageRecord>) {
        for message in messages {
            self.push(message);
        }
    }
}

#[async_trait]
impl MessageSource for InMemoryMessageSource {
    async fn query_user_messages(
        &self,
        chat_key: &str,
        user_id: &str,
        start_time: i64,
        max_messages: usize,
    ) -> Result<Vec<MessageRecord>> {
        let key = (chat_key.to_string(), user_id.to_string());
        let mut result: Vec<MessageRecord> = match self.messages.get(&key) {
            Some(entry) => entry
                .iter()
                .filter(|m| m.send_timestamp >= start_time)
                .cloned()
                .collect(),
            None => Vec::new(),
        };

        result.sort_by(|a, b| b.send_timestamp.cmp(&a.send_timestamp));
        result.truncate(max_messages);
        result.retain(MessageRecord::is_usable);

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(content: &str, timestamp: i64) -> MessageRecord {
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
    fn test_usable_filters() {
        assert!(record("你好呀", 0).is_usable());
        assert!(!record("嗯", 0).is_usable());
        assert!(!record("  a  ", 0).is_usable());

        let mut recalled = record("撤回的消息", 0);
        recalled.is_recalled = true;
        assert!(!recalled.is_usable());

        let mut system = record("系统提示消息", 0);
        system.is_system = true;
        assert!(!system.is_usable());
    }

    #[tokio::test]
    async fn test_query_orders_newest_first_and_limits() {
        let source = InMemoryMessageSource::new();
        for ts in [100, 300, 200] {
            source.push(record(&format!("消息 {ts}"), ts));
        }

        let messages = source
            .query_user_messages("group_1", "user_1", 0, 2)
            .await
            .unwrap();

        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].send_timestamp, 300);
        assert_eq!(messages[1].send_timestamp, 200);
    }

    #[tokio::test]
    async fn test_query_respects_start_time() {
        let source = InMemoryMessageSource::new();
        source.push(record("旧消息内容", 100));
        source.push(record("新消息内容", 500));

        let messages = source
            .query_user_messages("group_1", "user_1", 200, 10)
            .await
            .unwrap();

        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].send_timestamp, 500);
    }
}
