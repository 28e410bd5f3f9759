//! 分析结果缓存
//!
//! 以 (会话, 用户) 为键缓存序列化的 [`AnalysisResult`]，读取时校验
//! 有效期。损坏或无法读取的缓存一律按缺失处理，不向调用方抛出。

use crate::error::Result;
use crate::models::AnalysisResult;
use crate::storage::kv::KvStore;
use std::sync::Arc;
use tracing::{error, info, warn};

/// 分析结果缓存
#[derive(Clone)]
pub struct AnalysisCache {
    store: Arc<dyn KvStore>,
    expire_seconds: i64,
}

impl AnalysisCache {
    /// 创建缓存，`expire_days` 为分析结果的有效天数
    pub fn new(store: Arc<dyn KvStore>, expire_days: u32) -> Self {
        Self {
            store,
            expire_seconds: i64::from(expire_days) * 24 * 60 * 60,
        }
    }

    /// 组合缓存键
    fn cache_key(chat_key: &str, user_id: &str) -> String {
        format!("analysis_{user_id}_{chat_key}")
    }

    /// 读取有效的缓存结果
    ///
    /// 过期、损坏或底层读取失败均返回 `None`，只记录日志。
    /// 过期条目不在读取时物理删除，仅在逻辑上不可见。
    pub async fn get(&self, chat_key: &str, user_id: &str) -> Option<AnalysisResult> {
        let key = Self::cache_key(chat_key, user_id);

        let payload = match self.store.get(&key).await {
            Ok(Some(payload)) => payload,
            Ok(None) => return None,
            Err(e) => {
                warn!("读取缓存失败: {key}: {e}");
                return None;
            }
        };

        let result: AnalysisResult = match serde_json::from_str(&payload) {
            Ok(result) => result,
            Err(e) => {
                error!("解析缓存数据失败: {key}: {e}");
                return None;
            }
        };

        let age = chrono::Utc::now().timestamp() - result.analysis_timestamp;
        if age >= self.expire_seconds {
            info!("缓存已过期: {key}");
            return None;
        }

        Some(result)
    }

    /// 写入分析结果
    pub async fn set(&self, chat_key: &str, user_id: &str, result: &AnalysisResult) -> Result<()> {
        let key = Self::cache_key(chat_key, user_id);
        let payload = serde_json::to_string(result)?;
        self.store.set(&key, &payload).await?;
        info!("已缓存分析结果: {key}");
        Ok(())
    }

    /// 删除缓存条目，幂等
    pub async fn delete(&self, chat_key: &str, user_id: &str) -> Result<()> {
        let key = Self::cache_key(chat_key, user_id);
        self.store.delete(&key).await?;
        info!("已清除缓存: {key}");
        Ok(())
    }
}
