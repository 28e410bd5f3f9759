//! 键值存储抽象
//!
//! 分析结果缓存的底层存储：字符串键到字符串负载，`get`/`set`/`delete`，
//! 除最后写入生效外不提供原子性保证。

use crate::error::{AppError, Result};
use async_trait::async_trait;
use dashmap::DashMap;
use redis::AsyncCommands;
use std::sync::Arc;

/// 键值存储
#[async_trait]
pub trait KvStore: Send + Sync {
    /// 读取键对应的负载
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// 写入键值，覆盖旧值
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// 删除键，键不存在时也视为成功
    async fn delete(&self, key: &str) -> Result<()>;
}

/// 内存键值存储
#[derive(Default)]
pub struct MemoryKvStore {
    entries: DashMap<String, String>,
}

impl MemoryKvStore {
    /// 创建空的内存存储
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|entry| entry.clone()))
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// Redis 键值存储
pub struct RedisKvStore {
    client: redis::Client,
}

impl RedisKvStore {
    /// 按地址创建 Redis 存储
    pub fn new(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url)
            .map_err(|e| AppError::Connection(format!("Redis 连接配置无效: {e}")))?;
        Ok(Self { client })
    }

    async fn connection(&self) -> Result<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| AppError::Connection(format!("Redis 连接失败: {e}")))
    }
}

#[async_trait]
impl KvStore for RedisKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.connection().await?;
        let value: Option<String> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.set(key, value).await?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.connection().await?;
        let _: () = conn.del(key).await?;
        Ok(())
    }
}

/// 按配置创建键值存储后端
pub fn create_kv_store(config: &crate::config::CacheConfig) -> Result<Arc<dyn KvStore>> {
    match config.backend.as_str() {
        "redis" => {
            tracing::info!("使用 Redis 缓存后端: {}", config.redis_url);
            Ok(Arc::new(RedisKvStore::new(&config.redis_url)?))
        }
        "memory" => {
            tracing::info!("使用内存缓存后端");
            Ok(Arc::new(MemoryKvStore::new()))
        }
        other => Err(AppError::Config(format!("未知的缓存后端: {other}"))),
    }
}
