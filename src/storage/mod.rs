//! 存储模块
//!
//! 键值存储抽象与分析结果缓存。

pub mod cache;
pub mod kv;

pub use cache::AnalysisCache;
pub use kv::{KvStore, MemoryKvStore, RedisKvStore, create_kv_store};
