//! 配置模块
//!
//! 提供应用配置结构、加载与验证。

pub mod config;
pub mod loader;

pub use config::{AnalysisConfig, AppConfig, CacheConfig, LoggingConfig, ModelConfig, ServerConfig};
pub use loader::{ConfigLoader, ConfigValidationError};
