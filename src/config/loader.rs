use crate::config::config::AppConfig;
use figment::{
    Figment,
    providers::{Env, Format, Toml},
};
use std::path::PathBuf;

/// 配置加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 从默认路径加载配置
    ///
    /// 搜索路径：
    /// 1. ./config.toml
    /// 2. 环境变量（PERSONA_ 前缀，双下划线分段）
    pub fn load() -> Result<AppConfig, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("PERSONA_").split("__"));

        figment.extract()
    }

    /// 从指定路径加载配置
    pub fn load_from(path: PathBuf) -> Result<AppConfig, figment::Error> {
        let figment = Figment::new()
            .merge(Toml::file(path))
            .merge(Env::prefixed("PERSONA_").split("__"));

        figment.extract()
    }

    /// 验证配置
    pub fn validate(config: &AppConfig) -> Result<(), ConfigValidationError> {
        if config.server.port == 0 {
            return Err(ConfigValidationError::InvalidPort);
        }

        if config.model.chat_model.is_empty() {
            return Err(ConfigValidationError::MissingChatModel);
        }

        if config.analysis.default_days == 0 || config.analysis.default_days > 365 {
            return Err(ConfigValidationError::InvalidDays);
        }

        if config.analysis.min_message_threshold == 0
            || config.analysis.default_max_messages < config.analysis.min_message_threshold
            || config.analysis.default_max_messages > 5000
        {
            return Err(ConfigValidationError::InvalidMessageBounds);
        }

        if config.cache.expire_days == 0 {
            return Err(ConfigValidationError::InvalidExpireDays);
        }

        match config.cache.backend.as_str() {
            "memory" | "redis" => {}
            other => return Err(ConfigValidationError::UnknownCacheBackend(other.to_string())),
        }

        Ok(())
    }
}

/// 配置验证错误
#[derive(thiserror::Error, Debug)]
pub enum ConfigValidationError {
    #[error("服务端口无效，必须大于 0")]
    InvalidPort,

    #[error("分析模型名称未配置")]
    MissingChatModel,

    #[error("默认分析天数无效，必须在 1 到 365 之间")]
    InvalidDays,

    #[error("消息数配置无效，最大消息数必须在最小阈值与 5000 之间")]
    InvalidMessageBounds,

    #[error("缓存过期天数无效，必须大于 0")]
    InvalidExpireDays,

    #[error("未知的缓存后端: {0}")]
    UnknownCacheBackend(String),
}

/// 获取默认配置文件路径
pub fn default_config_path() -> PathBuf {
    PathBuf::from("config.toml")
}

/// 检查配置文件是否存在
pub fn config_exists() -> bool {
    default_config_path().exists()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_default_config() {
        let config = AppConfig::development();
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_days() {
        let mut config = AppConfig::development();
        config.analysis.default_days = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidDays)
        ));

        config.analysis.default_days = 400;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidDays)
        ));
    }

    #[test]
    fn test_validate_rejects_bad_message_bounds() {
        let mut config = AppConfig::development();
        config.analysis.default_max_messages = 10;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::InvalidMessageBounds)
        ));
    }

    #[test]
    fn test_validate_rejects_unknown_backend() {
        let mut config = AppConfig::development();
        config.cache.backend = "sqlite".into();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigValidationError::UnknownCacheBackend(_))
        ));
    }
}
