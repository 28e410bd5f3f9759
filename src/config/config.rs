use serde::{Deserialize, Serialize};

/// 分析配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// 默认分析时间范围（天）
    pub default_days: u32,
    /// 默认最大分析消息数
    pub default_max_messages: usize,
    /// 最小消息样本量阈值，低于该值记录警告
    pub min_message_threshold: usize,
    /// 是否启用大五人格评估
    pub enable_big_five: bool,
    /// 是否启用 MBTI 类型判断
    pub enable_mbti: bool,
    /// 是否启用行为模式识别
    pub enable_behavior_pattern: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_days: 30,
            default_max_messages: 500,
            min_message_threshold: 50,
            enable_big_five: true,
            enable_mbti: true,
            enable_behavior_pattern: true,
        }
    }
}

/// 模型调用配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// 对话模型名称
    pub chat_model: String,
    /// OpenAI 兼容接口地址
    pub base_url: String,
    /// API 密钥
    pub api_key: String,
    /// 采样温度（低温度保证评分一致性）
    pub temperature: f32,
    /// 单次分析的最大输出 Token 数
    pub max_tokens: u32,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            chat_model: "gpt-4o-mini".into(),
            base_url: "https://api.openai.com".into(),
            api_key: String::new(),
            temperature: 0.3,
            max_tokens: 1024,
            request_timeout: 120,
        }
    }
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 缓存后端类型: "memory" 或 "redis"
    pub backend: String,
    /// Redis 地址
    pub redis_url: String,
    /// 分析结果缓存有效期（天）
    pub expire_days: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: "memory".into(),
            redis_url: "redis://localhost:6379".into(),
            expire_days: 7,
        }
    }
}

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// 服务地址
    pub host: String,
    /// 服务端口
    pub port: u16,
    /// 请求超时（秒）
    pub request_timeout: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            request_timeout: 300,
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 日志级别
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

/// 应用配置
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// 分析配置
    pub analysis: AnalysisConfig,
    /// 模型调用配置
    pub model: ModelConfig,
    /// 缓存配置
    pub cache: CacheConfig,
    /// 服务器配置
    pub server: ServerConfig,
    /// 日志配置
    pub logging: LoggingConfig,
    /// 应用名称
    pub app_name: String,
    /// 环境
    pub environment: String,
}

impl AppConfig {
    /// 创建开发环境配置
    pub fn development() -> Self {
        Self {
            logging: LoggingConfig {
                level: "debug".into(),
            },
            app_name: "persona".into(),
            environment: "development".into(),
            ..Default::default()
        }
    }

    /// 创建生产环境配置
    pub fn production() -> Self {
        let mut config = Self::development();
        config.environment = "production".into();
        config.logging.level = "info".into();
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.analysis.default_days, 30);
        assert_eq!(config.analysis.default_max_messages, 500);
        assert_eq!(config.analysis.min_message_threshold, 50);
        assert_eq!(config.cache.expire_days, 7);
        assert!(config.analysis.enable_big_five);
        assert!(config.analysis.enable_mbti);
        assert!(config.analysis.enable_behavior_pattern);
    }

    #[test]
    fn test_model_defaults() {
        let model = ModelConfig::default();
        assert!((model.temperature - 0.3).abs() < f32::EPSILON);
        assert_eq!(model.max_tokens, 1024);
    }
}
