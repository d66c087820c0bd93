use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 日志初始化错误
#[derive(Error, Debug)]
pub enum LoggingError {
    /// 日志级别无效
    #[error("Invalid log level: {0}")]
    InvalidLevel(String),

    /// 全局订阅者已设置
    #[error("Failed to install subscriber: {0}")]
    InitFailed(String),
}

/// 日志输出格式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// 人类可读
    #[default]
    Pretty,
    /// JSON 行
    Json,
}

/// 日志配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认级别（trace/debug/info/warn/error），`RUST_LOG` 优先
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

impl LoggingConfig {
    pub fn validate(&self) -> Result<(), LoggingError> {
        self.level
            .parse::<tracing::Level>()
            .map(|_| ())
            .map_err(|_| LoggingError::InvalidLevel(self.level.clone()))
    }

    fn env_filter(&self) -> Result<EnvFilter, LoggingError> {
        self.validate()?;
        Ok(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&self.level)))
    }
}

/// 初始化全局日志
///
/// 进程内只能调用一次，重复调用返回 `InitFailed`
pub fn init_logging(config: &LoggingConfig) -> Result<(), LoggingError> {
    let filter = config.env_filter()?;
    let registry = tracing_subscriber::registry().with(filter);

    let result = match config.format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).try_init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init(),
    };

    result.map_err(|e| LoggingError::InitFailed(e.to_string()))
}
