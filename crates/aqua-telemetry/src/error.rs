use thiserror::Error;

/// 遥测引擎错误类型
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TelemetryError {
    /// 设备不在固定设备表中
    #[error("Device {0} not found")]
    UnknownDevice(String),

    /// 设备表配置无效
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// 历史时间跨度无法表示（间隔不足 1 毫秒或总跨度过大）
    #[error("Invalid history span: {points} points every {interval_ms} ms")]
    InvalidHistorySpan { points: usize, interval_ms: u128 },
}

/// 遥测引擎结果类型
pub type Result<T> = std::result::Result<T, TelemetryError>;

impl TelemetryError {
    pub fn unknown_device(device_id: impl Into<String>) -> Self {
        TelemetryError::UnknownDevice(device_id.into())
    }

    pub fn invalid_config(msg: impl Into<String>) -> Self {
        TelemetryError::InvalidConfig(msg.into())
    }
}
