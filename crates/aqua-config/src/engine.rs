use crate::device::{default_devices, DeviceConfig};
use aqua_logging::LoggingConfig;
use aqua_types::{metric_configs, DeviceProfile, MAX_HISTORY_SPAN_MS};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// 刷新周期上限（1 天）
pub const MAX_REFRESH_INTERVAL_MS: u64 = 86_400_000;

/// 引擎配置（engine.toml）
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    #[serde(default)]
    pub system: SystemConfig,
    #[serde(default)]
    pub refresh: RefreshConfig,
    #[serde(default)]
    pub history: HistoryConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default = "default_devices")]
    pub devices: Vec<DeviceConfig>,
}

/// 系统配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SystemConfig {
    pub name: String,
}

/// 刷新配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RefreshConfig {
    /// 刷新周期（毫秒）
    pub interval_ms: u64,
}

/// 历史数据配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// 数据点数
    pub points: usize,
    /// 采样间隔（毫秒）
    pub interval_ms: u64,
}

/// 模拟配置
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// 随机种子，未设置时使用系统熵
    pub seed: Option<u64>,
    /// 启动时选中的设备
    pub default_device: String,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: "Water Monitoring Dashboard".to_string(),
        }
    }
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self { interval_ms: 30_000 }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            points: 20,
            interval_ms: 60_000,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            default_device: "device-001".to_string(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            system: SystemConfig::default(),
            refresh: RefreshConfig::default(),
            history: HistoryConfig::default(),
            simulation: SimulationConfig::default(),
            logging: LoggingConfig::default(),
            devices: default_devices(),
        }
    }
}

impl EngineConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_millis(self.refresh.interval_ms)
    }

    pub fn history_interval(&self) -> Duration {
        Duration::from_millis(self.history.interval_ms)
    }

    /// 设备表
    pub fn device_profiles(&self) -> Vec<DeviceProfile> {
        self.devices.iter().map(DeviceProfile::from).collect()
    }

    /// 序列化为 TOML
    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// 验证配置
    pub fn validate(&self) -> Result<()> {
        if self.refresh.interval_ms == 0 || self.refresh.interval_ms > MAX_REFRESH_INTERVAL_MS {
            return Err(anyhow!(
                "refresh.interval_ms must be within 1..={}",
                MAX_REFRESH_INTERVAL_MS
            ));
        }
        if self.history.points == 0 {
            return Err(anyhow!("history.points must be greater than 0"));
        }
        if self.history.interval_ms == 0 {
            return Err(anyhow!("history.interval_ms must be greater than 0"));
        }
        let span_ms = u64::try_from(self.history.points - 1)
            .ok()
            .and_then(|steps| self.history.interval_ms.checked_mul(steps));
        if !matches!(span_ms, Some(ms) if ms <= MAX_HISTORY_SPAN_MS) {
            return Err(anyhow!(
                "history span of {} points every {} ms exceeds {} ms",
                self.history.points,
                self.history.interval_ms,
                MAX_HISTORY_SPAN_MS
            ));
        }
        if self.history.interval_ms > MAX_HISTORY_SPAN_MS {
            return Err(anyhow!(
                "history.interval_ms must not exceed {} ms",
                MAX_HISTORY_SPAN_MS
            ));
        }
        if self.devices.is_empty() {
            return Err(anyhow!("at least one device must be configured"));
        }

        let mut ids = HashSet::new();
        for device in &self.devices {
            if device.id.trim().is_empty() {
                return Err(anyhow!("device id cannot be empty"));
            }
            if !ids.insert(device.id.as_str()) {
                return Err(anyhow!("duplicate device id: {}", device.id));
            }

            let baselines = device.baselines.to_metric_map();
            for (metric, config) in metric_configs() {
                let value = baselines[metric];
                if value < config.clamp_floor() || value > config.clamp_ceiling() {
                    return Err(anyhow!(
                        "device {} baseline {} = {} is outside [{}, {}]",
                        device.id,
                        metric,
                        value,
                        config.clamp_floor(),
                        config.clamp_ceiling()
                    ));
                }
            }
        }

        if !ids.contains(self.simulation.default_device.as_str()) {
            return Err(anyhow!(
                "default device {} is not configured",
                self.simulation.default_device
            ));
        }

        self.logging.validate()?;
        Ok(())
    }
}
