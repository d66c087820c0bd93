use aqua_types::{DeviceProfile, Metric, MetricMap};
use serde::{Deserialize, Serialize};

/// 设备配置
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DeviceConfig {
    pub id: String,
    pub name: String,
    pub location: String,
    pub baselines: BaselineConfig,
}

/// 各指标初始基线
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct BaselineConfig {
    #[serde(alias = "pH")]
    pub ph: f64,
    pub turbidity: f64,
    pub salinity: f64,
    #[serde(alias = "dissolvedOxygen")]
    pub dissolved_oxygen: f64,
    pub temperature: f64,
}

impl BaselineConfig {
    pub fn to_metric_map(&self) -> MetricMap<f64> {
        MetricMap::from_fn(|metric| match metric {
            Metric::Ph => self.ph,
            Metric::Turbidity => self.turbidity,
            Metric::Salinity => self.salinity,
            Metric::DissolvedOxygen => self.dissolved_oxygen,
            Metric::Temperature => self.temperature,
        })
    }
}

impl From<&MetricMap<f64>> for BaselineConfig {
    fn from(values: &MetricMap<f64>) -> Self {
        Self {
            ph: values[Metric::Ph],
            turbidity: values[Metric::Turbidity],
            salinity: values[Metric::Salinity],
            dissolved_oxygen: values[Metric::DissolvedOxygen],
            temperature: values[Metric::Temperature],
        }
    }
}

impl From<&DeviceConfig> for DeviceProfile {
    fn from(config: &DeviceConfig) -> Self {
        DeviceProfile::new(
            config.id.clone(),
            config.name.clone(),
            config.location.clone(),
            config.baselines.to_metric_map(),
        )
    }
}

impl From<DeviceProfile> for DeviceConfig {
    fn from(profile: DeviceProfile) -> Self {
        Self {
            baselines: BaselineConfig::from(&profile.baselines),
            id: profile.id,
            name: profile.name,
            location: profile.location,
        }
    }
}

/// 内置设备表
pub fn default_devices() -> Vec<DeviceConfig> {
    DeviceProfile::builtin()
        .into_iter()
        .map(DeviceConfig::from)
        .collect()
}
