use crate::metric::MetricMap;
use serde::{Deserialize, Serialize};

/// 设备档案
///
/// 固定设备表中的一项：标识、展示信息和各指标的初始基线
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceProfile {
    /// 设备 ID
    pub id: String,
    /// 设备名称
    pub name: String,
    /// 安装位置
    pub location: String,
    /// 初始基线
    pub baselines: MetricMap<f64>,
}

impl DeviceProfile {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        location: impl Into<String>,
        baselines: MetricMap<f64>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: location.into(),
            baselines,
        }
    }

    /// 内置的三站设备表
    pub fn builtin() -> Vec<DeviceProfile> {
        vec![
            DeviceProfile::new(
                "device-001",
                "Sensor Station Alpha",
                "North Monitoring Point",
                MetricMap::new([7.1, 1.8, 33.2, 8.8, 23.5]),
            ),
            DeviceProfile::new(
                "device-002",
                "Sensor Station Beta",
                "Central Monitoring Point",
                MetricMap::new([7.4, 3.2, 32.1, 7.9, 25.1]),
            ),
            DeviceProfile::new(
                "device-003",
                "Sensor Station Gamma",
                "South Monitoring Point",
                MetricMap::new([6.9, 2.1, 34.0, 8.2, 24.8]),
            ),
        ]
    }
}
