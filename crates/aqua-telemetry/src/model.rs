use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 设备信息（面向展示层）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    /// 设备 ID
    pub id: String,

    /// 设备名称
    pub name: String,

    /// 安装位置
    pub location: String,

    /// 连接状态
    pub status: DeviceStatus,

    /// 最后在线时间
    pub last_seen: DateTime<Utc>,
}

/// 设备连接状态
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DeviceStatus {
    /// 在线
    Online,
    /// 离线
    Offline,
    /// 告警
    Warning,
}

impl DeviceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceStatus::Online => "online",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Warning => "warning",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "online" => Some(DeviceStatus::Online),
            "offline" => Some(DeviceStatus::Offline),
            "warning" => Some(DeviceStatus::Warning),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_device_status_conversion() {
        for status in [DeviceStatus::Online, DeviceStatus::Offline, DeviceStatus::Warning] {
            assert_eq!(DeviceStatus::from_str(status.as_str()), Some(status));
        }
        assert_eq!(DeviceStatus::from_str("unplugged"), None);
        assert_eq!(DeviceStatus::from_str("Online"), None);
    }

    #[test]
    fn test_device_serialization() {
        let device = Device {
            id: "device-001".to_string(),
            name: "Sensor Station Alpha".to_string(),
            location: "North Monitoring Point".to_string(),
            status: DeviceStatus::Online,
            last_seen: Utc::now(),
        };

        let json = serde_json::to_value(&device).unwrap();
        assert_eq!(json["status"], "online");
        assert!(json.get("lastSeen").is_some());
    }
}
