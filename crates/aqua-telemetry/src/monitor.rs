use crate::model::{Device, DeviceStatus};
use aqua_types::DeviceProfile;
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// 设备在线的概率
pub const ONLINE_PROBABILITY: f64 = 0.9;

/// 最后在线时间的回溯窗口（毫秒）
pub const LAST_SEEN_WINDOW_MS: i64 = 300_000;

/// 设备群连接状态模拟
///
/// 每次查询都独立重新抽样，不记忆上一次的状态，与遥测数值无关
#[derive(Debug)]
pub struct FleetMonitor {
    rng: StdRng,
}

impl FleetMonitor {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// 抽样连接状态：90% 在线，其余告警与离线各半
    pub fn sample_status(&mut self) -> DeviceStatus {
        if self.rng.gen_bool(ONLINE_PROBABILITY) {
            DeviceStatus::Online
        } else if self.rng.gen_bool(0.5) {
            DeviceStatus::Warning
        } else {
            DeviceStatus::Offline
        }
    }

    /// 抽样最后在线时间：`now` 之前 5 分钟内
    pub fn sample_last_seen(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let offset = self.rng.gen_range(0..LAST_SEEN_WINDOW_MS);
        now - chrono::Duration::milliseconds(offset)
    }

    /// 生成一台设备的展示信息
    pub fn observe(&mut self, profile: &DeviceProfile, now: DateTime<Utc>) -> Device {
        let status = self.sample_status();
        let last_seen = self.sample_last_seen(now);
        debug!(device_id = %profile.id, status = status.as_str(), "Device status sampled");

        Device {
            id: profile.id.clone(),
            name: profile.name.clone(),
            location: profile.location.clone(),
            status,
            last_seen,
        }
    }
}

impl Default for FleetMonitor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_distribution() {
        let mut monitor = FleetMonitor::with_seed(17);
        let (mut online, mut warning, mut offline) = (0, 0, 0);
        for _ in 0..10_000 {
            match monitor.sample_status() {
                DeviceStatus::Online => online += 1,
                DeviceStatus::Warning => warning += 1,
                DeviceStatus::Offline => offline += 1,
            }
        }

        // 期望约 9000 / 500 / 500
        assert!(online > 8_700 && online < 9_300, "online = {}", online);
        assert!(warning > 300 && warning < 700, "warning = {}", warning);
        assert!(offline > 300 && offline < 700, "offline = {}", offline);
    }

    #[test]
    fn test_last_seen_window() {
        let mut monitor = FleetMonitor::with_seed(4);
        let now = Utc::now();
        for _ in 0..1_000 {
            let last_seen = monitor.sample_last_seen(now);
            assert!(last_seen <= now);
            assert!(now - last_seen < chrono::Duration::milliseconds(LAST_SEEN_WINDOW_MS));
        }
    }

    #[test]
    fn test_observe_copies_identity() {
        let mut monitor = FleetMonitor::with_seed(9);
        let profiles = DeviceProfile::builtin();
        let device = monitor.observe(&profiles[2], Utc::now());

        assert_eq!(device.id, "device-003");
        assert_eq!(device.name, "Sensor Station Gamma");
        assert_eq!(device.location, "South Monitoring Point");
    }
}
