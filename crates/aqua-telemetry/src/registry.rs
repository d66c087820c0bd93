use crate::{Device, FleetMonitor, ReadingGenerator, Result, TelemetryError};
use aqua_types::{DeviceProfile, Reading, MAX_HISTORY_SPAN_MS};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::{HashMap, HashSet};
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// 默认历史点数
pub const DEFAULT_HISTORY_POINTS: usize = 20;

/// 默认历史采样间隔（1 分钟）
pub const DEFAULT_HISTORY_INTERVAL: Duration = Duration::from_millis(60_000);

/// 单台设备的档案与生成器
struct DeviceSlot {
    profile: DeviceProfile,

    /// 每台设备独立加锁，保证同一设备的 step 不会交错
    generator: Mutex<ReadingGenerator>,
}

/// 设备注册表
///
/// 为固定设备表中的每台设备持有一个读数生成器，设备集合在构造后不再变化
pub struct DeviceRegistry {
    /// 按配置顺序排列
    slots: Vec<DeviceSlot>,

    /// 设备ID -> slots 下标
    index: HashMap<String, usize>,

    /// 连接状态模拟
    monitor: Mutex<FleetMonitor>,

    /// 历史数据间隔
    history_interval: Duration,
}

impl DeviceRegistry {
    /// 创建设备注册表
    ///
    /// # 参数
    /// * `profiles` - 设备表
    ///
    /// # 错误
    /// * `InvalidConfig` - 设备表为空或设备ID重复
    pub fn new(profiles: Vec<DeviceProfile>) -> Result<Self> {
        validate_profiles(&profiles)?;
        Ok(Self::assemble(profiles, StdRng::from_entropy()))
    }

    /// 使用固定种子创建设备注册表，各设备生成器的种子由其派生
    pub fn with_seed(profiles: Vec<DeviceProfile>, seed: u64) -> Result<Self> {
        validate_profiles(&profiles)?;
        Ok(Self::assemble(profiles, StdRng::seed_from_u64(seed)))
    }

    /// 内置三站设备表
    pub fn builtin() -> Self {
        Self::assemble(DeviceProfile::builtin(), StdRng::from_entropy())
    }

    fn assemble(profiles: Vec<DeviceProfile>, mut seeder: StdRng) -> Self {
        let mut slots = Vec::with_capacity(profiles.len());
        let mut index = HashMap::with_capacity(profiles.len());

        for profile in profiles {
            let generator = ReadingGenerator::with_seed(profile.baselines, seeder.gen());
            index.insert(profile.id.clone(), slots.len());
            debug!(device_id = %profile.id, device_name = %profile.name, "Generator created");
            slots.push(DeviceSlot {
                profile,
                generator: Mutex::new(generator),
            });
        }

        info!(count = slots.len(), "Device registry created");

        Self {
            slots,
            index,
            monitor: Mutex::new(FleetMonitor::with_seed(seeder.gen())),
            history_interval: DEFAULT_HISTORY_INTERVAL,
        }
    }

    /// 设置历史数据间隔
    ///
    /// # 错误
    /// * `InvalidConfig` - 间隔不足 1 毫秒或超过 `MAX_HISTORY_SPAN_MS`
    pub fn with_history_interval(mut self, interval: Duration) -> Result<Self> {
        let interval_ms = interval.as_millis();
        if interval_ms == 0 || interval_ms > u128::from(MAX_HISTORY_SPAN_MS) {
            return Err(TelemetryError::invalid_config(format!(
                "history interval out of range: {:?}",
                interval
            )));
        }

        self.history_interval = interval;
        Ok(self)
    }

    pub fn history_interval(&self) -> Duration {
        self.history_interval
    }

    fn slot(&self, device_id: &str) -> Result<&DeviceSlot> {
        match self.index.get(device_id) {
            Some(&i) => Ok(&self.slots[i]),
            None => {
                warn!(device_id = %device_id, "Unknown device requested");
                Err(TelemetryError::unknown_device(device_id))
            }
        }
    }

    /// 获取设备的新读数
    ///
    /// # 错误
    /// * `UnknownDevice` - 设备不在设备表中
    pub async fn get_reading(&self, device_id: &str) -> Result<Reading> {
        let slot = self.slot(device_id)?;
        let reading = slot.generator.lock().await.step();
        debug!(device_id = %device_id, "Reading generated");
        Ok(reading)
    }

    /// 获取设备的历史数据（按时间升序，以当前时间结尾）
    ///
    /// # 参数
    /// * `device_id` - 设备ID
    /// * `points` - 数据点数
    ///
    /// # 错误
    /// * `UnknownDevice` - 设备不在设备表中
    /// * `InvalidHistorySpan` - `points` 个间隔的总跨度超出可表示范围
    pub async fn get_history(&self, device_id: &str, points: usize) -> Result<Vec<Reading>> {
        let slot = self.slot(device_id)?;
        let history = slot
            .generator
            .lock()
            .await
            .backfill(points, self.history_interval)?;
        debug!(device_id = %device_id, points, "History generated");
        Ok(history)
    }

    /// 获取默认点数的历史数据
    pub async fn get_history_default(&self, device_id: &str) -> Result<Vec<Reading>> {
        self.get_history(device_id, DEFAULT_HISTORY_POINTS).await
    }

    /// 列出全部设备，连接状态每次重新抽样
    pub async fn list_devices(&self) -> Vec<Device> {
        let now = Utc::now();
        let mut monitor = self.monitor.lock().await;
        self.slots
            .iter()
            .map(|slot| monitor.observe(&slot.profile, now))
            .collect()
    }

    pub fn device_ids(&self) -> impl Iterator<Item = &str> {
        self.slots.iter().map(|slot| slot.profile.id.as_str())
    }

    pub fn contains(&self, device_id: &str) -> bool {
        self.index.contains_key(device_id)
    }

    /// 获取设备档案
    pub fn profile(&self, device_id: &str) -> Result<&DeviceProfile> {
        self.slot(device_id).map(|slot| &slot.profile)
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn validate_profiles(profiles: &[DeviceProfile]) -> Result<()> {
    if profiles.is_empty() {
        return Err(TelemetryError::invalid_config("device table is empty"));
    }

    let mut seen = HashSet::new();
    for profile in profiles {
        if profile.id.trim().is_empty() {
            return Err(TelemetryError::invalid_config("device id cannot be empty"));
        }
        if !seen.insert(profile.id.as_str()) {
            return Err(TelemetryError::invalid_config(format!(
                "duplicate device id: {}",
                profile.id
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use aqua_types::{Metric, MetricMap};

    fn create_test_registry() -> DeviceRegistry {
        DeviceRegistry::with_seed(DeviceProfile::builtin(), 2024).unwrap()
    }

    #[test]
    fn test_builtin_device_ids() {
        let registry = DeviceRegistry::builtin();
        let ids: Vec<&str> = registry.device_ids().collect();
        assert_eq!(ids, vec!["device-001", "device-002", "device-003"]);
        assert!(registry.contains("device-002"));
        assert!(!registry.contains("device-999"));
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_reject_empty_table() {
        let result = DeviceRegistry::new(Vec::new());
        assert!(matches!(result, Err(TelemetryError::InvalidConfig(_))));
    }

    #[test]
    fn test_reject_duplicate_ids() {
        let mut profiles = DeviceProfile::builtin();
        profiles[2].id = "device-001".to_string();
        let result = DeviceRegistry::new(profiles);
        assert!(matches!(result, Err(TelemetryError::InvalidConfig(msg)) if msg.contains("device-001")));
    }

    #[test]
    fn test_unknown_device_reading() {
        let registry = create_test_registry();
        let result = tokio_test::block_on(registry.get_reading("device-999"));
        assert_eq!(
            result,
            Err(TelemetryError::UnknownDevice("device-999".to_string()))
        );
    }

    #[tokio::test]
    async fn test_unknown_device_history() {
        let registry = create_test_registry();
        let result = registry.get_history("", 20).await;
        assert!(matches!(result, Err(TelemetryError::UnknownDevice(_))));
    }

    #[tokio::test]
    async fn test_reading_starts_from_device_baselines() {
        let registry = create_test_registry();
        let reading = registry.get_reading("device-003").await.unwrap();

        // 首次读数距 device-003 的基线不超过一步
        assert!((reading.ph - 6.9).abs() <= Metric::Ph.max_change() / 2.0 + 0.01);
        assert!((reading.salinity - 34.0).abs() <= Metric::Salinity.max_change() / 2.0 + 0.01);
    }

    #[tokio::test]
    async fn test_devices_walk_independently() {
        let registry = create_test_registry();
        let a = registry.get_reading("device-001").await.unwrap();
        let b = registry.get_reading("device-001").await.unwrap();
        let other = registry.get_reading("device-002").await.unwrap();

        assert!((b.temperature - a.temperature).abs() <= Metric::Temperature.max_change() / 2.0 + 0.01);
        assert!((other.temperature - 25.1).abs() <= Metric::Temperature.max_change() / 2.0 + 0.01);
    }

    #[tokio::test]
    async fn test_default_history() {
        let registry = create_test_registry();
        let history = registry.get_history_default("device-001").await.unwrap();
        assert_eq!(history.len(), DEFAULT_HISTORY_POINTS);
        for pair in history.windows(2) {
            assert_eq!(
                pair[1].timestamp - pair[0].timestamp,
                chrono::Duration::milliseconds(60_000)
            );
        }
    }

    #[tokio::test]
    async fn test_custom_history_interval() {
        let registry = create_test_registry()
            .with_history_interval(Duration::from_secs(5))
            .unwrap();
        let history = registry.get_history("device-002", 4).await.unwrap();
        assert_eq!(
            history[3].timestamp - history[0].timestamp,
            chrono::Duration::seconds(15)
        );
    }

    #[test]
    fn test_reject_unusable_history_interval() {
        for interval in [
            Duration::ZERO,
            Duration::from_micros(999),
            Duration::from_millis(u64::MAX),
        ] {
            let result = create_test_registry().with_history_interval(interval);
            assert!(matches!(result, Err(TelemetryError::InvalidConfig(_))), "{:?}", interval);
        }
    }

    #[tokio::test]
    async fn test_history_span_overflow_is_an_error() {
        let registry = create_test_registry()
            .with_history_interval(Duration::from_millis(MAX_HISTORY_SPAN_MS))
            .unwrap();

        assert_eq!(registry.get_history("device-001", 2).await.unwrap().len(), 2);
        let result = registry.get_history("device-001", 3).await;
        assert!(matches!(result, Err(TelemetryError::InvalidHistorySpan { points: 3, .. })));
    }

    #[tokio::test]
    async fn test_list_devices() {
        let registry = create_test_registry();
        let devices = registry.list_devices().await;
        let now = Utc::now();

        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].name, "Sensor Station Alpha");
        assert_eq!(devices[1].location, "Central Monitoring Point");
        for device in &devices {
            assert!(device.last_seen <= now);
        }
    }

    #[tokio::test]
    async fn test_custom_profiles() {
        let profiles = vec![DeviceProfile::new(
            "lake-01",
            "Lake Buoy",
            "Lake Center",
            MetricMap::new([7.0, 3.0, 5.0, 9.0, 18.0]),
        )];
        let registry = DeviceRegistry::new(profiles).unwrap();
        assert!(registry.get_reading("lake-01").await.is_ok());
        assert!(registry.get_reading("device-001").await.is_err());
        assert_eq!(registry.profile("lake-01").unwrap().name, "Lake Buoy");
    }
}
