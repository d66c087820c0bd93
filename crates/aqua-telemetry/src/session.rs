use crate::classify::{assess_reading, MetricAssessment, OverallStatus};
use crate::registry::DEFAULT_HISTORY_POINTS;
use crate::{Device, DeviceRegistry, Result};
use aqua_types::{metric_config, Metric, Reading};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::Arc;
use tracing::{debug, info};

/// 仪表盘快照
///
/// 一次渲染所需的全部数据
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSnapshot {
    pub device_id: String,
    /// 当前选中设备的展示信息
    pub device: Option<Device>,
    pub reading: Reading,
    pub metrics: Vec<MetricAssessment>,
    pub overall_status: OverallStatus,
    pub devices: Vec<Device>,
    pub last_update: DateTime<Utc>,
}

/// 单项指标的历史序列（趋势图数据）
#[derive(Debug, Clone, Serialize)]
pub struct MetricSeries {
    pub metric: Metric,
    pub unit: &'static str,
    pub points: Vec<(DateTime<Utc>, f64)>,
    pub min: f64,
    pub max: f64,
}

impl MetricSeries {
    /// 纵轴跨度，序列为常数时取 1
    pub fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range > 0.0 {
            range
        } else {
            1.0
        }
    }
}

/// 仪表盘会话
///
/// 维护当前选中设备、当前与上一条读数和固定长度的历史窗口
pub struct DashboardSession {
    registry: Arc<DeviceRegistry>,
    selected: String,
    current: Reading,
    previous: Reading,
    history: VecDeque<Reading>,
    history_points: usize,
    devices: Vec<Device>,
    last_update: DateTime<Utc>,
}

impl DashboardSession {
    /// 打开会话并选中设备
    ///
    /// # 错误
    /// * `UnknownDevice` - 设备不在设备表中
    pub async fn open(registry: Arc<DeviceRegistry>, device_id: &str) -> Result<Self> {
        Self::open_with_history(registry, device_id, DEFAULT_HISTORY_POINTS).await
    }

    pub async fn open_with_history(
        registry: Arc<DeviceRegistry>,
        device_id: &str,
        history_points: usize,
    ) -> Result<Self> {
        let previous = registry.get_reading(device_id).await?;
        let current = registry.get_reading(device_id).await?;
        let history = registry.get_history(device_id, history_points).await?;
        let devices = registry.list_devices().await;

        info!(device_id = %device_id, history_points, "Dashboard session opened");

        Ok(Self {
            registry,
            selected: device_id.to_string(),
            current,
            previous,
            history: history.into(),
            history_points,
            devices,
            last_update: Utc::now(),
        })
    }

    pub fn selected(&self) -> &str {
        &self.selected
    }

    pub fn current(&self) -> &Reading {
        &self.current
    }

    pub fn previous(&self) -> &Reading {
        &self.previous
    }

    pub fn history(&self) -> impl Iterator<Item = &Reading> {
        self.history.iter()
    }

    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    pub fn last_update(&self) -> DateTime<Utc> {
        self.last_update
    }

    /// 切换设备
    ///
    /// 新读数与新历史生成成功后才修改会话；设备未知时会话保持不变
    pub async fn select_device(&mut self, device_id: &str) -> Result<()> {
        let reading = self.registry.get_reading(device_id).await?;
        let history = self
            .registry
            .get_history(device_id, self.history_points)
            .await?;

        self.previous = std::mem::replace(&mut self.current, reading);
        self.history = history.into();
        self.selected = device_id.to_string();
        self.last_update = Utc::now();

        info!(device_id = %device_id, "Device selected");
        Ok(())
    }

    /// 定时刷新：生成新读数，历史窗口滑动一格，重新抽样设备状态
    pub async fn refresh(&mut self) -> Result<()> {
        let reading = self.registry.get_reading(&self.selected).await?;

        if self.history_points > 0 {
            if self.history.len() >= self.history_points {
                self.history.pop_front();
            }
            self.history.push_back(reading.clone());
        }
        self.previous = std::mem::replace(&mut self.current, reading);
        self.devices = self.registry.list_devices().await;
        self.last_update = Utc::now();

        debug!(device_id = %self.selected, "Dashboard refreshed");
        Ok(())
    }

    /// 生成当前快照
    pub fn snapshot(&self) -> DashboardSnapshot {
        let (metrics, overall_status) = assess_reading(&self.current, &self.previous);

        DashboardSnapshot {
            device_id: self.selected.clone(),
            device: self.devices.iter().find(|d| d.id == self.selected).cloned(),
            reading: self.current.clone(),
            metrics,
            overall_status,
            devices: self.devices.clone(),
            last_update: self.last_update,
        }
    }

    /// 单项指标的历史序列
    pub fn series(&self, metric: Metric) -> MetricSeries {
        let points: Vec<(DateTime<Utc>, f64)> = self
            .history
            .iter()
            .map(|r| (r.timestamp, r.get(metric)))
            .collect();

        // 空窗口时上下界取 0
        let (min, max) = match points.first() {
            Some(&(_, first)) => points
                .iter()
                .fold((first, first), |(lo, hi), &(_, v)| (lo.min(v), hi.max(v))),
            None => (0.0, 0.0),
        };

        MetricSeries {
            metric,
            unit: metric_config(metric).unit,
            points,
            min,
            max,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TelemetryError;
    use aqua_types::DeviceProfile;

    async fn create_test_session() -> DashboardSession {
        let registry = Arc::new(DeviceRegistry::with_seed(DeviceProfile::builtin(), 77).unwrap());
        DashboardSession::open(registry, "device-001").await.unwrap()
    }

    #[tokio::test]
    async fn test_open_session() {
        let session = create_test_session().await;
        assert_eq!(session.selected(), "device-001");
        assert_eq!(session.history().count(), DEFAULT_HISTORY_POINTS);
        assert_eq!(session.devices().len(), 3);
        assert!(session.previous().timestamp <= session.current().timestamp);
    }

    #[tokio::test]
    async fn test_open_unknown_device() {
        let registry = Arc::new(DeviceRegistry::builtin());
        let result = DashboardSession::open(registry, "device-999").await;
        assert!(matches!(result, Err(TelemetryError::UnknownDevice(_))));
    }

    #[tokio::test]
    async fn test_refresh_slides_history_window() {
        let mut session = create_test_session().await;
        let second_oldest = session.history().nth(1).cloned().unwrap();
        let before = session.current().clone();

        session.refresh().await.unwrap();

        assert_eq!(session.history().count(), DEFAULT_HISTORY_POINTS);
        assert_eq!(session.history().next(), Some(&second_oldest));
        assert_eq!(session.history().last(), Some(session.current()));
        assert_eq!(session.previous(), &before);
    }

    #[tokio::test]
    async fn test_select_device() {
        let mut session = create_test_session().await;
        let before = session.current().clone();

        session.select_device("device-002").await.unwrap();

        assert_eq!(session.selected(), "device-002");
        assert_eq!(session.previous(), &before);
        assert_eq!(session.history().count(), DEFAULT_HISTORY_POINTS);
        assert!((session.current().temperature - 25.1).abs() < 1.0);
    }

    #[tokio::test]
    async fn test_select_unknown_device_keeps_state() {
        let mut session = create_test_session().await;
        let before = session.current().clone();

        let result = session.select_device("device-404").await;

        assert!(matches!(result, Err(TelemetryError::UnknownDevice(_))));
        assert_eq!(session.selected(), "device-001");
        assert_eq!(session.current(), &before);
    }

    #[tokio::test]
    async fn test_snapshot() {
        let session = create_test_session().await;
        let snapshot = session.snapshot();

        assert_eq!(snapshot.device_id, "device-001");
        assert_eq!(snapshot.metrics.len(), 5);
        assert_eq!(snapshot.device.as_ref().map(|d| d.name.as_str()), Some("Sensor Station Alpha"));
        assert_eq!(&snapshot.reading, session.current());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("overallStatus").is_some());
    }

    #[tokio::test]
    async fn test_series() {
        let session = create_test_session().await;
        let series = session.series(Metric::Salinity);

        assert_eq!(series.points.len(), DEFAULT_HISTORY_POINTS);
        assert_eq!(series.unit, "ppt");
        assert!(series.min <= series.max);
        assert!(series.range() > 0.0);
        for (_, value) in &series.points {
            assert!(*value >= series.min && *value <= series.max);
        }
    }

    #[tokio::test]
    async fn test_empty_history_window() {
        let registry = Arc::new(DeviceRegistry::with_seed(DeviceProfile::builtin(), 78).unwrap());
        let mut session = DashboardSession::open_with_history(registry, "device-002", 0)
            .await
            .unwrap();

        session.refresh().await.unwrap();
        assert_eq!(session.history().count(), 0);

        let series = session.series(Metric::Temperature);
        assert!(series.points.is_empty());
        assert_eq!(series.min, 0.0);
        assert_eq!(series.max, 0.0);
        assert_eq!(series.range(), 1.0);

        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["min"], 0.0);
        assert_eq!(json["max"], 0.0);
    }
}
