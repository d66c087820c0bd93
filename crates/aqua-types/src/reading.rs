use crate::metric::{Metric, MetricMap};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 历史回填允许的最大时间跨度（约 100 年，毫秒）
pub const MAX_HISTORY_SPAN_MS: u64 = 3_155_760_000_000;

/// 水质读数
///
/// 五项指标与时间戳作为一个整体产生，不存在部分读数
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reading {
    #[serde(rename = "pH")]
    pub ph: f64,
    pub turbidity: f64,
    pub salinity: f64,
    pub dissolved_oxygen: f64,
    pub temperature: f64,
    pub timestamp: DateTime<Utc>,
}

impl Reading {
    pub fn from_values(values: &MetricMap<f64>, timestamp: DateTime<Utc>) -> Self {
        Self {
            ph: values[Metric::Ph],
            turbidity: values[Metric::Turbidity],
            salinity: values[Metric::Salinity],
            dissolved_oxygen: values[Metric::DissolvedOxygen],
            temperature: values[Metric::Temperature],
            timestamp,
        }
    }

    /// 按指标取值
    pub fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Ph => self.ph,
            Metric::Turbidity => self.turbidity,
            Metric::Salinity => self.salinity,
            Metric::DissolvedOxygen => self.dissolved_oxygen,
            Metric::Temperature => self.temperature,
        }
    }

    pub fn values(&self) -> MetricMap<f64> {
        MetricMap::from_fn(|m| self.get(m))
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reading_json_keys() {
        let values = MetricMap::new([7.1, 1.8, 33.2, 8.8, 23.5]);
        let reading = Reading::from_values(&values, Utc::now());
        let json = serde_json::to_value(&reading).unwrap();

        assert_eq!(json["pH"], 7.1);
        assert_eq!(json["dissolvedOxygen"], 8.8);
        assert!(json.get("timestamp").is_some());
        assert_eq!(reading.values(), values);
    }
}
