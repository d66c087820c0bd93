use aqua_types::{metric_config, Metric, MetricConfig, OptimalRange, Reading};
use serde::{Deserialize, Serialize};

/// 告警带宽度占最优区间宽度的比例
pub const WARNING_BAND_RATIO: f64 = 0.2;

/// 判定为平稳的最小变化量
pub const TREND_THRESHOLD: f64 = 0.01;

/// 单项指标状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricStatus {
    Normal,
    Warning,
    Critical,
}

/// 变化趋势
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

/// 总体状态
///
/// 单项状态只有三级，因此 `aggregate_status` 不会产生 `Good`；保留该级别供展示层使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverallStatus {
    Excellent,
    Good,
    Warning,
    Critical,
}

impl OverallStatus {
    pub fn description(&self) -> &'static str {
        match self {
            OverallStatus::Excellent => "All parameters within optimal range",
            OverallStatus::Good => "Parameters within acceptable range",
            OverallStatus::Warning => "Some parameters need attention",
            OverallStatus::Critical => "Immediate action required",
        }
    }
}

/// 判定单项指标状态
///
/// 最优区间内为 `Normal`；最优区间向两侧各扩展 20% 宽度内为 `Warning`；其余为 `Critical`
pub fn classify_status(value: f64, config: &MetricConfig) -> MetricStatus {
    if config.optimal.contains(value) {
        return MetricStatus::Normal;
    }

    let margin = config.optimal.width() * WARNING_BAND_RATIO;
    let lower = config.optimal.min - margin;
    let upper = config.optimal.max + margin;

    if value >= lower && value <= upper {
        MetricStatus::Warning
    } else {
        MetricStatus::Critical
    }
}

/// 判定变化趋势
pub fn classify_trend(current: f64, previous: f64) -> Trend {
    if (current - previous).abs() < TREND_THRESHOLD {
        Trend::Stable
    } else if current > previous {
        Trend::Up
    } else {
        Trend::Down
    }
}

/// 汇总各项指标状态
pub fn aggregate_status<I>(statuses: I) -> OverallStatus
where
    I: IntoIterator<Item = MetricStatus>,
{
    let statuses: Vec<MetricStatus> = statuses.into_iter().collect();

    if statuses.contains(&MetricStatus::Critical) {
        OverallStatus::Critical
    } else if statuses.contains(&MetricStatus::Warning) {
        OverallStatus::Warning
    } else if statuses.iter().all(|s| *s == MetricStatus::Normal) {
        OverallStatus::Excellent
    } else {
        OverallStatus::Good
    }
}

/// 单项指标评估结果（对应一张指标卡片）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricAssessment {
    pub metric: Metric,
    pub title: &'static str,
    pub value: f64,
    pub unit: &'static str,
    pub status: MetricStatus,
    pub trend: Trend,
    pub min: f64,
    pub max: f64,
    pub optimal: OptimalRange,
}

/// 对比当前与上一条读数，评估全部指标
pub fn assess_reading(current: &Reading, previous: &Reading) -> (Vec<MetricAssessment>, OverallStatus) {
    let assessments: Vec<MetricAssessment> = Metric::ALL
        .into_iter()
        .map(|metric| {
            let config = metric_config(metric);
            let value = current.get(metric);
            MetricAssessment {
                metric,
                title: metric.title(),
                value,
                unit: config.unit,
                status: classify_status(value, config),
                trend: classify_trend(value, previous.get(metric)),
                min: config.min,
                max: config.max,
                optimal: config.optimal,
            }
        })
        .collect();

    let overall = aggregate_status(assessments.iter().map(|a| a.status));
    (assessments, overall)
}
