use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

/// 水质指标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// 酸碱度
    #[serde(rename = "pH")]
    Ph,
    /// 浊度
    Turbidity,
    /// 盐度
    Salinity,
    /// 溶解氧
    DissolvedOxygen,
    /// 水温
    Temperature,
}

impl Metric {
    /// 全部指标（展示顺序）
    pub const ALL: [Metric; 5] = [
        Metric::Ph,
        Metric::Turbidity,
        Metric::Salinity,
        Metric::DissolvedOxygen,
        Metric::Temperature,
    ];

    pub const COUNT: usize = Self::ALL.len();

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::Ph => "pH",
            Metric::Turbidity => "turbidity",
            Metric::Salinity => "salinity",
            Metric::DissolvedOxygen => "dissolvedOxygen",
            Metric::Temperature => "temperature",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == s)
    }

    /// 展示标题
    pub fn title(&self) -> &'static str {
        match self {
            Metric::Ph => "pH Level",
            Metric::Turbidity => "Turbidity",
            Metric::Salinity => "Salinity",
            Metric::DissolvedOxygen => "Dissolved Oxygen",
            Metric::Temperature => "Temperature",
        }
    }

    /// 单步随机游走的最大幅度
    pub fn max_change(&self) -> f64 {
        match self {
            Metric::Ph => 0.05,
            Metric::Turbidity => 0.3,
            Metric::Salinity => 0.2,
            Metric::DissolvedOxygen => 0.1,
            Metric::Temperature => 0.3,
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 按指标索引的定长表
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MetricMap<T>([T; Metric::COUNT]);

impl<T> MetricMap<T> {
    pub const fn new(values: [T; Metric::COUNT]) -> Self {
        Self(values)
    }

    /// 对每个指标求值构建
    pub fn from_fn(mut f: impl FnMut(Metric) -> T) -> Self {
        Self(Metric::ALL.map(|m| f(m)))
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, &T)> {
        Metric::ALL.into_iter().zip(self.0.iter())
    }

    pub fn map<U>(self, mut f: impl FnMut(Metric, T) -> U) -> MetricMap<U> {
        let mut index = 0;
        MetricMap(self.0.map(|v| {
            let metric = Metric::ALL[index];
            index += 1;
            f(metric, v)
        }))
    }
}

impl<T> Index<Metric> for MetricMap<T> {
    type Output = T;

    fn index(&self, metric: Metric) -> &T {
        &self.0[metric.index()]
    }
}

impl<T> IndexMut<Metric> for MetricMap<T> {
    fn index_mut(&mut self, metric: Metric) -> &mut T {
        &mut self.0[metric.index()]
    }
}

/// 最优区间
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OptimalRange {
    pub min: f64,
    pub max: f64,
}

impl OptimalRange {
    pub fn width(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// 指标配置
///
/// 定义合法范围 `[min, max]` 与健康范围 `optimal`，全局只读
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MetricConfig {
    pub min: f64,
    pub max: f64,
    pub optimal: OptimalRange,
    pub unit: &'static str,
}

impl MetricConfig {
    /// 生成值的下限（距硬下限留 1 个单位）
    pub fn clamp_floor(&self) -> f64 {
        self.min + 1.0
    }

    /// 生成值的上限（距硬上限留 1 个单位）
    pub fn clamp_ceiling(&self) -> f64 {
        self.max - 1.0
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.clamp_floor()).min(self.clamp_ceiling())
    }

    /// 检查区间顺序：`min <= optimal.min < optimal.max <= max`，且钳制区间非空
    ///
    /// 浊度的最优下限与硬下限同为 0，因此外侧边界允许相等
    pub fn is_well_formed(&self) -> bool {
        self.min <= self.optimal.min
            && self.optimal.min < self.optimal.max
            && self.optimal.max <= self.max
            && self.clamp_floor() < self.clamp_ceiling()
    }

    /// 值在 `[min, max]` 刻度上的相对位置
    pub fn scale_position(&self, value: f64) -> f64 {
        (value - self.min) / (self.max - self.min)
    }

    /// 最优区间在刻度上的起点与宽度（相对值）
    pub fn optimal_band(&self) -> (f64, f64) {
        let span = self.max - self.min;
        (
            (self.optimal.min - self.min) / span,
            self.optimal.width() / span,
        )
    }
}

static METRIC_CONFIGS: MetricMap<MetricConfig> = MetricMap::new([
    MetricConfig {
        min: 0.0,
        max: 14.0,
        optimal: OptimalRange { min: 6.5, max: 8.5 },
        unit: "pH",
    },
    MetricConfig {
        min: 0.0,
        max: 100.0,
        optimal: OptimalRange { min: 0.0, max: 5.0 },
        unit: "NTU",
    },
    MetricConfig {
        min: 0.0,
        max: 50.0,
        optimal: OptimalRange { min: 30.0, max: 35.0 },
        unit: "ppt",
    },
    MetricConfig {
        min: 0.0,
        max: 20.0,
        optimal: OptimalRange { min: 6.0, max: 12.0 },
        unit: "mg/L",
    },
    MetricConfig {
        min: 0.0,
        max: 40.0,
        optimal: OptimalRange { min: 20.0, max: 28.0 },
        unit: "°C",
    },
]);

/// 获取指标配置
pub fn metric_config(metric: Metric) -> &'static MetricConfig {
    &METRIC_CONFIGS[metric]
}

/// 遍历全部指标配置
pub fn metric_configs() -> impl Iterator<Item = (Metric, &'static MetricConfig)> {
    METRIC_CONFIGS.iter()
}
