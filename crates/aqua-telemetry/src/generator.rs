use crate::{Result, TelemetryError};
use aqua_types::{metric_config, Metric, MetricMap, Reading, MAX_HISTORY_SPAN_MS};
use chrono::{DateTime, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tracing::trace;

/// 漂移量的取值上限（绝对值）
pub const TREND_LIMIT: f64 = 0.01;

/// 每步重新抽取漂移方向的概率
pub const TREND_CHANGE_PROBABILITY: f64 = 0.05;

/// 读数生成器
///
/// 单台设备的有偏随机游走：每个指标维护一个基线值和一个漂移量，
/// 每次 `step` 在基线上叠加漂移与均匀噪声，钳制后写回基线。
/// 状态只由自身修改，不对外共享。
#[derive(Debug, Clone)]
pub struct ReadingGenerator {
    /// 各指标当前值
    baselines: MetricMap<f64>,

    /// 各指标当前漂移
    trends: MetricMap<f64>,

    rng: StdRng,
}

impl ReadingGenerator {
    /// 使用系统熵创建生成器
    ///
    /// # 参数
    /// * `initial_baselines` - 各指标初始基线
    pub fn new(initial_baselines: MetricMap<f64>) -> Self {
        Self::with_rng(initial_baselines, StdRng::from_entropy())
    }

    /// 使用固定种子创建生成器（可复现）
    pub fn with_seed(initial_baselines: MetricMap<f64>, seed: u64) -> Self {
        Self::with_rng(initial_baselines, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(initial_baselines: MetricMap<f64>, mut rng: StdRng) -> Self {
        let trends = MetricMap::from_fn(|_| draw_trend(&mut rng));
        Self {
            baselines: initial_baselines,
            trends,
            rng,
        }
    }

    /// 未指定设备时的默认基线
    pub fn default_baselines() -> MetricMap<f64> {
        MetricMap::new([7.2, 2.5, 32.8, 8.5, 24.2])
    }

    pub fn baselines(&self) -> &MetricMap<f64> {
        &self.baselines
    }

    pub fn trends(&self) -> &MetricMap<f64> {
        &self.trends
    }

    /// 生成一条新读数，时间戳为当前时间
    pub fn step(&mut self) -> Reading {
        self.step_at(Utc::now())
    }

    /// 生成一条新读数，时间戳为 `now`
    pub fn step_at(&mut self, now: DateTime<Utc>) -> Reading {
        for metric in Metric::ALL {
            self.advance(metric);
        }
        trace!(
            ph = self.baselines[Metric::Ph],
            temperature = self.baselines[Metric::Temperature],
            "Reading generated"
        );
        Reading::from_values(&self.baselines, now)
    }

    fn advance(&mut self, metric: Metric) -> f64 {
        let config = metric_config(metric);
        let half = metric.max_change() / 2.0;

        let random_change = self.rng.gen_range(-half..half);
        let value = self.baselines[metric] + self.trends[metric] + random_change;

        if self.rng.gen_bool(TREND_CHANGE_PROBABILITY) {
            self.trends[metric] = draw_trend(&mut self.rng);
        }

        let value = config.clamp(value);
        self.baselines[metric] = value;
        value
    }

    /// 回填历史数据
    ///
    /// 生成 `points` 条读数，按时间先后排列并以当前时间结尾。
    /// 数值沿同一随机游走向前推进，时间戳按 `interval` 等距排列。
    ///
    /// # 错误
    /// * `InvalidHistorySpan` - 多于一个点时间隔不足 1 毫秒，或总跨度超过 `MAX_HISTORY_SPAN_MS`；
    ///   此时生成器状态不变
    pub fn backfill(&mut self, points: usize, interval: Duration) -> Result<Vec<Reading>> {
        self.backfill_at(points, interval, Utc::now())
    }

    pub fn backfill_at(
        &mut self,
        points: usize,
        interval: Duration,
        now: DateTime<Utc>,
    ) -> Result<Vec<Reading>> {
        let timestamps = history_timestamps(points, interval, now).ok_or(
            TelemetryError::InvalidHistorySpan {
                points,
                interval_ms: interval.as_millis(),
            },
        )?;

        Ok(timestamps
            .into_iter()
            .map(|timestamp| self.step_at(timestamp))
            .collect())
    }
}

/// 以 `now` 结尾、间隔为 `interval` 的严格递增时间戳
fn history_timestamps(
    points: usize,
    interval: Duration,
    now: DateTime<Utc>,
) -> Option<Vec<DateTime<Utc>>> {
    if points <= 1 {
        return Some(vec![now; points]);
    }

    let interval_ms = u64::try_from(interval.as_millis())
        .ok()
        .filter(|&ms| ms > 0)?;
    let span_ms = interval_ms.checked_mul(u64::try_from(points - 1).ok()?)?;
    if span_ms > MAX_HISTORY_SPAN_MS {
        return None;
    }

    let step = chrono::Duration::milliseconds(i64::try_from(interval_ms).ok()?);
    let span = chrono::Duration::milliseconds(i64::try_from(span_ms).ok()?);
    let start = now.checked_sub_signed(span)?;

    Some(
        std::iter::successors(Some(start), |t| t.checked_add_signed(step))
            .take(points)
            .collect(),
    )
}

fn draw_trend(rng: &mut StdRng) -> f64 {
    rng.gen_range(-TREND_LIMIT..TREND_LIMIT)
}
