pub mod device;
pub mod metric;
pub mod reading;

pub use device::DeviceProfile;
pub use metric::{metric_config, metric_configs, Metric, MetricConfig, MetricMap, OptimalRange};
pub use reading::{Reading, MAX_HISTORY_SPAN_MS};
