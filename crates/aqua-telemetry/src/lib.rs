pub mod classify;
pub mod driver;
pub mod error;
pub mod generator;
pub mod model;
pub mod monitor;
pub mod registry;
pub mod session;

pub use aqua_types::{
    metric_config, metric_configs, DeviceProfile, Metric, MetricConfig, MetricMap, OptimalRange,
    Reading,
};
pub use classify::{
    aggregate_status, assess_reading, classify_status, classify_trend, MetricAssessment,
    MetricStatus, OverallStatus, Trend,
};
pub use driver::DashboardDriver;
pub use error::{Result, TelemetryError};
pub use generator::ReadingGenerator;
pub use model::{Device, DeviceStatus};
pub use monitor::FleetMonitor;
pub use registry::DeviceRegistry;
pub use session::{DashboardSession, DashboardSnapshot, MetricSeries};
