pub mod device;
pub mod engine;
pub mod loader;

pub use device::{BaselineConfig, DeviceConfig};
pub use engine::{EngineConfig, HistoryConfig, RefreshConfig, SimulationConfig, SystemConfig};
pub use loader::ConfigLoader;
