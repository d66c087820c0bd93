pub mod subscriber;

pub use subscriber::{init_logging, LogFormat, LoggingConfig, LoggingError};
