//! Configuration system for Cadence.
//! TOML-based, layered resolution: overrides > env > project > defaults.

pub mod cadence_config;
pub mod debounce_config;
pub mod defaults;
pub mod interval_config;
pub mod tracing_config;

pub use cadence_config::{CadenceConfig, ConfigOverrides};
pub use debounce_config::DebounceConfig;
pub use interval_config::IntervalConfig;
pub use tracing_config::{LogFormat, TracingConfig};
