//! Top-level Cadence configuration with layered resolution.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

use super::{defaults, DebounceConfig, IntervalConfig, LogFormat, TracingConfig};
use crate::errors::ConfigError;

/// Top-level configuration aggregating all sub-configs.
///
/// Resolution order (highest priority first):
/// 1. Explicit overrides (applied via `apply_overrides`)
/// 2. Environment variables (`CADENCE_*`)
/// 3. Project config (`cadence.toml` in the given root)
/// 4. Compiled defaults
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CadenceConfig {
    pub interval: IntervalConfig,
    pub debounce: DebounceConfig,
    pub tracing: TracingConfig,
}

/// Programmatic overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub target_interval_ms: Option<u64>,
    pub debounce_delay_ms: Option<u64>,
    pub debounce_flush_on_drop: Option<bool>,
    pub log_filter: Option<String>,
    pub log_format: Option<LogFormat>,
}

impl CadenceConfig {
    /// Load configuration, layering overrides > env > `cadence.toml` > defaults.
    pub fn load(root: &Path, overrides: Option<&ConfigOverrides>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let project_config_path = root.join(defaults::PROJECT_CONFIG_FILENAME);
        if project_config_path.exists() {
            Self::merge_toml_file(&mut config, &project_config_path)?;
        }

        Self::apply_env_overrides(&mut config);

        if let Some(overrides) = overrides {
            Self::apply_overrides(&mut config, overrides);
        }

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        toml::from_str(toml_str).map_err(|e| ConfigError::ParseError {
            path: "<string>".to_string(),
            message: e.to_string(),
        })
    }

    /// Serialize the config back to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError {
            path: "<serialization>".to_string(),
            message: e.to_string(),
        })
    }

    pub fn validate(config: &CadenceConfig) -> Result<(), ConfigError> {
        if config.debounce.delay_ms == Some(0) {
            return Err(ConfigError::ValidationFailed {
                field: "debounce.delay_ms".to_string(),
                message: "must be greater than 0".to_string(),
            });
        }
        if let Some(ref filter) = config.tracing.filter {
            if let Err(e) = EnvFilter::try_new(filter) {
                return Err(ConfigError::InvalidValue {
                    field: "tracing.filter".to_string(),
                    message: e.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Merge a TOML file into the existing config.
    /// Unknown keys are ignored.
    fn merge_toml_file(config: &mut CadenceConfig, path: &Path) -> Result<(), ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
                path: path.display().to_string(),
            })?;

        let file_config: CadenceConfig =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        Self::merge(config, &file_config);
        Ok(())
    }

    /// Values in `other` win only where they are set.
    fn merge(base: &mut CadenceConfig, other: &CadenceConfig) {
        if other.interval.target_interval_ms.is_some() {
            base.interval.target_interval_ms = other.interval.target_interval_ms;
        }

        if other.debounce.delay_ms.is_some() {
            base.debounce.delay_ms = other.debounce.delay_ms;
        }
        if other.debounce.flush_on_drop.is_some() {
            base.debounce.flush_on_drop = other.debounce.flush_on_drop;
        }

        if other.tracing.filter.is_some() {
            base.tracing.filter = other.tracing.filter.clone();
        }
        if other.tracing.format.is_some() {
            base.tracing.format = other.tracing.format;
        }
    }

    /// Pattern: `CADENCE_INTERVAL_TARGET_MS`, `CADENCE_DEBOUNCE_DELAY_MS`, etc.
    /// Unparseable values are skipped.
    fn apply_env_overrides(config: &mut CadenceConfig) {
        if let Ok(val) = std::env::var("CADENCE_INTERVAL_TARGET_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.interval.target_interval_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CADENCE_DEBOUNCE_DELAY_MS") {
            if let Ok(v) = val.parse::<u64>() {
                config.debounce.delay_ms = Some(v);
            }
        }
        if let Ok(val) = std::env::var("CADENCE_DEBOUNCE_FLUSH_ON_DROP") {
            if let Ok(v) = val.parse::<bool>() {
                config.debounce.flush_on_drop = Some(v);
            }
        }
        if let Ok(val) = std::env::var(defaults::LOG_ENV_VAR) {
            config.tracing.filter = Some(val);
        }
        if let Ok(val) = std::env::var("CADENCE_LOG_FORMAT") {
            if let Ok(v) = val.parse::<LogFormat>() {
                config.tracing.format = Some(v);
            }
        }
    }

    fn apply_overrides(config: &mut CadenceConfig, overrides: &ConfigOverrides) {
        if let Some(v) = overrides.target_interval_ms {
            config.interval.target_interval_ms = Some(v);
        }
        if let Some(v) = overrides.debounce_delay_ms {
            config.debounce.delay_ms = Some(v);
        }
        if let Some(v) = overrides.debounce_flush_on_drop {
            config.debounce.flush_on_drop = Some(v);
        }
        if let Some(ref v) = overrides.log_filter {
            config.tracing.filter = Some(v.clone());
        }
        if let Some(v) = overrides.log_format {
            config.tracing.format = Some(v);
        }
    }
}
