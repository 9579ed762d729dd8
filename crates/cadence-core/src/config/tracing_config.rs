//! Logging configuration.

use serde::{Deserialize, Serialize};

use super::defaults;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!("unknown log format '{other}'")),
        }
    }
}

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TracingConfig {
    /// `EnvFilter` directive string, e.g. `cadence=debug`.
    pub filter: Option<String>,
    pub format: Option<LogFormat>,
}

impl TracingConfig {
    pub fn effective_filter(&self) -> &str {
        self.filter.as_deref().unwrap_or(defaults::DEFAULT_LOG_FILTER)
    }

    pub fn effective_format(&self) -> LogFormat {
        self.format.unwrap_or_default()
    }
}
