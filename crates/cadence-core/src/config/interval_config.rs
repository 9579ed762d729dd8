//! Interval scheduler configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Configuration for adaptive interval sessions.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct IntervalConfig {
    /// Target spacing between invocation starts, in milliseconds. Default: 1000.
    pub target_interval_ms: Option<u64>,
}

impl IntervalConfig {
    pub fn effective_target_interval_ms(&self) -> u64 {
        self.target_interval_ms
            .unwrap_or(defaults::DEFAULT_TARGET_INTERVAL_MS)
    }

    pub fn effective_target_interval(&self) -> Duration {
        Duration::from_millis(self.effective_target_interval_ms())
    }
}
