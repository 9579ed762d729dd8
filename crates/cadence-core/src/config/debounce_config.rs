//! Debounced dispatch configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::defaults;

/// Configuration for debounced dispatch.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct DebounceConfig {
    /// Quiet period before the pending value is dispatched. Default: 250 ms.
    pub delay_ms: Option<u64>,
    /// Dispatch a pending value when the debouncer is dropped. Default: true.
    pub flush_on_drop: Option<bool>,
}

impl DebounceConfig {
    pub fn effective_delay_ms(&self) -> u64 {
        self.delay_ms.unwrap_or(defaults::DEFAULT_DEBOUNCE_DELAY_MS)
    }

    pub fn effective_delay(&self) -> Duration {
        Duration::from_millis(self.effective_delay_ms())
    }

    pub fn effective_flush_on_drop(&self) -> bool {
        self.flush_on_drop.unwrap_or(defaults::DEFAULT_FLUSH_ON_DROP)
    }
}
