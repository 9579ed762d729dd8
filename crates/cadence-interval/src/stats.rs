//! Per-session counters.

use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Snapshot of a session's activity.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IntervalStats {
    /// Invocations of the callback.
    pub cycles_started: u64,
    /// Callback futures that settled, stale ones included.
    pub cycles_settled: u64,
    /// Completions that arrived after the session was stopped or replaced.
    pub stale_completions: u64,
    /// Callbacks whose future panicked. They still count as settled.
    pub panicked_cycles: u64,
    /// Duration of the most recently settled callback.
    pub last_elapsed: Option<Duration>,
    /// Delay chosen for the most recently scheduled cycle.
    pub last_delay: Option<Duration>,
    /// Wall-clock time of the last non-stale completion.
    pub last_settled_at: Option<DateTime<Utc>>,
}

impl IntervalStats {
    /// Callbacks currently running (0 or 1 for a live session).
    pub fn in_flight(&self) -> u64 {
        self.cycles_started.saturating_sub(self.cycles_settled)
    }
}
