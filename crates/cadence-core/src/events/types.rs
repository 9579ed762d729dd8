//! Event payload types.

use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::fence::Generation;
use crate::ids::SessionId;

/// Payload for `on_session_started`.
#[derive(Debug, Clone)]
pub struct SessionStartedEvent {
    pub session_id: SessionId,
    pub target: Duration,
    pub generation: Generation,
    pub started_at: DateTime<Utc>,
}

/// Payload for `on_cycle_started`.
#[derive(Debug, Clone)]
pub struct CycleStartedEvent {
    pub session_id: SessionId,
    /// 1-based cycle number within the session.
    pub cycle: u64,
}

/// Payload for `on_cycle_scheduled`: a cycle settled and the next one is queued.
#[derive(Debug, Clone)]
pub struct CycleScheduledEvent {
    pub session_id: SessionId,
    pub cycle: u64,
    pub elapsed: Duration,
    pub delay: Duration,
}

/// Payload for `on_stale_completion`: a callback settled after teardown.
#[derive(Debug, Clone)]
pub struct StaleCompletionEvent {
    pub session_id: SessionId,
    pub cycle: u64,
    pub elapsed: Duration,
}

/// Payload for `on_session_stopped`.
#[derive(Debug, Clone)]
pub struct SessionStoppedEvent {
    pub session_id: SessionId,
    pub cycles_started: u64,
    pub stopped_at: DateTime<Utc>,
}

/// Why a debouncer dispatched its pending value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushReason {
    /// The quiet period elapsed.
    Timer,
    /// `flush()` was called.
    Explicit,
    /// The debouncer was dropped with a value pending.
    Drop,
}

/// Payload for `on_debounce_flushed`.
#[derive(Debug, Clone)]
pub struct DebounceFlushedEvent {
    pub debouncer_id: SessionId,
    pub reason: FlushReason,
    /// Triggers coalesced into this dispatch.
    pub coalesced: u64,
}

/// Payload for `on_task_canceled`.
#[derive(Debug, Clone)]
pub struct TaskCanceledEvent {
    pub task_id: SessionId,
}

/// Payload for `on_task_discarded`: a value arrived after cancellation and was
/// handed to the cleanup hook.
#[derive(Debug, Clone)]
pub struct TaskDiscardedEvent {
    pub task_id: SessionId,
}
