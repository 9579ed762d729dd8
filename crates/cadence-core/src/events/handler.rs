//! CadenceEventHandler trait, all methods with no-op defaults.

use super::types::*;

/// Trait for observing Cadence lifecycle events.
///
/// Handlers only override the events they care about. Handlers are invoked
/// from runtime worker threads, hence `Send + Sync`.
pub trait CadenceEventHandler: Send + Sync {
    // ---- Interval sessions ----
    fn on_session_started(&self, _event: &SessionStartedEvent) {}
    fn on_cycle_started(&self, _event: &CycleStartedEvent) {}
    fn on_cycle_scheduled(&self, _event: &CycleScheduledEvent) {}
    fn on_stale_completion(&self, _event: &StaleCompletionEvent) {}
    fn on_session_stopped(&self, _event: &SessionStoppedEvent) {}

    // ---- Deferred dispatch ----
    fn on_debounce_flushed(&self, _event: &DebounceFlushedEvent) {}
    fn on_task_canceled(&self, _event: &TaskCanceledEvent) {}
    fn on_task_discarded(&self, _event: &TaskDiscardedEvent) {}
}
