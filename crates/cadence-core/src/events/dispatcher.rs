//! EventDispatcher: synchronous fan-out to registered handlers.

use std::sync::Arc;

use super::handler::CadenceEventHandler;
use super::types::*;

/// Synchronous event dispatcher wrapping a list of handlers.
///
/// With no handlers registered, `emit` iterates an empty Vec.
#[derive(Default, Clone)]
pub struct EventDispatcher {
    handlers: Vec<Arc<dyn CadenceEventHandler>>,
}

impl EventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn CadenceEventHandler>) {
        self.handlers.push(handler);
    }

    /// Builder-style `register`.
    pub fn with_handler(mut self, handler: Arc<dyn CadenceEventHandler>) -> Self {
        self.register(handler);
        self
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    /// A panicking handler is logged and does not stop later handlers.
    fn emit<F: Fn(&dyn CadenceEventHandler)>(&self, event: &'static str, f: F) {
        for handler in &self.handlers {
            let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                f(handler.as_ref());
            }));
            if result.is_err() {
                tracing::warn!(event, "event handler panicked");
            }
        }
    }

    // ---- Interval sessions ----
    pub fn emit_session_started(&self, event: &SessionStartedEvent) {
        self.emit("session_started", |h| h.on_session_started(event));
    }

    pub fn emit_cycle_started(&self, event: &CycleStartedEvent) {
        self.emit("cycle_started", |h| h.on_cycle_started(event));
    }

    pub fn emit_cycle_scheduled(&self, event: &CycleScheduledEvent) {
        self.emit("cycle_scheduled", |h| h.on_cycle_scheduled(event));
    }

    pub fn emit_stale_completion(&self, event: &StaleCompletionEvent) {
        self.emit("stale_completion", |h| h.on_stale_completion(event));
    }

    pub fn emit_session_stopped(&self, event: &SessionStoppedEvent) {
        self.emit("session_stopped", |h| h.on_session_stopped(event));
    }

    // ---- Deferred dispatch ----
    pub fn emit_debounce_flushed(&self, event: &DebounceFlushedEvent) {
        self.emit("debounce_flushed", |h| h.on_debounce_flushed(event));
    }

    pub fn emit_task_canceled(&self, event: &TaskCanceledEvent) {
        self.emit("task_canceled", |h| h.on_task_canceled(event));
    }

    pub fn emit_task_discarded(&self, event: &TaskDiscardedEvent) {
        self.emit("task_discarded", |h| h.on_task_discarded(event));
    }
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
