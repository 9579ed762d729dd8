//! Entry point for starting interval sessions.

use std::sync::Arc;
use std::time::Duration;

use cadence_core::config::IntervalConfig;
use cadence_core::errors::SchedulerError;
use cadence_core::events::SessionStartedEvent;
use cadence_core::{EventDispatcher, Fence};
use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::callback::IntervalCallback;
use crate::delay::log_millis;
use crate::session::{IntervalHandle, SessionCore};

/// Starts adaptive interval sessions on a tokio runtime.
///
/// Cheap to clone; clones share the runtime handle and event dispatcher.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    runtime: Handle,
    events: Arc<EventDispatcher>,
    default_target: Duration,
}

impl IntervalScheduler {
    /// Bind to the tokio runtime of the calling context.
    pub fn new() -> Result<Self, SchedulerError> {
        Self::from_config(&IntervalConfig::default())
    }

    /// Bind to the current runtime, taking the default target from `config`.
    pub fn from_config(config: &IntervalConfig) -> Result<Self, SchedulerError> {
        let runtime = Handle::try_current().map_err(|e| SchedulerError::NoRuntime {
            reason: e.to_string(),
        })?;
        Ok(Self::with_handle(runtime).with_default_target(config.effective_target_interval()))
    }

    /// Bind to an explicit runtime handle. Usable outside any runtime context.
    pub fn with_handle(runtime: Handle) -> Self {
        Self {
            runtime,
            events: Arc::new(EventDispatcher::new()),
            default_target: IntervalConfig::default().effective_target_interval(),
        }
    }

    pub fn with_events(mut self, events: EventDispatcher) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn with_default_target(mut self, target: Duration) -> Self {
        self.default_target = target;
        self
    }

    /// Target used by [`start_configured`](Self::start_configured).
    pub fn default_target(&self) -> Duration {
        self.default_target
    }

    /// Start a session. The callback runs once before this returns.
    pub fn start<T: Send + 'static>(
        &self,
        callback: IntervalCallback<T>,
        target: Duration,
    ) -> IntervalHandle {
        self.start_fenced(callback, target, Fence::new(), None)
    }

    /// Start a session using the configured default target.
    pub fn start_configured<T: Send + 'static>(
        &self,
        callback: IntervalCallback<T>,
    ) -> IntervalHandle {
        self.start(callback, self.default_target)
    }

    /// Start a session and receive every settled callback output, failures
    /// included, on the returned channel. Outputs of stale completions are
    /// delivered too; they simply do not reschedule.
    pub fn start_observed<T: Send + 'static>(
        &self,
        callback: IntervalCallback<T>,
        target: Duration,
    ) -> (IntervalHandle, UnboundedReceiver<T>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = self.start_fenced(callback, target, Fence::new(), Some(tx));
        (handle, rx)
    }

    /// Equivalent to `handle.stop()`.
    pub fn stop(&self, handle: &IntervalHandle) -> bool {
        handle.stop()
    }

    pub(crate) fn start_fenced<T: Send + 'static>(
        &self,
        callback: IntervalCallback<T>,
        target: Duration,
        fence: Fence,
        outcomes: Option<UnboundedSender<T>>,
    ) -> IntervalHandle {
        let core = SessionCore::new(
            callback,
            target,
            fence,
            self.runtime.clone(),
            Arc::clone(&self.events),
            outcomes,
        );
        let handle = IntervalHandle::new(core.clone());

        tracing::debug!(
            session_id = %handle.id(),
            target_ms = log_millis(target),
            generation = handle.generation().value(),
            "interval session started"
        );
        self.events.emit_session_started(&SessionStartedEvent {
            session_id: handle.id(),
            target,
            generation: handle.generation(),
            started_at: Utc::now(),
        });

        core.invoke();
        handle
    }
}
