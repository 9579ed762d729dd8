//! Trailing-edge debounce.
//!
//! Each `trigger` replaces the pending value and restarts the quiet-period
//! timer; the sink only sees the last value of a burst. Timers are fenced by
//! generation, so a timer that fires just as it is being replaced does nothing.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cadence_core::config::DebounceConfig;
use cadence_core::errors::SchedulerError;
use cadence_core::events::{DebounceFlushedEvent, FlushReason};
use cadence_core::{EventDispatcher, Fence, Generation, SessionId};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

type Sink<V> = Box<dyn Fn(V) + Send + Sync + 'static>;

struct DebounceSlot<V> {
    pending: Option<V>,
    coalesced: u64,
    timer: Option<JoinHandle<()>>,
    events: Arc<EventDispatcher>,
}

struct DebounceShared<V> {
    id: SessionId,
    fence: Fence,
    sink: Sink<V>,
    slot: Mutex<DebounceSlot<V>>,
}

impl<V: Send + 'static> DebounceShared<V> {
    fn slot(&self) -> MutexGuard<'_, DebounceSlot<V>> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take the pending value, clearing the timer. `None` when stale or empty.
    fn take_pending(
        &self,
        expected: Option<Generation>,
    ) -> Option<(V, u64, Arc<EventDispatcher>)> {
        let mut slot = self.slot();
        match expected {
            Some(generation) if !self.fence.is_current(generation) => return None,
            Some(_) => slot.timer = None,
            None => {
                if let Some(timer) = slot.timer.take() {
                    timer.abort();
                }
                self.fence.advance();
            }
        }
        let value = slot.pending.take()?;
        let coalesced = std::mem::take(&mut slot.coalesced);
        Some((value, coalesced, Arc::clone(&slot.events)))
    }

    fn dispatch(&self, expected: Option<Generation>, reason: FlushReason) -> bool {
        let Some((value, coalesced, events)) = self.take_pending(expected) else {
            return false;
        };
        tracing::debug!(debouncer_id = %self.id, ?reason, coalesced, "debounced value dispatched");
        (self.sink)(value);
        events.emit_debounce_flushed(&DebounceFlushedEvent {
            debouncer_id: self.id,
            reason,
            coalesced,
        });
        true
    }
}

/// Debounces values of type `V` into a synchronous sink.
pub struct Debouncer<V: Send + 'static> {
    delay: Duration,
    flush_on_drop: bool,
    runtime: Handle,
    shared: Arc<DebounceShared<V>>,
}

impl<V: Send + 'static> Debouncer<V> {
    /// Debounce on the current runtime with the given quiet period.
    pub fn new<F>(delay: Duration, sink: F) -> Result<Self, SchedulerError>
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        Ok(Self::with_handle(current_runtime()?, delay, sink))
    }

    /// Debounce on the current runtime using `config`.
    pub fn from_config<F>(config: &DebounceConfig, sink: F) -> Result<Self, SchedulerError>
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        Ok(Self::with_handle(current_runtime()?, config.effective_delay(), sink)
            .with_flush_on_drop(config.effective_flush_on_drop()))
    }

    /// Debounce on an explicit runtime.
    pub fn with_handle<F>(runtime: Handle, delay: Duration, sink: F) -> Self
    where
        F: Fn(V) + Send + Sync + 'static,
    {
        Self {
            delay,
            flush_on_drop: DebounceConfig::default().effective_flush_on_drop(),
            runtime,
            shared: Arc::new(DebounceShared {
                id: SessionId::new(),
                fence: Fence::new(),
                sink: Box::new(sink),
                slot: Mutex::new(DebounceSlot {
                    pending: None,
                    coalesced: 0,
                    timer: None,
                    events: Arc::new(EventDispatcher::new()),
                }),
            }),
        }
    }

    pub fn with_events(self, events: EventDispatcher) -> Self {
        self.shared.slot().events = Arc::new(events);
        self
    }

    pub fn with_flush_on_drop(mut self, flush_on_drop: bool) -> Self {
        self.flush_on_drop = flush_on_drop;
        self
    }

    pub fn id(&self) -> SessionId {
        self.shared.id
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replace the pending value and restart the quiet period.
    pub fn trigger(&self, value: V) {
        let mut slot = self.shared.slot();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        let generation = self.shared.fence.advance();
        slot.pending = Some(value);
        slot.coalesced += 1;

        let shared = Arc::clone(&self.shared);
        let delay = self.delay;
        slot.timer = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            shared.dispatch(Some(generation), FlushReason::Timer);
        }));
    }

    /// Dispatch the pending value now. Returns whether there was one.
    pub fn flush(&self) -> bool {
        self.shared.dispatch(None, FlushReason::Explicit)
    }

    /// Drop the pending value without dispatching. Returns whether there was one.
    pub fn cancel(&self) -> bool {
        let mut slot = self.shared.slot();
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        self.shared.fence.advance();
        slot.coalesced = 0;
        let had_pending = slot.pending.take().is_some();
        if had_pending {
            tracing::debug!(debouncer_id = %self.shared.id, "pending debounced value dropped");
        }
        had_pending
    }

    pub fn is_pending(&self) -> bool {
        self.shared.slot().pending.is_some()
    }
}

impl<V: Send + 'static> Drop for Debouncer<V> {
    fn drop(&mut self) {
        if self.flush_on_drop {
            self.shared.dispatch(None, FlushReason::Drop);
        } else {
            self.cancel();
        }
    }
}

impl<V: Send + 'static> fmt::Debug for Debouncer<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Debouncer")
            .field("id", &self.shared.id)
            .field("delay", &self.delay)
            .field("flush_on_drop", &self.flush_on_drop)
            .field("pending", &self.is_pending())
            .finish()
    }
}

fn current_runtime() -> Result<Handle, SchedulerError> {
    Handle::try_current().map_err(|e| SchedulerError::NoRuntime {
        reason: e.to_string(),
    })
}
