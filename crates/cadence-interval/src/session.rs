//! One live (callback, target interval) binding and its handle.
//!
//! Lifecycle of a cycle:
//! 1. `invoke` calls the callback and spawns a task awaiting its future.
//! 2. `settle` runs when the future resolves. If the session's generation is
//!    still live it installs a one-shot timer for `next_delay`; otherwise the
//!    completion is stale and nothing is scheduled.
//! 3. `fire` runs when the timer elapses and goes back to step 1.
//!
//! The fence check and the timer install share the slot mutex with `stop`, so a
//! completion racing a teardown can never leave a timer behind.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use cadence_core::events::{
    CycleScheduledEvent, CycleStartedEvent, SessionStoppedEvent, StaleCompletionEvent,
};
use cadence_core::errors::TaskError;
use cadence_core::{EventDispatcher, Fence, Generation, SessionId};
use chrono::Utc;
use tokio::runtime::Handle;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::callback::IntervalCallback;
use crate::delay::{log_millis, next_delay};
use crate::stats::IntervalStats;

/// Type-erased control surface of a session, so handles are not generic over
/// the callback's output.
pub(crate) trait SessionControl: Send + Sync {
    fn id(&self) -> SessionId;
    fn target(&self) -> Duration;
    fn generation(&self) -> Generation;
    fn is_active(&self) -> bool;
    fn stop(&self) -> bool;
    fn stats(&self) -> IntervalStats;
}

#[derive(Default)]
struct SessionSlot {
    timer: Option<JoinHandle<()>>,
    stats: IntervalStats,
}

pub(crate) struct SessionCore<T> {
    id: SessionId,
    callback: IntervalCallback<T>,
    target: Duration,
    fence: Fence,
    generation: Generation,
    runtime: Handle,
    events: Arc<EventDispatcher>,
    outcomes: Option<UnboundedSender<T>>,
    slot: Mutex<SessionSlot>,
}

impl<T: Send + 'static> SessionCore<T> {
    pub(crate) fn new(
        callback: IntervalCallback<T>,
        target: Duration,
        fence: Fence,
        runtime: Handle,
        events: Arc<EventDispatcher>,
        outcomes: Option<UnboundedSender<T>>,
    ) -> Arc<Self> {
        let generation = fence.current();
        Arc::new(Self {
            id: SessionId::new(),
            callback,
            target,
            fence,
            generation,
            runtime,
            events,
            outcomes,
            slot: Mutex::new(SessionSlot::default()),
        })
    }

    fn slot(&self) -> MutexGuard<'_, SessionSlot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start one cycle: call the callback now and await it in the background.
    pub(crate) fn invoke(self: &Arc<Self>) {
        let cycle = {
            let mut slot = self.slot();
            slot.stats.cycles_started += 1;
            slot.stats.cycles_started
        };

        tracing::trace!(session_id = %self.id, cycle, "invoking interval callback");
        self.events.emit_cycle_started(&CycleStartedEvent {
            session_id: self.id,
            cycle,
        });

        let started = Instant::now();
        // The future runs as its own task so a panic surfaces as a `JoinError`
        // instead of taking the rescheduling down with it.
        let work = self.runtime.spawn((self.callback)());
        let this = Arc::clone(self);
        self.runtime.spawn(async move {
            let output = match work.await {
                Ok(output) => Some(output),
                Err(e) => {
                    let error = if e.is_panic() {
                        TaskError::from_panic(e.into_panic())
                    } else {
                        TaskError::Aborted
                    };
                    tracing::warn!(
                        session_id = %this.id,
                        cycle,
                        %error,
                        "interval callback failed to settle; treating it as completed"
                    );
                    None
                }
            };
            this.settle(cycle, started.elapsed(), output);
        });
    }

    /// `output` is `None` when the callback's future panicked.
    fn settle(self: &Arc<Self>, cycle: u64, elapsed: Duration, output: Option<T>) {
        let panicked = output.is_none();
        if let (Some(output), Some(outcomes)) = (output, &self.outcomes) {
            // The observer may have gone away; the schedule does not depend on it.
            let _ = outcomes.send(output);
        }

        let mut slot = self.slot();
        slot.stats.cycles_settled += 1;
        slot.stats.last_elapsed = Some(elapsed);
        if panicked {
            slot.stats.panicked_cycles += 1;
        }

        if !self.fence.is_current(self.generation) {
            slot.stats.stale_completions += 1;
            drop(slot);
            tracing::debug!(
                session_id = %self.id,
                cycle,
                elapsed_ms = log_millis(elapsed),
                "ignoring completion of stopped interval session"
            );
            self.events.emit_stale_completion(&StaleCompletionEvent {
                session_id: self.id,
                cycle,
                elapsed,
            });
            return;
        }

        let delay = next_delay(self.target, elapsed);
        slot.stats.last_delay = Some(delay);
        slot.stats.last_settled_at = Some(Utc::now());

        let this = Arc::clone(self);
        slot.timer = Some(self.runtime.spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            this.fire();
        }));
        drop(slot);

        tracing::trace!(
            session_id = %self.id,
            cycle,
            elapsed_ms = log_millis(elapsed),
            delay_ms = log_millis(delay),
            "interval cycle scheduled"
        );
        self.events.emit_cycle_scheduled(&CycleScheduledEvent {
            session_id: self.id,
            cycle,
            elapsed,
            delay,
        });
    }

    fn fire(self: &Arc<Self>) {
        {
            let mut slot = self.slot();
            if !self.fence.is_current(self.generation) {
                return;
            }
            // This is our own task's handle; dropping it just detaches.
            slot.timer = None;
        }
        self.invoke();
    }
}

impl<T: Send + 'static> SessionControl for SessionCore<T> {
    fn id(&self) -> SessionId {
        self.id
    }

    fn target(&self) -> Duration {
        self.target
    }

    fn generation(&self) -> Generation {
        self.generation
    }

    fn is_active(&self) -> bool {
        self.fence.is_current(self.generation)
    }

    fn stop(&self) -> bool {
        let (timer, cycles_started) = {
            let mut slot = self.slot();
            if !self.fence.retire(self.generation) {
                return false;
            }
            (slot.timer.take(), slot.stats.cycles_started)
        };
        if let Some(timer) = timer {
            timer.abort();
        }

        tracing::debug!(session_id = %self.id, cycles_started, "interval session stopped");
        self.events.emit_session_stopped(&SessionStoppedEvent {
            session_id: self.id,
            cycles_started,
            stopped_at: Utc::now(),
        });
        true
    }

    fn stats(&self) -> IntervalStats {
        self.slot().stats.clone()
    }
}

/// Handle to a running interval session.
///
/// Cloning shares the session. Dropping a handle does **not** stop the session;
/// call [`stop`](Self::stop), or use [`IntervalBinding`](crate::IntervalBinding)
/// for drop-based teardown.
#[derive(Clone)]
#[must_use = "an interval session keeps running until stopped"]
pub struct IntervalHandle {
    core: Arc<dyn SessionControl>,
}

impl IntervalHandle {
    pub(crate) fn new(core: Arc<dyn SessionControl>) -> Self {
        Self { core }
    }

    pub fn id(&self) -> SessionId {
        self.core.id()
    }

    pub fn target(&self) -> Duration {
        self.core.target()
    }

    /// Generation stamp this session was started with.
    pub fn generation(&self) -> Generation {
        self.core.generation()
    }

    /// False once the session has been stopped or replaced.
    pub fn is_active(&self) -> bool {
        self.core.is_active()
    }

    /// Cancel the pending timer and fence off any in-flight completion.
    ///
    /// Idempotent. Returns `true` only for the call that actually stopped the
    /// session. An in-flight callback keeps running to completion; only its
    /// rescheduling is suppressed.
    pub fn stop(&self) -> bool {
        self.core.stop()
    }

    pub fn stats(&self) -> IntervalStats {
        self.core.stats()
    }
}

impl fmt::Debug for IntervalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalHandle")
            .field("id", &self.id())
            .field("target", &self.target())
            .field("generation", &self.generation())
            .field("active", &self.is_active())
            .finish()
    }
}
