//! Shared helpers for interval tests. Every test runs on a paused clock.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use cadence_core::events::*;
use cadence_core::EventDispatcher;
use cadence_interval::{interval_callback, IntervalCallback, IntervalScheduler};

/// Callback that counts invocations and settles after `duration_ms`.
///
/// The sleep is created inside the closure body, so its deadline is measured
/// from the moment of invocation.
pub fn counting_callback(duration_ms: u64, calls: &Arc<AtomicUsize>) -> IntervalCallback<()> {
    let calls = Arc::clone(calls);
    interval_callback(move || {
        calls.fetch_add(1, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(duration_ms))
    })
}

pub fn count(calls: &AtomicUsize) -> usize {
    calls.load(Ordering::SeqCst)
}

/// Let every task that is ready at the current instant run to its next await.
pub async fn flush_tasks() {
    for _ in 0..16 {
        tokio::task::yield_now().await;
    }
}

/// Advance the paused clock by `ms`, then drain ready tasks.
pub async fn advance_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    flush_tasks().await;
}

#[derive(Default)]
pub struct RecordingHandler {
    pub scheduled: Mutex<Vec<CycleScheduledEvent>>,
    pub started: AtomicUsize,
    pub stale: AtomicUsize,
    pub stopped: AtomicUsize,
}

impl RecordingHandler {
    pub fn delays(&self) -> Vec<Duration> {
        self.scheduled.lock().unwrap().iter().map(|e| e.delay).collect()
    }
}

impl CadenceEventHandler for RecordingHandler {
    fn on_session_started(&self, _event: &SessionStartedEvent) {
        self.started.fetch_add(1, Ordering::SeqCst);
    }

    fn on_cycle_scheduled(&self, event: &CycleScheduledEvent) {
        self.scheduled.lock().unwrap().push(event.clone());
    }

    fn on_stale_completion(&self, _event: &StaleCompletionEvent) {
        self.stale.fetch_add(1, Ordering::SeqCst);
    }

    fn on_session_stopped(&self, _event: &SessionStoppedEvent) {
        self.stopped.fetch_add(1, Ordering::SeqCst);
    }
}

/// Scheduler on the current (paused) runtime with a recording handler attached.
pub fn recording_scheduler() -> (IntervalScheduler, Arc<RecordingHandler>) {
    let recorder = Arc::new(RecordingHandler::default());
    let scheduler = IntervalScheduler::new()
        .expect("tokio runtime")
        .with_events(EventDispatcher::new().with_handler(recorder.clone()));
    (scheduler, recorder)
}
