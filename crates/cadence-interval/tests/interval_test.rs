//! Adaptive interval scheduling on a paused tokio clock.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use cadence_core::config::IntervalConfig;
use cadence_core::errors::SchedulerError;
use cadence_interval::{interval_callback, IntervalScheduler};
use common::*;

const TARGET: Duration = Duration::from_millis(1_000);

#[tokio::test(start_paused = true)]
async fn first_invocation_happens_inside_start() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, recorder) = recording_scheduler();

    let handle = scheduler.start(counting_callback(50, &calls), TARGET);

    assert_eq!(count(&calls), 1);
    assert_eq!(recorder.started.load(Ordering::SeqCst), 1);
    assert!(recorder.delays().is_empty(), "no timer before the first completion");
    assert_eq!(handle.stats().in_flight(), 1);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn next_delay_is_target_minus_callback_duration() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, recorder) = recording_scheduler();

    let handle = scheduler.start(counting_callback(50, &calls), TARGET);

    advance_ms(50).await;
    assert_eq!(count(&calls), 1, "settling must not invoke again");
    assert_eq!(recorder.delays(), vec![Duration::from_millis(950)]);
    let stats = handle.stats();
    assert_eq!(stats.last_elapsed, Some(Duration::from_millis(50)));
    assert_eq!(stats.last_delay, Some(Duration::from_millis(950)));
    assert!(stats.last_settled_at.is_some());

    advance_ms(949).await;
    assert_eq!(count(&calls), 1);

    advance_ms(1).await;
    assert_eq!(count(&calls), 2, "second cycle starts exactly one target after the first");
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn overrunning_callback_is_rescheduled_with_zero_delay() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, recorder) = recording_scheduler();

    let handle = scheduler.start(counting_callback(1_050, &calls), TARGET);

    advance_ms(1_050).await;
    assert_eq!(recorder.delays(), vec![Duration::ZERO]);
    assert_eq!(handle.stats().last_delay, Some(Duration::ZERO));
    assert_eq!(count(&calls), 2);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn zero_target_reschedules_right_after_each_completion() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, recorder) = recording_scheduler();

    let handle = scheduler.start(counting_callback(10, &calls), Duration::ZERO);

    advance_ms(35).await;
    // Invocations at t=0, 10, 20, 30.
    assert_eq!(count(&calls), 4);
    assert!(recorder.delays().iter().all(|d| d.is_zero()));
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn invocations_never_overlap() {
    let running = Arc::new(AtomicUsize::new(0));
    let overlaps = Arc::new(AtomicUsize::new(0));
    let callback = {
        let running = Arc::clone(&running);
        let overlaps = Arc::clone(&overlaps);
        interval_callback(move || {
            if running.fetch_add(1, Ordering::SeqCst) > 0 {
                overlaps.fetch_add(1, Ordering::SeqCst);
            }
            let running = Arc::clone(&running);
            async move {
                tokio::time::sleep(Duration::from_millis(300)).await;
                running.fetch_sub(1, Ordering::SeqCst);
            }
        })
    };
    let scheduler = IntervalScheduler::new().unwrap();

    let handle = scheduler.start(callback, Duration::from_millis(100));
    advance_ms(3_000).await;

    assert_eq!(overlaps.load(Ordering::SeqCst), 0);
    assert!(handle.stats().cycles_started >= 10);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn stop_cancels_pending_timer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, recorder) = recording_scheduler();

    let handle = scheduler.start(counting_callback(50, &calls), TARGET);
    advance_ms(50).await;
    assert_eq!(recorder.delays().len(), 1);

    assert!(handle.stop());
    assert!(!handle.is_active());

    advance_ms(5_000).await;
    assert_eq!(count(&calls), 1);
    assert_eq!(recorder.stopped.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_while_in_flight_suppresses_rescheduling() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, recorder) = recording_scheduler();

    let handle = scheduler.start(counting_callback(50, &calls), TARGET);
    assert!(scheduler.stop(&handle));

    advance_ms(50).await;
    let stats = handle.stats();
    assert_eq!(stats.cycles_settled, 1, "the in-flight callback still runs to completion");
    assert_eq!(stats.stale_completions, 1);
    assert_eq!(stats.last_delay, None);
    assert!(recorder.delays().is_empty());
    assert_eq!(recorder.stale.load(Ordering::SeqCst), 1);

    advance_ms(5_000).await;
    assert_eq!(count(&calls), 1);
}

#[tokio::test(start_paused = true)]
async fn stop_is_idempotent() {
    let calls = Arc::new(AtomicUsize::new(0));
    let (scheduler, recorder) = recording_scheduler();

    let handle = scheduler.start(counting_callback(50, &calls), TARGET);
    let clone = handle.clone();

    assert!(handle.stop());
    assert!(!handle.stop());
    assert!(!clone.stop());
    assert_eq!(recorder.stopped.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn callback_that_never_settles_halts_the_cycle() {
    let calls = Arc::new(AtomicUsize::new(0));
    let callback = {
        let calls = Arc::clone(&calls);
        interval_callback(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            std::future::pending::<()>()
        })
    };
    let scheduler = IntervalScheduler::new().unwrap();

    let handle = scheduler.start(callback, Duration::from_millis(10));
    advance_ms(10_000).await;

    assert_eq!(count(&calls), 1);
    assert_eq!(handle.stats().cycles_settled, 0);
    assert_eq!(handle.stats().in_flight(), 1);
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn panicking_callback_still_schedules_the_next_cycle() {
    let calls = Arc::new(AtomicUsize::new(0));
    let callback = {
        let calls = Arc::clone(&calls);
        interval_callback(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if n == 0 {
                    panic!("first refresh blew up");
                }
            }
        })
    };
    let (scheduler, recorder) = recording_scheduler();

    let (handle, mut outcomes) = scheduler.start_observed(callback, TARGET);

    advance_ms(50).await;
    let stats = handle.stats();
    assert!(handle.is_active());
    assert_eq!(stats.cycles_settled, 1);
    assert_eq!(stats.panicked_cycles, 1);
    assert_eq!(stats.in_flight(), 0);
    assert_eq!(recorder.delays(), vec![Duration::from_millis(950)]);
    assert!(outcomes.try_recv().is_err(), "a panicked cycle has no output");

    advance_ms(950).await;
    assert_eq!(count(&calls), 2, "the cycle after a panic still runs on time");

    advance_ms(50).await;
    let stats = handle.stats();
    assert_eq!(stats.cycles_settled, 2);
    assert_eq!(stats.panicked_cycles, 1);
    assert_eq!(outcomes.try_recv(), Ok(()));
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn failures_reach_the_observer_and_do_not_change_the_schedule() {
    let calls = Arc::new(AtomicUsize::new(0));
    let callback = {
        let calls = Arc::clone(&calls);
        interval_callback(move || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                if n % 2 == 0 {
                    Err(format!("refresh {n} failed"))
                } else {
                    Ok(n)
                }
            }
        })
    };
    let (scheduler, recorder) = recording_scheduler();

    let (handle, mut outcomes) = scheduler.start_observed(callback, TARGET);
    advance_ms(2_050).await;
    handle.stop();

    let mut seen = Vec::new();
    while let Ok(outcome) = outcomes.try_recv() {
        seen.push(outcome);
    }
    assert_eq!(
        seen,
        vec![
            Err("refresh 0 failed".to_string()),
            Ok(1),
            Err("refresh 2 failed".to_string()),
        ]
    );
    assert_eq!(recorder.delays(), vec![Duration::from_millis(950); 3]);
}

#[tokio::test(start_paused = true)]
async fn configured_target_is_used_by_start_configured() {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = IntervalConfig {
        target_interval_ms: Some(200),
    };
    let scheduler = IntervalScheduler::from_config(&config).unwrap();
    assert_eq!(scheduler.default_target(), Duration::from_millis(200));

    let handle = scheduler.start_configured(counting_callback(20, &calls));
    advance_ms(200).await;
    assert_eq!(count(&calls), 2);
    assert_eq!(handle.stats().last_delay, Some(Duration::from_millis(180)));
    handle.stop();
}

#[tokio::test(start_paused = true)]
async fn stats_serialize_to_json() {
    let calls = Arc::new(AtomicUsize::new(0));
    let scheduler = IntervalScheduler::new().unwrap();
    let handle = scheduler.start(counting_callback(50, &calls), TARGET);
    advance_ms(50).await;

    let json = serde_json::to_value(handle.stats()).unwrap();
    assert_eq!(json["cycles_started"], 1);
    assert_eq!(json["stale_completions"], 0);
    assert_eq!(json["panicked_cycles"], 0);
    handle.stop();
}

#[test]
fn scheduler_requires_a_runtime() {
    let err = IntervalScheduler::new().unwrap_err();
    assert!(matches!(err, SchedulerError::NoRuntime { .. }));
}

#[test]
fn explicit_handle_works_outside_the_runtime_context() {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let callback = {
        let calls = Arc::clone(&calls);
        interval_callback(move || {
            calls.fetch_add(1, Ordering::SeqCst);
            async {}
        })
    };
    let scheduler = IntervalScheduler::with_handle(runtime.handle().clone());

    let handle = scheduler.start(callback, TARGET);
    assert_eq!(count(&calls), 1);
    assert!(handle.stop());
}
