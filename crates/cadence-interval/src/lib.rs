//! # cadence-interval
//!
//! Adaptive interval scheduling on a tokio runtime.
//!
//! A session invokes its callback immediately, waits for the returned future to
//! settle, then sleeps for whatever is left of the target interval before the
//! next invocation. Invocations never overlap, and a stopped or replaced session
//! is fenced so late completions cannot reschedule it.

pub mod binding;
pub mod callback;
pub mod delay;
pub mod scheduler;
pub mod session;
pub mod stats;

pub use binding::{BindOutcome, IntervalBinding};
pub use callback::{interval_callback, IntervalCallback, IntervalFuture};
pub use delay::next_delay;
pub use scheduler::IntervalScheduler;
pub use session::IntervalHandle;
pub use stats::IntervalStats;
