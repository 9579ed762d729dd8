//! # cadence-deferred
//!
//! Deferred work on a tokio runtime:
//! - [`Debouncer`]: coalesces bursts of updates into one trailing dispatch.
//! - [`CancelableTask`]: a background fetch whose result can be abandoned,
//!   with a cleanup hook for values that arrive after cancellation.

pub mod cancelable;
pub mod debouncer;

pub use cancelable::{CancelableTask, TaskCanceler};
pub use debouncer::Debouncer;
