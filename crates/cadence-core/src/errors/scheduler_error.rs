//! Scheduler construction errors.

use super::error_code::{self, CadenceErrorCode};

/// Errors raised while setting up a scheduler or debouncer.
///
/// Callback failures are never reported here; they belong to whoever observes
/// the callback's output.
#[derive(Debug, thiserror::Error)]
pub enum SchedulerError {
    #[error("no tokio runtime available: {reason}")]
    NoRuntime { reason: String },
}

impl CadenceErrorCode for SchedulerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NoRuntime { .. } => error_code::NO_RUNTIME,
        }
    }
}
