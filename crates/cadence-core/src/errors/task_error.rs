//! Cancelable task errors.

use std::any::Any;

use super::error_code::{self, CadenceErrorCode};

/// Outcome of a background task that did not produce a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task canceled")]
    Canceled,

    #[error("task panicked: {reason}")]
    Panicked { reason: String },

    #[error("task aborted by the runtime")]
    Aborted,
}

impl TaskError {
    /// True for caller-requested cancellation, which is not a failure.
    pub fn is_canceled(&self) -> bool {
        matches!(self, Self::Canceled)
    }

    /// Wrap a panic payload, as returned by `JoinError::into_panic`.
    pub fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        let reason = if let Some(s) = payload.downcast_ref::<&str>() {
            (*s).to_string()
        } else if let Some(s) = payload.downcast_ref::<String>() {
            s.clone()
        } else {
            "non-string panic payload".to_string()
        };
        Self::Panicked { reason }
    }
}

impl CadenceErrorCode for TaskError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Canceled => error_code::TASK_CANCELED,
            Self::Panicked { .. } => error_code::TASK_PANICKED,
            Self::Aborted => error_code::TASK_ABORTED,
        }
    }
}
