//! Top-level error aggregating every subsystem.

use super::error_code::CadenceErrorCode;
use super::{ConfigError, SchedulerError, TaskError};

/// Any Cadence error. Subsystem errors convert via `From`.
#[derive(Debug, thiserror::Error)]
pub enum CadenceError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Scheduler error: {0}")]
    Scheduler(#[from] SchedulerError),

    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

impl CadenceErrorCode for CadenceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Scheduler(e) => e.error_code(),
            Self::Task(e) => e.error_code(),
        }
    }
}

pub type CadenceResult<T> = Result<T, CadenceError>;
