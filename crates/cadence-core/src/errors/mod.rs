//! Error handling for Cadence.
//! One error enum per subsystem, `thiserror` only.

pub mod cadence_error;
pub mod config_error;
pub mod error_code;
pub mod scheduler_error;
pub mod task_error;

pub use cadence_error::{CadenceError, CadenceResult};
pub use config_error::ConfigError;
pub use error_code::CadenceErrorCode;
pub use scheduler_error::SchedulerError;
pub use task_error::TaskError;
