//! Stable error codes for callers that match on strings (logs, FFI, dashboards).

/// Every Cadence error enum exposes a stable code string.
pub trait CadenceErrorCode {
    /// Returns the code string (e.g., "CONFIG_ERROR").
    fn error_code(&self) -> &'static str;

    /// Returns `[ERROR_CODE] message`.
    fn coded_message(&self) -> String
    where
        Self: std::fmt::Display,
    {
        format!("[{}] {}", self.error_code(), self)
    }
}

pub const CONFIG_ERROR: &str = "CONFIG_ERROR";
pub const NO_RUNTIME: &str = "NO_RUNTIME";
pub const TASK_CANCELED: &str = "TASK_CANCELED";
pub const TASK_PANICKED: &str = "TASK_PANICKED";
pub const TASK_ABORTED: &str = "TASK_ABORTED";
