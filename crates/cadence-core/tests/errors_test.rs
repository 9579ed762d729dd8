//! Error codes and conversions.

use cadence_core::errors::*;

#[test]
fn subsystem_errors_convert_into_cadence_error() {
    let err: CadenceError = TaskError::Canceled.into();
    assert_eq!(err.error_code(), "TASK_CANCELED");
    assert_eq!(err.to_string(), "Task error: task canceled");

    let err: CadenceError = SchedulerError::NoRuntime {
        reason: "not inside a runtime".to_string(),
    }
    .into();
    assert_eq!(err.error_code(), "NO_RUNTIME");
}

#[test]
fn coded_message_prefixes_the_code() {
    let err = TaskError::Panicked {
        reason: "boom".to_string(),
    };
    assert_eq!(err.coded_message(), "[TASK_PANICKED] task panicked: boom");
}

#[test]
fn only_cancellation_counts_as_canceled() {
    assert!(TaskError::Canceled.is_canceled());
    assert!(!TaskError::Aborted.is_canceled());
    assert!(!TaskError::Panicked {
        reason: String::new()
    }
    .is_canceled());
}

#[test]
fn panic_payloads_become_panicked_errors() {
    let from_str = TaskError::from_panic(Box::new("boom"));
    assert_eq!(
        from_str,
        TaskError::Panicked {
            reason: "boom".to_string()
        }
    );

    let from_string = TaskError::from_panic(Box::new(format!("cycle {}", 3)));
    assert_eq!(from_string.to_string(), "task panicked: cycle 3");

    let opaque = TaskError::from_panic(Box::new(42u8));
    assert_eq!(opaque.error_code(), error_code::TASK_PANICKED);
}
