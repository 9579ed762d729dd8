//! Delay until the next cycle.

use std::time::Duration;

/// `max(target - elapsed, 0)`.
///
/// A callback that took longer than the target gets a zero delay: the next
/// cycle is queued at once rather than skipped or run synchronously.
pub fn next_delay(target: Duration, elapsed: Duration) -> Duration {
    target.saturating_sub(elapsed)
}

/// Whole milliseconds for log fields, saturating at `u64::MAX`.
pub(crate) fn log_millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_elapsed_from_target() {
        assert_eq!(
            next_delay(Duration::from_millis(1_000), Duration::from_millis(50)),
            Duration::from_millis(950)
        );
    }

    #[test]
    fn clamps_to_zero_when_callback_overruns() {
        assert_eq!(
            next_delay(Duration::from_millis(1_000), Duration::from_millis(1_050)),
            Duration::ZERO
        );
    }

    #[test]
    fn exact_overrun_is_zero() {
        assert_eq!(
            next_delay(Duration::from_millis(1_000), Duration::from_millis(1_000)),
            Duration::ZERO
        );
    }

    #[test]
    fn log_millis_saturates_instead_of_wrapping() {
        assert_eq!(log_millis(Duration::from_millis(950)), 950);
        assert_eq!(log_millis(Duration::MAX), u64::MAX);
    }

    #[test]
    fn zero_target_is_always_zero() {
        assert_eq!(next_delay(Duration::ZERO, Duration::ZERO), Duration::ZERO);
        assert_eq!(next_delay(Duration::ZERO, Duration::from_millis(7)), Duration::ZERO);
    }
}
