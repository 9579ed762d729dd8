//! Generation fencing for asynchronous continuations.
//!
//! Every session stamps its continuations with the [`Generation`] that was live
//! when it started. Before acting, a continuation compares its stamp with the
//! fence; on mismatch it must do nothing.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Opaque generation stamp handed out by a [`Fence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Generation(u64);

impl Generation {
    /// Raw counter value, for logging.
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for Generation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "gen#{}", self.0)
    }
}

/// Shared generation counter.
///
/// Cloning a fence shares the counter, so every clone observes the same live
/// generation.
#[derive(Debug, Clone, Default)]
pub struct Fence {
    current: Arc<AtomicU64>,
}

impl Fence {
    pub fn new() -> Self {
        Self::default()
    }

    /// The live generation.
    pub fn current(&self) -> Generation {
        Generation(self.current.load(Ordering::Acquire))
    }

    /// Whether `generation` is still the live one.
    pub fn is_current(&self, generation: Generation) -> bool {
        self.current.load(Ordering::Acquire) == generation.0
    }

    /// Unconditionally invalidate the live generation and return the new one.
    pub fn advance(&self) -> Generation {
        let previous = self.current.fetch_add(1, Ordering::AcqRel);
        Generation(previous.wrapping_add(1))
    }

    /// Invalidate `generation` if it is still live.
    ///
    /// Returns `false` when something else already moved the fence on, in which
    /// case the fence is left untouched.
    pub fn retire(&self, generation: Generation) -> bool {
        self.current
            .compare_exchange(
                generation.0,
                generation.0.wrapping_add(1),
                Ordering::AcqRel,
                Ordering::Acquire,
            )
            .is_ok()
    }
}
