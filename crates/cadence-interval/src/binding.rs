//! Rebindable interval owner.
//!
//! [`IntervalBinding`] models an owning context that re-supplies its callback
//! and target every time it refreshes: identical inputs keep the running
//! session, changed inputs replace it, and dropping the binding tears it down.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use cadence_core::{Fence, Generation};

use crate::callback::IntervalCallback;
use crate::scheduler::IntervalScheduler;
use crate::session::IntervalHandle;

/// What [`IntervalBinding::bind`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindOutcome {
    /// No session was running; a new one started.
    Started,
    /// The previous session was stopped and a new one started.
    Replaced,
    /// Same callback and target as the running session; nothing changed.
    Unchanged,
}

struct Bound<T> {
    callback: IntervalCallback<T>,
    target: Duration,
    handle: IntervalHandle,
}

/// Owns at most one interval session at a time.
///
/// All sessions of a binding share one [`Fence`], so every replacement or
/// teardown advances the same generation.
pub struct IntervalBinding<T> {
    scheduler: IntervalScheduler,
    fence: Fence,
    bound: Option<Bound<T>>,
}

impl<T> IntervalBinding<T> {
    pub fn new(scheduler: IntervalScheduler) -> Self {
        Self {
            scheduler,
            fence: Fence::new(),
            bound: None,
        }
    }

    /// Stop the current session, if any. Returns whether one was running.
    pub fn unbind(&mut self) -> bool {
        match self.bound.take() {
            Some(bound) => {
                bound.handle.stop();
                true
            }
            None => false,
        }
    }

    /// Handle of the current session.
    pub fn handle(&self) -> Option<&IntervalHandle> {
        self.bound.as_ref().map(|b| &b.handle)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    /// Live generation of the binding's fence.
    pub fn generation(&self) -> Generation {
        self.fence.current()
    }
}

impl<T: Send + 'static> IntervalBinding<T> {
    /// Bind `callback` at `target`.
    ///
    /// The callback is compared by `Arc` identity. A changed callback or target
    /// stops the current session (canceling its timer and fencing its in-flight
    /// completion) and starts a new one, which invokes immediately.
    pub fn bind(&mut self, callback: &IntervalCallback<T>, target: Duration) -> BindOutcome {
        if let Some(bound) = &self.bound {
            if Arc::ptr_eq(&bound.callback, callback) && bound.target == target {
                return BindOutcome::Unchanged;
            }
        }

        let replaced = self.unbind();
        let handle =
            self.scheduler
                .start_fenced(Arc::clone(callback), target, self.fence.clone(), None);
        self.bound = Some(Bound {
            callback: Arc::clone(callback),
            target,
            handle,
        });

        if replaced {
            BindOutcome::Replaced
        } else {
            BindOutcome::Started
        }
    }
}

impl<T> Drop for IntervalBinding<T> {
    fn drop(&mut self) {
        self.unbind();
    }
}

impl<T> fmt::Debug for IntervalBinding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IntervalBinding")
            .field("generation", &self.fence.current())
            .field("handle", &self.handle())
            .finish()
    }
}
