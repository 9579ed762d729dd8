//! Cancelable background tasks.
//!
//! Canceling does not stop the background future. It resolves the awaiting
//! side with [`TaskError::Canceled`] right away, and whatever value the future
//! produces later is handed to the cleanup hook instead of being lost.

use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cadence_core::errors::{SchedulerError, TaskError};
use cadence_core::events::{TaskCanceledEvent, TaskDiscardedEvent};
use cadence_core::{EventDispatcher, SessionId};
use tokio::runtime::Handle;
use tokio::sync::oneshot;

type Delivery<T> = Result<T, TaskError>;

struct TaskState<T> {
    sender: Option<oneshot::Sender<Delivery<T>>>,
    canceled: bool,
    events: Arc<EventDispatcher>,
}

struct TaskShared<T> {
    id: SessionId,
    state: Mutex<TaskState<T>>,
}

impl<T> TaskShared<T> {
    fn state(&self) -> MutexGuard<'_, TaskState<T>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn cancel(&self) -> bool {
        let (sender, events) = {
            let mut state = self.state();
            let Some(sender) = state.sender.take() else {
                return false;
            };
            state.canceled = true;
            (sender, Arc::clone(&state.events))
        };
        // The receiver may already be gone; cancellation still counts.
        let _ = sender.send(Err(TaskError::Canceled));
        tracing::debug!(task_id = %self.id, "background task canceled");
        events.emit_task_canceled(&TaskCanceledEvent { task_id: self.id });
        true
    }

    fn deliver<C: FnOnce(T)>(&self, result: Delivery<T>, cleanup: C) {
        let (sender, events) = {
            let mut state = self.state();
            (state.sender.take(), Arc::clone(&state.events))
        };

        let unclaimed = match sender {
            Some(sender) => match sender.send(result) {
                Ok(()) => return,
                // Nobody is waiting any more.
                Err(result) => result,
            },
            None => result,
        };

        match unclaimed {
            Ok(value) => {
                tracing::debug!(task_id = %self.id, "discarding value of abandoned task");
                cleanup(value);
                events.emit_task_discarded(&TaskDiscardedEvent { task_id: self.id });
            }
            Err(error) if !error.is_canceled() => {
                tracing::warn!(task_id = %self.id, %error, "abandoned task failed");
            }
            Err(_) => {}
        }
    }
}

/// A spawned future whose result can be abandoned.
pub struct CancelableTask<T> {
    shared: Arc<TaskShared<T>>,
    receiver: oneshot::Receiver<Delivery<T>>,
}

impl<T: Send + 'static> CancelableTask<T> {
    /// Spawn on the current runtime.
    pub fn spawn<F>(future: F) -> Result<Self, SchedulerError>
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self::spawn_with_cleanup(future, drop)
    }

    /// Like [`spawn`](Self::spawn), but a value produced after cancellation (or
    /// after the task handle was dropped) is passed to `cleanup`.
    pub fn spawn_with_cleanup<F, C>(future: F, cleanup: C) -> Result<Self, SchedulerError>
    where
        F: Future<Output = T> + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let runtime = Handle::try_current().map_err(|e| SchedulerError::NoRuntime {
            reason: e.to_string(),
        })?;
        Ok(Self::spawn_on(&runtime, future, cleanup))
    }

    /// Spawn on an explicit runtime. Usable outside any runtime context.
    pub fn spawn_on<F, C>(runtime: &Handle, future: F, cleanup: C) -> Self
    where
        F: Future<Output = T> + Send + 'static,
        C: FnOnce(T) + Send + 'static,
    {
        let (sender, receiver) = oneshot::channel();
        let shared = Arc::new(TaskShared {
            id: SessionId::new(),
            state: Mutex::new(TaskState {
                sender: Some(sender),
                canceled: false,
                events: Arc::new(EventDispatcher::new()),
            }),
        });

        let inner = runtime.spawn(future);
        let watcher = Arc::clone(&shared);
        runtime.spawn(async move {
            let result = match inner.await {
                Ok(value) => Ok(value),
                Err(e) if e.is_panic() => Err(TaskError::from_panic(e.into_panic())),
                Err(_) => Err(TaskError::Aborted),
            };
            watcher.deliver(result, cleanup);
        });

        Self { shared, receiver }
    }
}

impl<T> CancelableTask<T> {
    pub fn with_events(self, events: EventDispatcher) -> Self {
        self.shared.state().events = Arc::new(events);
        self
    }

    pub fn id(&self) -> SessionId {
        self.shared.id
    }

    /// Abandon the task. Returns `false` if it already finished or was canceled.
    pub fn cancel(&self) -> bool {
        self.shared.cancel()
    }

    pub fn is_canceled(&self) -> bool {
        self.shared.state().canceled
    }

    /// A cloneable handle that can cancel the task while another party awaits
    /// [`join`](Self::join).
    pub fn canceler(&self) -> TaskCanceler<T> {
        TaskCanceler {
            shared: Arc::clone(&self.shared),
        }
    }

    /// Wait for the value, or for cancellation.
    pub async fn join(self) -> Result<T, TaskError> {
        // The sender only disappears unsent if the runtime dropped the watcher.
        self.receiver.await.unwrap_or(Err(TaskError::Aborted))
    }
}

impl<T> fmt::Debug for CancelableTask<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancelableTask")
            .field("id", &self.shared.id)
            .field("canceled", &self.is_canceled())
            .finish()
    }
}

/// Cancels a [`CancelableTask`] from elsewhere.
pub struct TaskCanceler<T> {
    shared: Arc<TaskShared<T>>,
}

impl<T> TaskCanceler<T> {
    pub fn cancel(&self) -> bool {
        self.shared.cancel()
    }
}

impl<T> Clone for TaskCanceler<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for TaskCanceler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskCanceler")
            .field("id", &self.shared.id)
            .finish()
    }
}
