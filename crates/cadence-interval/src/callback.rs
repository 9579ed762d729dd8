//! Callback types accepted by the scheduler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future returned by one invocation.
pub type IntervalFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// Shared, zero-argument async callback.
///
/// Identity matters: [`IntervalBinding`](crate::IntervalBinding) treats two
/// callbacks as the same only when they are the same `Arc`.
pub type IntervalCallback<T> = Arc<dyn Fn() -> IntervalFuture<T> + Send + Sync + 'static>;

/// Wrap an async closure as an [`IntervalCallback`].
pub fn interval_callback<T, F, Fut>(f: F) -> IntervalCallback<T>
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = T> + Send + 'static,
{
    Arc::new(move || -> IntervalFuture<T> { Box::pin(f()) })
}
