//! Request-scoped admission control.

use std::sync::Arc;

use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// A bounded concurrency budget shared by every field resolution of one
/// request.
///
/// Acquiring a permit suspends the caller once `capacity` method calls are
/// already in flight; the permit is dropped (returned) as soon as the
/// resolver method call itself finishes, before recursing into nested
/// selections, so the budget bounds concurrent *method calls*, not concurrent
/// subtrees.
#[derive(Clone)]
pub struct Limiter {
    semaphore: Arc<Semaphore>,
}

impl Limiter {
    /// Creates a limiter admitting up to `capacity` concurrent method calls.
    ///
    /// A `capacity` of `0` would deadlock every field resolution, so it is
    /// raised to `1`.
    pub fn new(capacity: usize) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(capacity.max(1))),
        }
    }

    /// Acquires one permit, suspending until the budget has room.
    pub async fn acquire(&self) -> OwnedSemaphorePermit {
        Arc::clone(&self.semaphore)
            .acquire_owned()
            .await
            .expect("limiter semaphore is never closed")
    }

    /// The total number of permits available under this limiter.
    pub fn capacity(&self) -> usize {
        self.semaphore.available_permits()
    }
}
