//! Admission gate bounding concurrently running async work

use std::future::Future;
use std::sync::Arc;

use tokio::sync::Semaphore;

/// Default number of concurrently running work items
pub const DEFAULT_CONCURRENCY: usize = 10;

/// Bounds how many submitted futures run at once.
///
/// Work beyond the ceiling waits in arrival order; tokio's semaphore hands
/// permits to waiters strictly first-in first-out. A slot is released when
/// the work finishes, fails, or the caller drops the future. The limiter does
/// not know or care what the work does, and a failing item only affects its
/// own caller.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    capacity: usize,
}

impl RateLimiter {
    /// Create a limiter admitting at most `capacity` items at once.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero; such a limiter would never admit work.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "rate limiter capacity must be non-zero");
        Self {
            semaphore: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    /// Maximum number of concurrently running items
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of items currently holding a slot
    pub fn running(&self) -> usize {
        self.capacity - self.available()
    }

    /// Number of free slots
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }

    /// Wait for a free slot, then run `work` to completion and return its output.
    ///
    /// The closure is not invoked until a slot is held, so no work starts
    /// while the caller is queued.
    pub async fn run<F, Fut, T>(&self, work: F) -> T
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        // The semaphore is never closed, so acquire only fails on a bug
        let _permit = self.semaphore.acquire().await.ok();
        work().await
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_CONCURRENCY)
    }
}
