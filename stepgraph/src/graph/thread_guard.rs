//! Per-thread execution guard.
//!
//! At most one invoke / resume / cancel / purge runs per `thread_id`. A second call while one
//! is executing fails fast with `RunError::Busy` instead of queueing. A thread's entry lives
//! only while someone holds or is acquiring its lock.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::error::RunError;

type LockMap = DashMap<String, Arc<Mutex<()>>>;

#[derive(Clone, Default)]
pub(crate) struct ThreadLocks {
    inner: Arc<LockMap>,
}

/// Held for the duration of one call. Dropping it releases the lock and removes the map
/// entry unless another caller still references it.
pub(crate) struct ThreadGuard {
    guard: Option<OwnedMutexGuard<()>>,
    thread_id: String,
    locks: Arc<LockMap>,
}

impl Drop for ThreadGuard {
    fn drop(&mut self) {
        drop(self.guard.take());
        // Only the map's own Arc is left once nobody holds or is acquiring the lock.
        self.locks
            .remove_if(&self.thread_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl ThreadLocks {
    /// Takes the thread's lock without waiting. The guard releases it on drop.
    pub(crate) fn try_acquire(&self, thread_id: &str) -> Result<ThreadGuard, RunError> {
        let lock = self
            .inner
            .entry(thread_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        let guard = lock
            .try_lock_owned()
            .map_err(|_| RunError::Busy(thread_id.to_string()))?;
        Ok(ThreadGuard {
            guard: Some(guard),
            thread_id: thread_id.to_string(),
            locks: self.inner.clone(),
        })
    }

    /// Number of threads with a live entry.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.inner.len()
    }
}
