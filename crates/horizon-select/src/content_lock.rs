//! Deferral of content reloads while a selection gesture is in progress.
//!
//! Band and paint selection map pointer positions to item positions. If
//! the host reloads content mid-gesture those positions silently change
//! meaning, so the helpers hold the lock for the duration of a gesture and
//! the host routes reloads through [`ContentLock::run_when_unlocked`].
//!
//! ```
//! use horizon_select::ContentLock;
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicBool, Ordering};
//!
//! let lock = ContentLock::new();
//! let reloaded = Arc::new(AtomicBool::new(false));
//!
//! let guard = lock.acquire();
//! let flag = reloaded.clone();
//! assert!(!lock.run_when_unlocked(move || flag.store(true, Ordering::SeqCst)));
//! assert!(!reloaded.load(Ordering::SeqCst));
//!
//! drop(guard);
//! assert!(reloaded.load(Ordering::SeqCst));
//! ```

use std::sync::Arc;

use horizon_select_core::TaskQueue;
use parking_lot::Mutex;

#[derive(Debug, Default)]
struct LockState {
    holders: usize,
    pending: TaskQueue,
}

/// A counted lock over content reloads.
///
/// Cheap to clone; clones share state.
#[derive(Debug, Clone, Default)]
pub struct ContentLock {
    state: Arc<Mutex<LockState>>,
}

impl ContentLock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block reloads until the returned guard is dropped.
    ///
    /// Acquisitions nest; reloads run once every guard is gone.
    pub fn acquire(&self) -> ContentLockGuard {
        let mut state = self.state.lock();
        state.holders += 1;
        tracing::trace!(target: "horizon_select::content_lock", holders = state.holders, "acquired");
        ContentLockGuard { lock: self.clone() }
    }

    pub fn is_locked(&self) -> bool {
        self.state.lock().holders > 0
    }

    /// Number of reloads waiting for the lock to clear.
    pub fn pending_count(&self) -> usize {
        self.state.lock().pending.pending_count()
    }

    /// Run `task` now if unlocked, otherwise queue it.
    ///
    /// Queued tasks run in posting order when the last guard drops.
    /// Returns true if the task ran immediately.
    pub fn run_when_unlocked<F>(&self, task: F) -> bool
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.state.lock();
        if state.holders == 0 {
            drop(state);
            task();
            return true;
        }
        state.pending.post(task);
        tracing::debug!(
            target: "horizon_select::content_lock",
            pending = state.pending.pending_count(),
            "content reload deferred"
        );
        false
    }

    fn release(&self) {
        let tasks = {
            let mut state = self.state.lock();
            state.holders = state.holders.saturating_sub(1);
            tracing::trace!(target: "horizon_select::content_lock", holders = state.holders, "released");
            if state.holders > 0 {
                return;
            }
            state.pending.take_all()
        };

        if !tasks.is_empty() {
            tracing::debug!(
                target: "horizon_select::content_lock",
                count = tasks.len(),
                "running deferred content reloads"
            );
        }
        // Run outside the mutex: a task may post or acquire again.
        for task in tasks {
            task();
        }
    }
}

/// Holds a [`ContentLock`] until dropped.
#[derive(Debug)]
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct ContentLockGuard {
    lock: ContentLock,
}

impl Drop for ContentLockGuard {
    fn drop(&mut self) {
        self.lock.release();
    }
}

static_assertions::assert_impl_all!(ContentLock: Send, Sync);
static_assertions::assert_impl_all!(ContentLockGuard: Send);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlocked_runs_immediately() {
        let lock = ContentLock::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_clone = log.clone();
        assert!(lock.run_when_unlocked(move || log_clone.lock().push(1)));
        assert_eq!(*log.lock(), vec![1]);
    }

    #[test]
    fn test_nested_guards_defer_until_last_release() {
        let lock = ContentLock::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let outer = lock.acquire();
        let inner = lock.acquire();
        for i in 0..3 {
            let log = log.clone();
            lock.run_when_unlocked(move || log.lock().push(i));
        }
        assert_eq!(lock.pending_count(), 3);

        drop(inner);
        assert!(log.lock().is_empty());
        assert!(lock.is_locked());

        drop(outer);
        assert_eq!(*log.lock(), vec![0, 1, 2]);
        assert!(!lock.is_locked());
        assert_eq!(lock.pending_count(), 0);
    }

    #[test]
    fn test_deferred_task_may_reacquire() {
        let lock = ContentLock::new();
        let ran = Arc::new(Mutex::new(false));

        let guard = lock.acquire();
        let lock_clone = lock.clone();
        let ran_clone = ran.clone();
        lock.run_when_unlocked(move || {
            let _again = lock_clone.acquire();
            *ran_clone.lock() = true;
        });
        drop(guard);

        assert!(*ran.lock());
        assert!(!lock.is_locked());
    }
}
