//! Thread-safe progress counting.
//!
//! The upper bound is set once before processing; afterwards any worker
//! thread may increment. The caller observes progress through a
//! callback and never shares state with the workers.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::OnceLock;

/// Receives `(completed, total)` after every increment.
pub type ProgressCallback = Box<dyn Fn(u64, u64) + Send + Sync>;

/// Unit-increment progress counter with a fixed upper bound.
#[derive(Default)]
pub struct ProgressTracker {
    completed: AtomicU64,
    total: OnceLock<u64>,
    callback: Option<ProgressCallback>,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tracker that reports to `callback`.
    pub fn with_callback(callback: ProgressCallback) -> Self {
        Self {
            callback: Some(callback),
            ..Self::default()
        }
    }

    /// Set the upper bound. Only the first call has any effect.
    ///
    /// Returns whether this call set it.
    pub fn set_total(&self, total: u64) -> bool {
        self.total.set(total).is_ok()
    }

    /// Record one unit of work and notify the callback.
    ///
    /// Returns the new completed count.
    pub fn increment(&self) -> u64 {
        let completed = self.completed.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(ref callback) = self.callback {
            callback(completed, self.total());
        }
        completed
    }

    pub fn completed(&self) -> u64 {
        self.completed.load(Ordering::SeqCst)
    }

    /// Upper bound, 0 until set.
    pub fn total(&self) -> u64 {
        self.total.get().copied().unwrap_or(0)
    }
}

impl std::fmt::Debug for ProgressTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressTracker")
            .field("completed", &self.completed())
            .field("total", &self.total())
            .finish()
    }
}
