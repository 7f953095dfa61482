//! Fixed-size worker pool over a bounded work queue.
//!
//! Items are queued in input order and pulled by whichever worker is
//! free, so they may finish in any order. Results are handed back in
//! input order. A panicking job is contained to its own item; the pool
//! always drains every queued item before `run` returns.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use crossbeam_channel::{bounded, unbounded};

/// Bounded pool of scoped worker threads.
#[derive(Debug, Clone, Copy)]
pub struct WorkerPool {
    workers: usize,
}

impl WorkerPool {
    /// Pool with `workers` threads (at least one).
    pub fn new(workers: usize) -> Self {
        Self {
            workers: workers.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Run `job(index, item)` for every item.
    ///
    /// Returns one slot per input item, in input order; `None` marks an
    /// item whose job panicked.
    pub fn run<T, R, F>(&self, items: Vec<T>, job: F) -> Vec<Option<R>>
    where
        T: Send,
        R: Send,
        F: Fn(usize, T) -> R + Sync,
    {
        let count = items.len();
        if count == 0 {
            return Vec::new();
        }
        let workers = self.workers.min(count);

        // Capacity equal to the worker count keeps dispatch in step with
        // the workers instead of queueing the whole batch up front
        let (task_tx, task_rx) = bounded::<(usize, T)>(workers);
        let (result_tx, result_rx) = unbounded::<(usize, Option<R>)>();

        thread::scope(|s| {
            for worker in 0..workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                let job = &job;
                s.spawn(move || {
                    for (index, item) in task_rx.iter() {
                        let outcome = panic::catch_unwind(AssertUnwindSafe(move || job(index, item)));
                        if outcome.is_err() {
                            tracing::error!("Worker {} panicked on item {}", worker, index);
                        }
                        if result_tx.send((index, outcome.ok())).is_err() {
                            break;
                        }
                    }
                    tracing::trace!("Worker {} finished", worker);
                });
            }
            drop(task_rx);
            drop(result_tx);

            for task in items.into_iter().enumerate() {
                if task_tx.send(task).is_err() {
                    break;
                }
            }
            drop(task_tx);
        });

        let mut slots: Vec<Option<R>> = (0..count).map(|_| None).collect();
        for (index, result) in result_rx.try_iter() {
            slots[index] = result;
        }
        slots
    }
}
