//! Work frontier of a crawl session with join/quiescence counting
//!
//! Every push increments the pending count before the entry becomes
//! visible to `pop`. Every popped entry must be finished with exactly one
//! `task_done` call, made after any entries its processing pushed. The
//! pending count therefore reaches zero only when no entry is queued and
//! no worker is still processing one.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

/// A URL awaiting processing, with its link distance from the home page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: u32,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

#[derive(Debug, Default)]
struct FrontierInner {
    queue: VecDeque<FrontierEntry>,
    pending: usize,
}

/// Multi-producer, multi-consumer FIFO with a pending-work counter
#[derive(Debug, Default)]
pub struct Frontier {
    inner: Mutex<FrontierInner>,
    available: Notify,
    drained: Notify,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding a single entry
    pub fn seeded(entry: FrontierEntry) -> Self {
        let frontier = Self::new();
        frontier.push(entry);
        frontier
    }

    /// Appends an entry and counts it as pending work
    pub fn push(&self, entry: FrontierEntry) {
        {
            let mut inner = self.lock();
            inner.pending += 1;
            inner.queue.push_back(entry);
        }
        self.available.notify_one();
    }

    /// Removes the oldest entry, waiting while the queue is empty
    pub async fn pop(&self) -> FrontierEntry {
        loop {
            let next = self.lock().queue.pop_front();
            if let Some(entry) = next {
                return entry;
            }
            self.available.notified().await;
        }
    }

    /// Marks one popped entry as fully processed
    pub fn task_done(&self) {
        let drained = {
            let mut inner = self.lock();
            debug_assert!(inner.pending > 0, "task_done called more times than push");
            inner.pending = inner.pending.saturating_sub(1);
            inner.pending == 0
        };
        if drained {
            self.drained.notify_waiters();
        }
    }

    /// Waits until every pushed entry has been marked done
    pub async fn join(&self) {
        loop {
            let notified = self.drained.notified();
            tokio::pin!(notified);
            // Register before checking so a wake-up between the check and
            // the await is not lost
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Entries pushed but not yet marked done
    pub fn pending(&self) -> usize {
        self.lock().pending
    }

    /// Entries waiting in the queue
    pub fn queued(&self) -> usize {
        self.lock().queue.len()
    }

    fn lock(&self) -> MutexGuard<'_, FrontierInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
