//! Claim-once set of URLs seen by a crawl session

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Set of URL strings a session has claimed for fetching
///
/// Shared by every worker of one session. Membership only grows.
#[derive(Debug, Default)]
pub struct VisitedSet {
    urls: Mutex<HashSet<String>>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claims `url` for fetching
    ///
    /// Check and insert happen under one lock, so among concurrent callers
    /// with the same URL exactly one gets `true`.
    pub fn try_claim(&self, url: &str) -> bool {
        let mut urls = self.lock();
        if urls.contains(url) {
            return false;
        }
        urls.insert(url.to_string())
    }

    /// Marks `url` as visited whether or not it was already present
    pub fn mark(&self, url: &str) {
        self.lock().insert(url.to_string());
    }

    pub fn contains(&self, url: &str) -> bool {
        self.lock().contains(url)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, HashSet<String>> {
        // The set stays consistent even if a holder panicked mid-insert
        self.urls.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
