//! Crawl worker: one slot of a session's pool
//!
//! All workers of a session share its frontier, visited set and scope, and
//! each owns its own HTTP client.

use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::extract_links;
use crate::crawler::session::SessionShared;
use crate::output::{BrokenRecord, OutcomeSink, ReachedRecord};
use crate::state::FrontierEntry;
use crate::url::resolve_link;
use crate::ScannerError;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use url::Url;

pub(crate) struct Worker {
    id: usize,
    shared: Arc<SessionShared>,
    fetcher: Fetcher,
    sink: OutcomeSink,
}

impl Worker {
    pub(crate) fn new(
        id: usize,
        shared: Arc<SessionShared>,
        fetcher: Fetcher,
        sink: OutcomeSink,
    ) -> Self {
        Self {
            id,
            shared,
            fetcher,
            sink,
        }
    }

    /// Processes frontier entries until the task is aborted
    ///
    /// Returns only on a sink failure. The failing entry is left unfinished
    /// so the session cannot reach quiescence and must observe the error.
    pub(crate) async fn run(self) -> Result<(), ScannerError> {
        loop {
            let entry = self.shared.frontier.pop().await;
            self.process(entry).await?;
            self.shared.frontier.task_done();
        }
    }

    /// Handles one frontier entry
    ///
    /// 1. Drop entries beyond max depth or already claimed
    /// 2. Fetch; publish a broken record on failure
    /// 3. Mark the final URL visited and publish a reached record
    /// 4. If the final URL is still in scope, enqueue in-scope links at depth + 1
    async fn process(&self, entry: FrontierEntry) -> Result<(), ScannerError> {
        let shared = &self.shared;
        let FrontierEntry { url, depth } = entry;

        if depth > shared.max_depth {
            tracing::trace!("Worker {}: {} is beyond max depth ({})", self.id, url, depth);
            return Ok(());
        }

        if !shared.visited.try_claim(&url) {
            tracing::trace!("Worker {}: {} already visited", self.id, url);
            return Ok(());
        }

        shared.stats.fetched.fetch_add(1, Ordering::Relaxed);
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(e) => {
                let record = BrokenRecord::new(url);
                tracing::warn!("Received broken {} ({})", record, e.reason);
                self.sink.publish_broken(record).await?;
                shared.stats.broken.fetch_add(1, Ordering::Relaxed);
                return Ok(());
            }
        };

        // A redirect target must not be fetched again on its own
        shared.visited.mark(&page.final_url);

        let record = ReachedRecord::new(page.final_url.clone(), depth);
        tracing::info!("Received {}", record);
        self.sink.publish_reached(record).await?;
        shared.stats.reached.fetch_add(1, Ordering::Relaxed);

        let in_scope = Url::parse(&page.final_url)
            .map(|final_url| shared.scope.contains(&final_url))
            .unwrap_or(false);
        if !in_scope {
            tracing::debug!(
                "Worker {}: {} left {}, links not followed",
                self.id,
                page.final_url,
                shared.scope
            );
            return Ok(());
        }

        let mut enqueued = 0;
        for href in extract_links(&page.body) {
            let Some(link) = resolve_link(&shared.base, &href) else {
                continue;
            };
            if shared.scope.contains(&link) {
                shared
                    .frontier
                    .push(FrontierEntry::new(String::from(link), depth + 1));
                enqueued += 1;
            }
        }
        tracing::debug!(
            "Worker {}: {} queued {} links at depth {}",
            self.id,
            page.final_url,
            enqueued,
            depth + 1
        );

        Ok(())
    }
}
