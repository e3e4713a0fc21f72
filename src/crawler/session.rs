//! Crawl session: breadth-first crawl of one seed's site
//!
//! A session derives the home page and scope from its seed, seeds the
//! frontier with `(home page, 0)`, runs a fixed pool of workers over the
//! shared frontier, and waits for quiescence: the point where every queued
//! entry, including entries pushed while others were processed, has been
//! marked done. The workers are then aborted. Nothing from a session
//! survives it except the records it published.

use crate::config::{HttpConfig, ScannerConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::worker::Worker;
use crate::output::OutcomeSink;
use crate::state::{Frontier, FrontierEntry, VisitedSet};
use crate::url::{home_page, DomainScope};
use crate::{ScannerError, UrlError};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Counters updated by workers
#[derive(Debug, Default)]
pub(crate) struct SessionStats {
    pub fetched: AtomicUsize,
    pub reached: AtomicUsize,
    pub broken: AtomicUsize,
}

/// State shared by every worker of one session
pub(crate) struct SessionShared {
    pub home_page: String,
    /// Home page parsed; raw links are resolved against it
    pub base: Url,
    pub scope: DomainScope,
    pub max_depth: u32,
    pub frontier: Frontier,
    pub visited: VisitedSet,
    pub stats: SessionStats,
}

/// Outcome counts of a finished session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary {
    pub home_page: String,
    /// Fetch attempts, one per claimed URL
    pub fetched: usize,
    pub reached: usize,
    pub broken: usize,
    /// Distinct URLs in the visited set, redirect targets included
    pub visited: usize,
}

/// A crawl of one seed URL
pub struct CrawlSession {
    shared: Arc<SessionShared>,
    workers: usize,
    http: HttpConfig,
    sink: OutcomeSink,
}

impl CrawlSession {
    /// Prepares a session for `seed`
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Ready to run
    /// * `Err(ScannerError::Url)` - The seed is not an absolute http(s) URL
    pub fn new(
        seed: &str,
        scanner: &ScannerConfig,
        http: &HttpConfig,
        sink: OutcomeSink,
    ) -> Result<Self, ScannerError> {
        let home_page = home_page(seed)?;
        let base = Url::parse(&home_page).map_err(|e| UrlError::Parse(e.to_string()))?;
        let scope = DomainScope::from_url(&base)?;

        let frontier = Frontier::seeded(FrontierEntry::new(home_page.clone(), 0));

        Ok(Self {
            shared: Arc::new(SessionShared {
                home_page,
                base,
                scope,
                max_depth: scanner.max_depth,
                frontier,
                visited: VisitedSet::new(),
                stats: SessionStats::default(),
            }),
            workers: scanner.workers_per_session,
            http: http.clone(),
            sink,
        })
    }

    pub fn home_page(&self) -> &str {
        &self.shared.home_page
    }

    pub fn scope(&self) -> &DomainScope {
        &self.shared.scope
    }

    /// Crawls until quiescence, then cancels the workers
    ///
    /// A worker that cannot publish to a sink makes the whole session fail;
    /// the remaining workers are aborted and the error is returned.
    pub async fn run(self) -> Result<SessionSummary, ScannerError> {
        let Self {
            shared,
            workers: worker_count,
            http,
            sink,
        } = self;

        tracing::info!(
            "Scanning {} with {} workers (max depth {})",
            shared.home_page,
            worker_count,
            shared.max_depth
        );

        let mut workers = JoinSet::new();
        for id in 0..worker_count {
            let fetcher = Fetcher::new(&http)?;
            let worker = Worker::new(id, Arc::clone(&shared), fetcher, sink.clone());
            workers.spawn(worker.run());
        }
        drop(sink);

        let result = loop {
            tokio::select! {
                _ = shared.frontier.join() => break Ok(()),
                joined = workers.join_next() => match joined {
                    Some(Ok(Ok(()))) => continue,
                    Some(Ok(Err(e))) => break Err(e),
                    Some(Err(e)) => break Err(ScannerError::Worker(e)),
                    None => break Err(ScannerError::WorkersExited {
                        pending: shared.frontier.pending(),
                    }),
                },
            }
        };

        // In-flight fetches are dropped here without emitting records
        workers.shutdown().await;

        if let Err(e) = result {
            tracing::error!("Session for {} failed: {}", shared.home_page, e);
            return Err(e);
        }

        let summary = SessionSummary {
            home_page: shared.home_page.clone(),
            fetched: shared.stats.fetched.load(Ordering::Relaxed),
            reached: shared.stats.reached.load(Ordering::Relaxed),
            broken: shared.stats.broken.load(Ordering::Relaxed),
            visited: shared.visited.len(),
        };

        tracing::info!(
            "Finished {}: {} reached, {} broken, {} URLs visited",
            summary.home_page,
            summary.reached,
            summary.broken,
            summary.visited
        );

        Ok(summary)
    }
}

/// Crawls `seed` to completion
///
/// # Example
///
/// ```no_run
/// use web_url_scanner::config::Config;
/// use web_url_scanner::crawler::scan;
/// use web_url_scanner::output::OutcomeSink;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config::default();
/// let (sink, mut receivers) = OutcomeSink::channel(1024);
/// let writer = tokio::spawn(async move {
///     while let Some(record) = receivers.reached.recv().await {
///         println!("{}", record);
///     }
/// });
///
/// let summary = scan("https://example.com/docs", &config.scanner, &config.http, sink).await?;
/// println!("{} pages reached", summary.reached);
/// writer.await?;
/// # Ok(())
/// # }
/// ```
pub async fn scan(
    seed: &str,
    scanner: &ScannerConfig,
    http: &HttpConfig,
    sink: OutcomeSink,
) -> Result<SessionSummary, ScannerError> {
    CrawlSession::new(seed, scanner, http, sink)?.run().await
}
