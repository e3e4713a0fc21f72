//! Top-level scan: fans seeds out over a bounded pool of crawl sessions
//!
//! Each of the `concurrent-sessions` slots pulls seeds from a shared queue
//! and runs one session at a time. All sessions publish to the same pair of
//! outcome channels, drained by the CSV writer tasks. When every slot has
//! finished, the last sink clones are dropped, the channels close, and the
//! writers flush out.

use crate::config::{Config, HttpConfig, ScannerConfig};
use crate::crawler::session::CrawlSession;
use crate::input::{read_seeds, SeedQueue};
use crate::output::{CsvOutcomeWriter, OutcomeSink};
use crate::ScannerError;
use std::ops::AddAssign;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Totals of a finished scan
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Sessions that ran to quiescence
    pub sessions: usize,
    /// Seeds that could not start a session
    pub skipped_seeds: usize,
    /// Fetch attempts across all sessions
    pub pages_fetched: usize,
    /// Rows appended to the reached table
    pub reached_rows: usize,
    /// Rows appended to the broken table
    pub broken_rows: usize,
}

impl AddAssign for ScanSummary {
    fn add_assign(&mut self, other: Self) {
        self.sessions += other.sessions;
        self.skipped_seeds += other.skipped_seeds;
        self.pages_fetched += other.pages_fetched;
        self.reached_rows += other.reached_rows;
        self.broken_rows += other.broken_rows;
    }
}

/// Runs a complete scan
///
/// This is the main entry point. It will:
/// 1. Read the seed file
/// 2. Open the outcome tables
/// 3. Run one crawl session per seed, `concurrent-sessions` at a time
/// 4. Wait for the writers to persist every record
///
/// # Arguments
///
/// * `config` - The scanner configuration
///
/// # Returns
///
/// * `Ok(ScanSummary)` - Every session ran to completion
/// * `Err(ScannerError)` - The seed file, an outcome table, or a sink failed
///
/// # Example
///
/// ```no_run
/// use web_url_scanner::config::Config;
/// use web_url_scanner::crawler::run_scan;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let summary = run_scan(Config::default()).await?;
/// println!("{} reached, {} broken", summary.reached_rows, summary.broken_rows);
/// # Ok(())
/// # }
/// ```
pub async fn run_scan(config: Config) -> Result<ScanSummary, ScannerError> {
    let seeds = read_seeds(&config.input.seeds_file)?;
    tracing::info!(
        "Loaded {} seed URLs from {}",
        seeds.len(),
        config.input.seeds_file.display()
    );
    run_seeds(&config, SeedQueue::from_seeds(seeds)).await
}

/// Runs crawl sessions for every seed `seeds` yields
pub async fn run_seeds(config: &Config, seeds: SeedQueue) -> Result<ScanSummary, ScannerError> {
    let writer = CsvOutcomeWriter::open(&config.output)?;
    let (sink, receivers) = OutcomeSink::channel(config.output.channel_capacity);
    let writers = writer.spawn(receivers);

    let seeds = Arc::new(seeds);
    let mut slots = JoinSet::new();
    for slot in 0..config.scanner.concurrent_sessions {
        slots.spawn(session_slot(
            slot,
            Arc::clone(&seeds),
            config.scanner.clone(),
            config.http.clone(),
            sink.clone(),
        ));
    }
    drop(sink);

    let mut summary = ScanSummary::default();
    let mut failure = None;
    while let Some(joined) = slots.join_next().await {
        match joined {
            Ok(Ok(totals)) => summary += totals,
            Ok(Err(e)) => {
                failure.get_or_insert(e);
            }
            Err(e) => {
                tracing::error!("Session slot panicked: {}", e);
                failure.get_or_insert(ScannerError::Worker(e));
            }
        }
    }

    // A writer error is the cause of any sink failure, so report it first
    let rows = writers.finish().await?;
    if let Some(e) = failure {
        return Err(e);
    }

    summary.reached_rows = rows.reached;
    summary.broken_rows = rows.broken;

    tracing::info!(
        "Scan finished: {} sessions, {} seeds skipped, {} reached, {} broken",
        summary.sessions,
        summary.skipped_seeds,
        summary.reached_rows,
        summary.broken_rows
    );

    Ok(summary)
}

/// One slot of the session pool: runs sessions until the seeds run out
async fn session_slot(
    slot: usize,
    seeds: Arc<SeedQueue>,
    scanner: ScannerConfig,
    http: HttpConfig,
    sink: OutcomeSink,
) -> Result<ScanSummary, ScannerError> {
    let mut totals = ScanSummary::default();

    while let Some(seed) = seeds.next_seed(scanner.seed_wait()).await {
        let session = match CrawlSession::new(&seed, &scanner, &http, sink.clone()) {
            Ok(session) => session,
            Err(e) => {
                tracing::warn!("Skipping seed {:?}: {}", seed, e);
                totals.skipped_seeds += 1;
                continue;
            }
        };

        tracing::debug!("Slot {} picked up {}", slot, seed);
        let summary = session.run().await?;
        totals.sessions += 1;
        totals.pages_fetched += summary.fetched;
    }

    Ok(totals)
}
