//! Seed input for the scanner
//!
//! Seeds come from a text file with one URL per line. Session slots pull
//! them from a shared `SeedQueue` with a bounded wait per pull.

use crate::ScannerError;
use std::path::Path;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};

/// Reads seed URLs from a file
///
/// # Returns
///
/// * `Ok(Vec<String>)` - Seeds in file order
/// * `Err(ScannerError::SeedFile)` - The file could not be read
pub fn read_seeds(path: &Path) -> Result<Vec<String>, ScannerError> {
    let content = std::fs::read_to_string(path).map_err(|source| ScannerError::SeedFile {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(parse_seeds(&content))
}

/// Splits seed file content into URLs
///
/// Lines are trimmed; blank lines and lines starting with `#` are skipped.
pub fn parse_seeds(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

/// Shared source of seed URLs
#[derive(Debug)]
pub struct SeedQueue {
    receiver: Mutex<mpsc::UnboundedReceiver<String>>,
}

impl SeedQueue {
    /// Creates an open queue fed through the returned sender
    ///
    /// The queue is exhausted once the sender is dropped and every queued
    /// seed has been taken.
    pub fn channel() -> (mpsc::UnboundedSender<String>, Self) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (
            sender,
            Self {
                receiver: Mutex::new(receiver),
            },
        )
    }

    /// Creates a closed queue holding `seeds`
    pub fn from_seeds(seeds: Vec<String>) -> Self {
        let (sender, queue) = Self::channel();
        for seed in seeds {
            // The receiver is alive in `queue`, so sending cannot fail
            let _ = sender.send(seed);
        }
        queue
    }

    /// Takes the next seed
    ///
    /// Waits at most `wait` per attempt; an attempt that times out is
    /// logged and retried. Returns None once the queue is exhausted.
    pub async fn next_seed(&self, wait: Duration) -> Option<String> {
        let mut receiver = self.receiver.lock().await;
        loop {
            match tokio::time::timeout(wait, receiver.recv()).await {
                Ok(seed) => return seed,
                Err(_) => tracing::debug!("No seed available after {:?}, waiting again", wait),
            }
        }
    }
}
