//! Outcome records published by crawl sessions

use chrono::{DateTime, Utc};
use std::fmt;

/// A page that was fetched successfully
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReachedRecord {
    /// Final URL after redirects
    pub url: String,

    /// Depth of the frontier entry that led to this page
    pub depth: u32,

    /// When the page was read
    pub timestamp: DateTime<Utc>,
}

impl ReachedRecord {
    pub fn new(url: impl Into<String>, depth: u32) -> Self {
        Self {
            url: url.into(),
            depth,
            timestamp: Utc::now(),
        }
    }

    /// Table row: `URL, Depth, Timestamp`
    pub fn to_row(&self) -> [String; 3] {
        [
            self.url.clone(),
            self.depth.to_string(),
            epoch_seconds(&self.timestamp),
        ]
    }
}

impl fmt::Display for ReachedRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "URL {} depth {} read timestamp {}",
            self.url,
            self.depth,
            epoch_seconds(&self.timestamp)
        )
    }
}

/// A page that could not be fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokenRecord {
    /// URL as it was requested, before any redirect
    pub url: String,

    /// When the fetch failed
    pub timestamp: DateTime<Utc>,
}

impl BrokenRecord {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            timestamp: Utc::now(),
        }
    }

    /// Table row: `URL, Timestamp`
    pub fn to_row(&self) -> [String; 2] {
        [self.url.clone(), epoch_seconds(&self.timestamp)]
    }
}

impl fmt::Display for BrokenRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "URL {} read timestamp {}",
            self.url,
            epoch_seconds(&self.timestamp)
        )
    }
}

/// Unix time in seconds with a microsecond fraction, e.g. `1700000000.250000`
fn epoch_seconds(timestamp: &DateTime<Utc>) -> String {
    format!(
        "{}.{:06}",
        timestamp.timestamp(),
        timestamp.timestamp_subsec_micros()
    )
}
