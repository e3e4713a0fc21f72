//! Web URL Scanner: a same-domain breadth-first link crawler
//!
//! This crate crawls a set of seed pages, follows links that stay on the
//! seed's site up to a bounded depth, and publishes one record per reached
//! page and one per broken page to two append-only outcome tables.

pub mod config;
pub mod crawler;
pub mod input;
pub mod output;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for scanner operations
#[derive(Debug, Error)]
pub enum ScannerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Invalid HTTP header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    #[error("Outcome sink closed: {channel} records can no longer be published")]
    SinkClosed { channel: &'static str },

    #[error("Failed to read seed file {}: {source}", path.display())]
    SeedFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Crawl worker failed: {0}")]
    Worker(#[from] tokio::task::JoinError),

    #[error("All crawl workers exited with {pending} entries outstanding")]
    WorkersExited { pending: usize },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for scanner operations
pub type Result<T> = std::result::Result<T, ScannerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{run_scan, scan, CrawlSession, ScanSummary, SessionSummary};
pub use output::{BrokenRecord, OutcomeSink, ReachedRecord};
pub use crate::url::{home_page, DomainScope};
