//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a fixed header profile
//! - HTML link extraction
//! - The per-seed crawl session and its worker pool
//! - The top-level scan that runs sessions for every seed

mod fetcher;
mod parser;
mod runner;
mod session;
mod worker;

pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use parser::extract_links;
pub use runner::{run_scan, run_seeds, ScanSummary};
pub use session::{scan, CrawlSession, SessionSummary};
