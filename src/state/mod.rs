//! State module for tracking crawl session progress
//!
//! This module provides the state shared by the workers of one crawl session.
//!
//! # Components
//!
//! - `Frontier`: FIFO of `(url, depth)` entries with join/quiescence counting
//! - `VisitedSet`: claim-once set of URLs the session has fetched or will fetch

mod frontier;
mod visited;

// Re-export main types
pub use frontier::{Frontier, FrontierEntry};
pub use visited::VisitedSet;
