//! URL handling module for the scanner
//!
//! This module derives a seed's home page and site identity, resolves raw
//! hrefs to absolute URLs, and decides whether a URL is in a session's scope.

mod domain;
mod resolve;

pub use domain::{extract_domain, DomainScope};
pub use resolve::{home_page, resolve_link};
