//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with the fixed header profile
//! - GET requests with automatic redirect following
//! - Classifying every failure as a single `FetchError`

use crate::config::HttpConfig;
use crate::ScannerError;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE};
use reqwest::{redirect::Policy, Client};
use thiserror::Error;
use url::Url;

/// A fetch that did not produce a usable page
///
/// Transport failures and non-success statuses are deliberately not told
/// apart; `reason` is only carried for logging.
#[derive(Debug, Error)]
#[error("failed to fetch {url}: {reason}")]
pub struct FetchError {
    pub url: String,
    pub reason: String,
}

impl FetchError {
    fn new(url: &str, reason: impl Into<String>) -> Self {
        Self {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL the content was served from, after all redirects
    pub final_url: String,

    /// HTTP status code of the final response
    pub status_code: u16,

    /// Decoded page body
    pub body: String,
}

/// Builds an HTTP client with the configured header profile
///
/// # Arguments
///
/// * `config` - User agent, accept headers, timeout and redirect limit
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(ScannerError)` - A header value was invalid or the client failed to build
///
/// # Example
///
/// ```no_run
/// use web_url_scanner::config::HttpConfig;
/// use web_url_scanner::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, ScannerError> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_str(&config.accept)?);
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)?,
    );

    let client = Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(config.timeout())
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()?;

    Ok(client)
}

/// Page fetcher owning one reusable HTTP client
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a fetcher with its own connection pool
    pub fn new(config: &HttpConfig) -> Result<Self, ScannerError> {
        Ok(Self::with_client(build_http_client(config)?))
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Fetches a URL with a single GET, following redirects
    ///
    /// # Outcome
    ///
    /// | Condition | Result |
    /// |-----------|--------|
    /// | Final status 2xx, body decoded | `Ok(FetchedPage)` |
    /// | Final status anything else | `Err(FetchError)` |
    /// | Timeout, connection refused, TLS error | `Err(FetchError)` |
    /// | Malformed URL, too many redirects | `Err(FetchError)` |
    /// | Body could not be read or decoded | `Err(FetchError)` |
    ///
    /// There are no retries; one attempt is authoritative.
    ///
    /// When no redirect happened the requested string is returned as the
    /// final URL unchanged, so `http://ex.com` is not reported as `http://ex.com/`.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::new(url, describe_error(&e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(url, format!("HTTP {}", status.as_u16())));
        }

        let final_url = final_url(url, response.url());

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::new(url, format!("failed to read body: {}", e)))?;

        Ok(FetchedPage {
            final_url,
            status_code: status.as_u16(),
            body,
        })
    }
}

/// Picks the string to report for the URL a response came from
fn final_url(requested: &str, response_url: &Url) -> String {
    match Url::parse(requested) {
        Ok(parsed) if &parsed == response_url => requested.to_string(),
        _ => response_url.to_string(),
    }
}

/// Short log description of a transport error
fn describe_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "request timeout".to_string()
    } else if error.is_connect() {
        format!("connection failed: {}", error)
    } else if error.is_redirect() {
        format!("redirect error: {}", error)
    } else if error.is_builder() {
        format!("invalid request: {}", error)
    } else {
        error.to_string()
    }
}
