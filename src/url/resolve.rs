use crate::{UrlError, UrlResult};
use url::Url;

/// Reduces a seed URL to its home page, `scheme://host[:port]`
///
/// Path, query and fragment are dropped and a default port is omitted.
/// Only http and https seeds are accepted.
///
/// # Examples
///
/// ```
/// use web_url_scanner::url::home_page;
///
/// assert_eq!(home_page("https://Example.com/docs/page?x=1").unwrap(), "https://example.com");
/// assert_eq!(home_page("http://localhost:8080/a").unwrap(), "http://localhost:8080");
/// ```
pub fn home_page(seed: &str) -> UrlResult<String> {
    let url = Url::parse(seed.trim()).map_err(|e| UrlError::Parse(format!("{}: {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(url.origin().ascii_serialization())
}

/// Resolves a raw href against `base` into an absolute URL
///
/// No canonicalization happens beyond what resolution itself does: a
/// fragment or a trailing slash still makes a distinct URL string.
/// Returns None when the href cannot be resolved.
pub fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    base.join(href.trim()).ok()
}
