use crate::{UrlError, UrlResult};
use std::fmt;
use url::Url;

/// Extracts the domain from a URL
///
/// This function retrieves the host portion of a URL and converts it to lowercase.
/// If the URL has no host (`mailto:`, `data:` and similar), it returns None.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_url_scanner::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("mailto:someone@example.com").unwrap();
/// assert_eq!(extract_domain(&url), None);
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Site identity of a crawl session: scheme, host and effective port
///
/// Derived once from the seed URL. A link belongs to the session only if
/// its own identity is equal to this one.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DomainScope {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl DomainScope {
    /// Builds the scope of an absolute http(s) URL
    pub fn from_url(url: &Url) -> UrlResult<Self> {
        match url.scheme() {
            "http" | "https" => {}
            other => return Err(UrlError::InvalidScheme(other.to_string())),
        }
        let host = extract_domain(url).ok_or(UrlError::MissingHost)?;

        Ok(Self {
            scheme: url.scheme().to_string(),
            host,
            port: url.port_or_known_default(),
        })
    }

    /// Returns true if `url` has the same scheme, host and port as this scope
    pub fn contains(&self, url: &Url) -> bool {
        url.scheme() == self.scheme
            && url.port_or_known_default() == self.port
            && url
                .host_str()
                .is_some_and(|host| host.eq_ignore_ascii_case(&self.host))
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }
}

impl fmt::Display for DomainScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}", self.scheme, self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}
