//! HTML link extraction
//!
//! Only anchor elements are considered. The href values are returned raw;
//! resolution and scope checks happen in the worker.

use scraper::{Html, Selector};

/// Extracts the raw href of every anchor in the document
///
/// # Extraction Rules
///
/// - Anchors without an `href` attribute are skipped
/// - Empty or whitespace-only hrefs are skipped
/// - Order is document order; duplicates are kept
/// - Malformed markup is parsed best-effort and never fails
///
/// # Example
///
/// ```
/// use web_url_scanner::crawler::extract_links;
///
/// let html = r#"<p><a href="/about">About</a><a name="top"></a><a href="/about">Again</a></p>"#;
/// assert_eq!(extract_links(html), vec!["/about", "/about"]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if !href.trim().is_empty() {
                    links.push(href.to_string());
                }
            }
        }
    }

    links
}
