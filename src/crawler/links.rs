//! HTML link extraction
//!
//! This module parses fetched pages and returns the same-domain links to
//! follow. Every `<a href>` counts; `rel="nofollow"` and `download` links are
//! followed too.

use crate::url::Domain;
use crate::MirrorError;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Every resolvable http(s) anchor target, in document order, without duplicates
    pub links: Vec<Url>,
}

/// Parses HTML content and resolves every anchor against the page URL
///
/// Relative references (`..`, query-only, fragment-only) are resolved the way a
/// browser would. Fragments are kept, so `/a` and `/a#top` are distinct links.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The URL the page was requested as
///
/// # Returns
///
/// * `Ok(ParsedPage)` - Successfully parsed page
/// * `Err(MirrorError::HtmlParse)` - The document could not be queried
///
/// # Example
///
/// ```
/// use site_mirror::crawler::parse_html;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/page">Link</a> <a href="mailto:a@example.com">Mail</a></body></html>"#;
/// let page_url = Url::parse("https://example.com/").unwrap();
/// let parsed = parse_html(html, &page_url).unwrap();
/// assert_eq!(parsed.links.len(), 1);
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/page");
/// ```
pub fn parse_html(html: &str, page_url: &Url) -> Result<ParsedPage, MirrorError> {
    let document = Html::parse_document(html);
    let parse_error = |message: String| MirrorError::HtmlParse {
        url: page_url.to_string(),
        message,
    };

    let a_selector = Selector::parse("a[href]").map_err(|e| parse_error(format!("{:?}", e)))?;

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(absolute_url) = resolve_link(href, page_url) {
            if seen.insert(absolute_url.as_str().to_string()) {
                links.push(absolute_url);
            }
        }
    }

    Ok(ParsedPage { links })
}

/// Returns the same-domain links of a page
///
/// A link is kept if its resolved authority equals the crawl domain's.
/// Root-relative hrefs always resolve onto the page's own host, so they are
/// kept whenever the page itself is in scope.
pub fn extract_links(
    html: &str,
    page_url: &Url,
    domain: &Domain,
) -> Result<Vec<Url>, MirrorError> {
    let parsed = parse_html(html, page_url)?;
    Ok(parsed
        .links
        .into_iter()
        .filter(|link| domain.contains(link))
        .collect())
}

/// Resolves a link href to an absolute URL
///
/// Returns None for hrefs that do not resolve or resolve to a non-http(s)
/// scheme (`javascript:`, `mailto:`, `tel:`, `data:`).
fn resolve_link(href: &str, page_url: &Url) -> Option<Url> {
    let absolute_url = page_url.join(href.trim()).ok()?;
    match absolute_url.scheme() {
        "http" | "https" => Some(absolute_url),
        _ => None,
    }
}
