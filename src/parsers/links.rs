use crate::filter::UrlFilter;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

/// Extracts in-scope links from every `a[href]` in the document
///
/// Returns absolute URLs without fragments, deduplicated in first-seen order.
/// Hrefs that fail to resolve are logged and skipped.
pub fn extract_links(doc: &Html, base_url: &Url, filter: &UrlFilter) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    for href in doc.select(&ANCHOR).filter_map(|e| e.value().attr("href")) {
        let href = href.trim();
        if !filter.should_follow_href(href) {
            ::log::trace!("Skipping href: {:?}", href);
            continue;
        }

        let resolved = match resolve_href(href, base_url) {
            Ok(url) => url,
            Err(e) => {
                ::log::warn!("Could not resolve href {:?} against {}: {}", href, base_url, e);
                continue;
            }
        };

        if !filter.should_crawl(&resolved) {
            ::log::debug!("URL filter rejected: {}", resolved);
            continue;
        }

        let normalized = filter.normalize_url(&resolved).to_string();
        if seen.insert(normalized.clone()) {
            links.push(normalized);
        }
    }

    ::log::debug!("Found {} in-scope links on {}", links.len(), base_url);
    links
}

/// Resolves an href against the page it was found on
///
/// - `http…` is parsed as-is
/// - `//host/…` takes the base scheme
/// - `/path` takes the base origin
/// - anything else is a relative reference
pub fn resolve_href(href: &str, base_url: &Url) -> Result<Url, url::ParseError> {
    if href.starts_with("http") {
        Url::parse(href)
    } else if href.starts_with("//") {
        Url::parse(&format!("{}:{}", base_url.scheme(), href))
    } else if href.starts_with('/') {
        Url::parse(&format!("{}{}", base_url.origin().ascii_serialization(), href))
    } else {
        base_url.join(href)
    }
}
