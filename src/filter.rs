use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

/// Static asset extensions and build-artifact directories that are never crawled
const STATIC_ASSET_PATTERNS: &[&str] = &[
    r"(?i)\.(png|jpe?g|gif|svg|webp|ico|bmp|css|js|mjs|map|woff2?|ttf|otf|eot)$",
    r"(^|/)_next/",
    r"(^|/)static/",
];

/// Prefixes of hrefs that do not navigate to another HTTP page
const NON_NAVIGATIONAL_PREFIXES: &[&str] = &["#", "javascript:", "mailto:", "tel:"];

/// Configuration for URL filtering in crawlers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UrlFilterConfig {
    /// Host every crawled URL must match exactly (if None, all hosts pass)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_host: Option<String>,

    /// Extra regex patterns for URLs to exclude, checked after the static asset list
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl UrlFilterConfig {
    /// Restrict crawling to the host of `base`
    pub fn for_base(base: &Url) -> Self {
        Self {
            required_host: base.host_str().map(|h| h.to_string()),
            exclude_patterns: Vec::new(),
        }
    }
}

/// URL filter that decides which hrefs are in scope for crawling
#[derive(Debug)]
pub struct UrlFilter {
    config: UrlFilterConfig,
    asset_regexes: Vec<Regex>,
    exclude_regexes: Vec<Regex>,
}

impl Default for UrlFilter {
    fn default() -> Self {
        Self::new(UrlFilterConfig::default()).expect("Default regex patterns should be valid")
    }
}

impl UrlFilter {
    /// Create a new URL filter from configuration
    pub fn new(config: UrlFilterConfig) -> Result<Self, regex::Error> {
        let asset_regexes = STATIC_ASSET_PATTERNS
            .iter()
            .map(|pattern| Regex::new(pattern))
            .collect::<Result<Vec<_>, _>>()?;

        let mut exclude_regexes = Vec::with_capacity(config.exclude_patterns.len());
        for pattern in &config.exclude_patterns {
            exclude_regexes.push(Regex::new(pattern)?);
        }

        Ok(Self {
            config,
            asset_regexes,
            exclude_regexes,
        })
    }

    /// Checks an href before resolution: empty, non-navigational and static asset hrefs are rejected
    pub fn should_follow_href(&self, href: &str) -> bool {
        let href = href.trim();
        if href.is_empty() {
            return false;
        }

        if self.is_non_navigational(href) {
            return false;
        }

        !self.is_static_asset(href)
    }

    /// Checks a resolved URL: host scope and user exclude patterns
    pub fn should_crawl(&self, url: &Url) -> bool {
        if !self.is_in_host_scope(url) {
            return false;
        }

        let url_str = url.as_str();
        !self.exclude_regexes.iter().any(|regex| regex.is_match(url_str))
    }

    /// `#`, `javascript:`, `mailto:` and `tel:` hrefs
    pub fn is_non_navigational(&self, href: &str) -> bool {
        let lowered = href.trim_start().to_ascii_lowercase();
        NON_NAVIGATIONAL_PREFIXES
            .iter()
            .any(|prefix| lowered.starts_with(prefix))
    }

    /// Asset check on the path part of an href, ignoring query and fragment
    pub fn is_static_asset(&self, href: &str) -> bool {
        let path = href.split(['?', '#']).next().unwrap_or_default();
        self.asset_regexes.iter().any(|regex| regex.is_match(path))
    }

    /// Check if a URL's host exactly matches the required host
    fn is_in_host_scope(&self, url: &Url) -> bool {
        match &self.config.required_host {
            Some(required) => url.host_str() == Some(required.as_str()),
            None => true,
        }
    }

    /// Create a normalized version of the URL (e.g., removing fragments)
    pub fn normalize_url(&self, url: &Url) -> Url {
        let mut normalized = url.clone();
        normalized.set_fragment(None);
        normalized
    }
}
