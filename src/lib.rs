// Re-export modules
pub mod config;
pub mod crawlers;
pub mod error;
pub mod filter;
pub mod naming;
pub mod output;
pub mod parsers;
pub mod results;

// Re-export commonly used types for convenience
pub use config::{CrawlConfig, OutputMode};
pub use error::CrawlError;
pub use results::{CrawlReport, ExtractedPage};

use crawlers::{CrawlSession, Renderer, WebDriverRenderer};
use filter::{UrlFilter, UrlFilterConfig};
use std::path::PathBuf;
use url::Url;

/// Main builder for a crawl run
pub struct Harvest {
    config: CrawlConfig,
}

impl Harvest {
    /// Create a new Harvest builder for the given start URL
    pub fn new(start_url: &str) -> Self {
        Self {
            config: CrawlConfig::new(start_url),
        }
    }

    /// Start from a full configuration
    pub fn from_config(config: CrawlConfig) -> Self {
        Self { config }
    }

    pub fn with_output_mode(mut self, mode: OutputMode) -> Self {
        self.config.output_mode = mode;
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = dir.into();
        self
    }

    pub fn with_webdriver_url(mut self, url: &str) -> Self {
        self.config.webdriver_url = url.to_string();
        self
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Set the per-page render timeout
    pub fn with_render_timeout(mut self, timeout_seconds: u64) -> Self {
        self.config.render_timeout_secs = timeout_seconds;
        self
    }

    pub fn with_settle_delay(mut self, delay_ms: u64) -> Self {
        self.config.settle_delay_ms = delay_ms;
        self
    }

    /// Set the maximum number of pages rendered at once
    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.config.max_concurrency = max_concurrency;
        self
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawl through a WebDriver server
    pub async fn run(self) -> Result<CrawlReport, CrawlError> {
        let renderer = WebDriverRenderer::from_config(&self.config);
        ::log::info!("Rendering through WebDriver at {}", self.config.webdriver_url);
        self.run_with(renderer).await
    }

    /// Crawl with any renderer
    pub async fn run_with<R: Renderer>(self, renderer: R) -> Result<CrawlReport, CrawlError> {
        let root = parse_start_url(&self.config.start_url)?;

        let filter = UrlFilter::new(UrlFilterConfig {
            exclude_patterns: self.config.exclude_patterns.clone(),
            ..UrlFilterConfig::for_base(&root)
        })
        .map_err(error::ConfigError::from)?;

        let sink = output::sink_for(
            self.config.output_mode,
            &self.config.output_dir,
            &filter.normalize_url(&root),
        );

        let session = CrawlSession::new(
            renderer,
            filter,
            sink,
            self.config.render_timeout(),
            self.config.max_concurrency,
        );
        session.crawl(&root).await
    }
}

/// Parses the start URL, accepting only http(s) URLs with a host
pub fn parse_start_url(start_url: &str) -> Result<Url, CrawlError> {
    let invalid = |reason: String| CrawlError::InvalidStartUrl {
        url: start_url.to_string(),
        reason,
    };

    let url = Url::parse(start_url.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme {:?}", url.scheme())));
    }
    if url.host_str().is_none() {
        return Err(invalid("missing host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use async_trait::async_trait;
    use std::time::Duration;

    struct StaticRenderer;

    #[async_trait]
    impl Renderer for StaticRenderer {
        async fn render(&self, url: &str, _timeout: Duration) -> Result<String, RenderError> {
            match url {
                "https://example.com/" => Ok(
                    r#"<h1>Home</h1><a href="/one">1</a><a href="/two">2</a><a href="/two">2 again</a>"#
                        .to_string(),
                ),
                "https://example.com/one" => Ok("<p>First</p>".to_string()),
                "https://example.com/two" => Ok("<p>Second</p>".to_string()),
                _ => Err(RenderError::Other(format!("unexpected {url}"))),
            }
        }
    }

    #[test]
    fn test_parse_start_url() {
        assert!(parse_start_url("https://example.com").is_ok());
        assert!(parse_start_url("  http://example.com/a ").is_ok());

        for bad in ["", "example.com", "ftp://example.com/", "file:///tmp/x"] {
            assert!(
                matches!(parse_start_url(bad), Err(CrawlError::InvalidStartUrl { .. })),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_builder_overrides() {
        let harvest = Harvest::new("https://example.com")
            .with_output_mode(OutputMode::Aggregate)
            .with_output_dir("out")
            .with_webdriver_url("http://localhost:9515")
            .with_headless(false)
            .with_render_timeout(12)
            .with_settle_delay(0)
            .with_max_concurrency(3);

        let config = harvest.config();
        assert_eq!(config.output_mode, OutputMode::Aggregate);
        assert_eq!(config.output_dir, PathBuf::from("out"));
        assert_eq!(config.webdriver_url, "http://localhost:9515");
        assert!(!config.headless);
        assert_eq!(config.render_timeout_secs, 12);
        assert_eq!(config.settle_delay_ms, 0);
        assert_eq!(config.max_concurrency, 3);
    }

    #[tokio::test]
    async fn test_invalid_start_url_does_no_work() {
        let result = Harvest::new("not a url").run_with(StaticRenderer).await;
        assert!(matches!(result, Err(CrawlError::InvalidStartUrl { .. })));
    }

    #[tokio::test]
    async fn test_config_without_start_url_does_no_work() {
        let config = CrawlConfig::from_json(r#"{"output_mode": "aggregate"}"#).unwrap();
        let result = Harvest::from_config(config).run_with(StaticRenderer).await;
        assert!(matches!(result, Err(CrawlError::InvalidStartUrl { .. })));
    }

    #[tokio::test]
    async fn test_invalid_exclude_pattern() {
        let mut config = CrawlConfig::new("https://example.com");
        config.exclude_patterns = vec!["[".to_string()];

        let result = Harvest::from_config(config).run_with(StaticRenderer).await;
        assert!(matches!(result, Err(CrawlError::Config(_))));
    }

    #[tokio::test]
    async fn test_aggregate_run() {
        let dir = tempfile::tempdir().unwrap();

        let report = Harvest::new("https://example.com")
            .with_output_mode(OutputMode::Aggregate)
            .with_output_dir(dir.path())
            .run_with(StaticRenderer)
            .await
            .unwrap();

        assert_eq!(report.processed.len(), 3);
        assert_eq!(report.saved, vec![dir.path().join("example.md")]);

        let contents = std::fs::read_to_string(dir.path().join("example.md")).unwrap();
        assert!(contents.starts_with(
            "## Content from https://example.com/\n\n# Home\n\n122 again\n\n---\n\n"
        ));
        assert!(contents.contains("## Content from https://example.com/one\n\nFirst\n\n---\n\n"));
        assert!(contents.contains("## Content from https://example.com/two\n\nSecond\n\n---\n\n"));
        assert_eq!(contents.matches("## Content from").count(), 3);
    }

    #[tokio::test]
    async fn test_per_page_run() {
        let dir = tempfile::tempdir().unwrap();

        let report = Harvest::new("https://example.com")
            .with_output_dir(dir.path())
            .run_with(StaticRenderer)
            .await
            .unwrap();

        assert_eq!(report.saved.len(), 3);
        let folder = dir.path().join("example-com");
        assert!(folder.join("home.md").exists());
        assert!(folder.join("one.md").exists());
        assert!(folder.join("two.md").exists());
    }
}
