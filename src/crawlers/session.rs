use crate::crawlers::crawler::Renderer;
use crate::error::{CrawlError, OutputError, RenderError};
use crate::filter::UrlFilter;
use crate::output::PageSink;
use crate::parsers;
use crate::results::{CrawlReport, ExtractedPage};
use futures::future::join_all;
use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{Mutex, Semaphore};
use url::Url;

/// Pages deeper than this never have their links followed
pub const MAX_DEPTH: usize = 1;

/// Lifecycle of one URL within a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    Visiting,
    Done,
}

/// Outcome of visiting one page
enum Visit {
    /// Already visiting or done when requested
    Skipped,
    /// Render failed, nothing persisted
    Failed,
    /// Rendered and extracted; carries the discovered links
    Processed(Vec<String>),
}

/// One crawl run: owns the visited set and drives render, extract and persist
///
/// Sub-crawls run concurrently on the caller's task and are joined before
/// [`CrawlSession::crawl`] returns. The visited check-and-mark happens under
/// a single lock, so each URL is rendered at most once per session.
pub struct CrawlSession<R: Renderer> {
    renderer: R,
    filter: UrlFilter,
    sink: Box<dyn PageSink>,
    render_timeout: Duration,
    render_permits: Semaphore,
    visited: Mutex<HashMap<String, PageState>>,
    report: Mutex<CrawlReport>,
}

impl<R: Renderer> CrawlSession<R> {
    pub fn new(
        renderer: R,
        filter: UrlFilter,
        sink: Box<dyn PageSink>,
        render_timeout: Duration,
        max_concurrency: usize,
    ) -> Self {
        Self {
            renderer,
            filter,
            sink,
            render_timeout,
            render_permits: Semaphore::new(max_concurrency.max(1)),
            visited: Mutex::new(HashMap::new()),
            report: Mutex::new(CrawlReport::default()),
        }
    }

    /// Crawls `root_url` and its direct in-scope links, then finishes the sink
    pub async fn crawl(self, root_url: &Url) -> Result<CrawlReport, CrawlError> {
        let root = self.filter.normalize_url(root_url);
        ::log::info!("Starting crawl at {}", root);

        self.visit(root.to_string(), 0).await;

        let finished = self.sink.finish();
        let mut report = self.report.into_inner();
        if let Some(path) = finished? {
            ::log::info!("Saved {}", path.display());
            report.saved.push(path);
        }

        Ok(report)
    }

    /// Visits one URL and, above [`MAX_DEPTH`], its links concurrently
    async fn visit(&self, url: String, depth: usize) {
        let links = match self.process(&url).await {
            Visit::Processed(links) => links,
            Visit::Skipped | Visit::Failed => return,
        };

        if depth >= MAX_DEPTH {
            ::log::debug!("Not following {} links from {} (depth {})", links.len(), url, depth);
            return;
        }

        for link in &links {
            ::log::info!("Discovered link: {}", link);
        }

        join_all(
            links
                .into_iter()
                .map(|link| Box::pin(self.visit(link, depth + 1))),
        )
        .await;
    }

    /// Marks the URL, then renders, extracts and persists it
    async fn process(&self, url: &str) -> Visit {
        if !self.mark_url_as_visited(url).await {
            return Visit::Skipped;
        }

        ::log::info!("Crawling: {}", url);
        let outcome = self.render_and_extract(url).await;
        self.mark_done(url).await;
        outcome
    }

    async fn render_and_extract(&self, url: &str) -> Visit {
        let rendered = {
            let _permit = match self.render_permits.acquire().await {
                Ok(permit) => permit,
                Err(e) => {
                    ::log::error!("Render permits closed while crawling {}: {}", url, e);
                    return self.record_failure(url).await;
                }
            };
            // The deadline holds even when a renderer ignores it
            match tokio::time::timeout(
                self.render_timeout,
                self.renderer.render(url, self.render_timeout),
            )
            .await
            {
                Ok(rendered) => rendered,
                Err(_) => Err(RenderError::Timeout(self.render_timeout)),
            }
        };

        let html = match rendered {
            Ok(html) => html,
            Err(e) => {
                ::log::error!("Failed to render {}: {}", url, e);
                return self.record_failure(url).await;
            }
        };

        let base = match Url::parse(url) {
            Ok(base) => base,
            Err(e) => {
                ::log::error!("Cannot use {} as a base URL: {}", url, e);
                return self.record_failure(url).await;
            }
        };

        let parsed = parsers::html::parse(&html, &base, &self.filter);
        let page = ExtractedPage::new(url.to_string(), parsed.title, parsed.content);
        let saved = self.persist(&page);

        let mut report = self.report.lock().await;
        report.processed.push(url.to_string());
        match saved {
            Ok(Some(path)) => report.saved.push(path),
            Ok(None) => {}
            Err(_) => report.unsaved.push(url.to_string()),
        }

        Visit::Processed(parsed.links)
    }

    fn persist(&self, page: &ExtractedPage) -> Result<Option<PathBuf>, OutputError> {
        match self.sink.save(page) {
            Ok(Some(path)) => {
                ::log::info!("Saved {}", path.display());
                Ok(Some(path))
            }
            Ok(None) => Ok(None),
            Err(e) => {
                ::log::error!("Failed to save {}: {}", page.url, e);
                Err(e)
            }
        }
    }

    async fn record_failure(&self, url: &str) -> Visit {
        self.report.lock().await.failed.push(url.to_string());
        Visit::Failed
    }

    /// Checks if a URL has been seen and marks it as visiting if not
    async fn mark_url_as_visited(&self, url: &str) -> bool {
        let mut seen = self.visited.lock().await;
        if seen.contains_key(url) {
            ::log::trace!("Skipping already visited: {}", url);
            return false;
        }
        seen.insert(url.to_string(), PageState::Visiting);
        true
    }

    async fn mark_done(&self, url: &str) {
        self.visited
            .lock()
            .await
            .insert(url.to_string(), PageState::Done);
    }
}
