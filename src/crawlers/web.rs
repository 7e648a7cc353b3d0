use crate::config::CrawlConfig;
use crate::crawlers::crawler::Renderer;
use crate::error::RenderError;
use async_trait::async_trait;
use fantoccini::{Client, ClientBuilder};
use serde_json::{Map, Value, json};
use std::time::{Duration, Instant};

/// How often readiness and network activity are polled
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Consecutive polls without new resource requests that count as network idle
const IDLE_POLLS: usize = 5;

/// Upper bound for closing a session, so a hung browser cannot block the crawl
const CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

/// Renders pages through a WebDriver server (e.g. ChromeDriver, geckodriver)
///
/// Every render opens a fresh browser session and closes it again, whether
/// the page loaded, failed or timed out.
#[derive(Debug, Clone)]
pub struct WebDriverRenderer {
    webdriver_url: String,
    headless: bool,
    settle_delay: Duration,
}

impl WebDriverRenderer {
    pub fn new(webdriver_url: &str) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            headless: true,
            settle_delay: Duration::from_millis(1000),
        }
    }

    pub fn from_config(config: &CrawlConfig) -> Self {
        Self::new(&config.webdriver_url)
            .with_headless(config.headless)
            .with_settle_delay(config.settle_delay())
    }

    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    fn capabilities(&self) -> Map<String, Value> {
        let mut caps = Map::new();
        caps.insert("pageLoadStrategy".to_string(), json!("normal"));
        if self.headless {
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": ["--headless=new", "--disable-gpu", "--no-sandbox"] }),
            );
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": ["-headless"] }),
            );
        }
        caps
    }

    /// Opens a new browser session
    async fn connect(&self) -> Result<BrowserSession, RenderError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(self.capabilities());

        match builder.connect(&self.webdriver_url).await {
            Ok(client) => {
                ::log::debug!("Connected to WebDriver at {}", self.webdriver_url);
                Ok(BrowserSession::new(client))
            }
            Err(source) => Err(RenderError::Connect {
                url: self.webdriver_url.clone(),
                source,
            }),
        }
    }

    /// Opens a session, giving up after `timeout`
    ///
    /// The handshake runs on its own task and is never cancelled midway. When
    /// the deadline passes first, a session that still arrives is closed.
    async fn connect_within(&self, timeout: Duration) -> Result<BrowserSession, RenderError> {
        let renderer = self.clone();
        let mut handshake = tokio::spawn(async move { renderer.connect().await });

        match tokio::time::timeout(timeout, &mut handshake).await {
            Ok(Ok(connected)) => connected,
            Ok(Err(e)) => Err(RenderError::Other(format!("WebDriver connect task failed: {e}"))),
            Err(_) => {
                ::log::warn!(
                    "Connecting to {} took longer than {:?}, closing any late session",
                    self.webdriver_url,
                    timeout
                );
                tokio::spawn(async move {
                    if let Ok(Ok(late)) = handshake.await {
                        late.release().await;
                    }
                });
                Err(RenderError::Timeout(timeout))
            }
        }
    }

    /// Navigates, waits for the page to settle and returns its source
    async fn load(&self, client: &Client, url: &str) -> Result<String, RenderError> {
        client.goto(url).await?;
        wait_for_ready_state(client).await?;
        wait_for_network_idle(client).await?;

        if !self.settle_delay.is_zero() {
            tokio::time::sleep(self.settle_delay).await;
        }

        Ok(client.source().await?)
    }
}

#[async_trait]
impl Renderer for WebDriverRenderer {
    async fn render(&self, url: &str, timeout: Duration) -> Result<String, RenderError> {
        let started = Instant::now();
        ::log::debug!("RENDER: {}", url);

        let session = self.connect_within(timeout).await?;

        let remaining = timeout.saturating_sub(started.elapsed());
        let result = tokio::time::timeout(remaining, self.load(session.client(), url)).await;
        session.release().await;

        match result {
            Ok(html) => {
                ::log::debug!(
                    "Rendered {} in {:.2} seconds",
                    url,
                    started.elapsed().as_secs_f64()
                );
                html
            }
            Err(_) => Err(RenderError::Timeout(timeout)),
        }
    }
}

/// Polls `document.readyState` until it reports `complete`
async fn wait_for_ready_state(client: &Client) -> Result<(), RenderError> {
    loop {
        let state = client.execute("return document.readyState", vec![]).await?;
        if state.as_str() == Some("complete") {
            return Ok(());
        }
        tokio::time::sleep(POLL_INTERVAL).await;
    }
}

/// Waits until the page stops issuing resource requests
///
/// WebDriver has no network-idle event, so this watches the count of
/// resource timing entries until it stays unchanged for [`IDLE_POLLS`] polls.
async fn wait_for_network_idle(client: &Client) -> Result<(), RenderError> {
    let mut last_count = None;
    let mut quiet_polls = 0;

    while quiet_polls < IDLE_POLLS {
        let count = client
            .execute(
                "return performance.getEntriesByType('resource').length",
                vec![],
            )
            .await?
            .as_u64();

        if count.is_some() && count == last_count {
            quiet_polls += 1;
        } else {
            quiet_polls = 0;
        }
        last_count = count;

        tokio::time::sleep(POLL_INTERVAL).await;
    }

    Ok(())
}

/// Owns one WebDriver session and makes sure it gets closed
///
/// Call [`BrowserSession::release`] on the normal path. If the guard is
/// dropped without it (e.g. the render future was cancelled), the close is
/// handed to the runtime instead.
struct BrowserSession {
    client: Client,
    released: bool,
}

impl BrowserSession {
    fn new(client: Client) -> Self {
        Self {
            client,
            released: false,
        }
    }

    fn client(&self) -> &Client {
        &self.client
    }

    async fn release(mut self) {
        self.released = true;
        let client = self.client.clone();
        match tokio::time::timeout(CLOSE_TIMEOUT, client.close()).await {
            Ok(Ok(())) => ::log::trace!("Closed WebDriver session"),
            Ok(Err(e)) => ::log::warn!("Failed to close WebDriver session: {}", e),
            Err(_) => ::log::warn!("Timed out closing WebDriver session"),
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        let client = self.client.clone();
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn(async move {
                    if let Err(e) = client.close().await {
                        ::log::warn!("Failed to close abandoned WebDriver session: {}", e);
                    }
                });
            }
            Err(_) => ::log::warn!("WebDriver session dropped outside a runtime, not closed"),
        }
    }
}
