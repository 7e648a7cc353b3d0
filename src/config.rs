use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// How extracted pages are laid out on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputMode {
    /// One file per page under `<output_dir>/<host>/<title>.md`
    #[default]
    PerPage,
    /// One file per run holding every page as a section
    Aggregate,
}

/// Configuration for a single crawl run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlConfig {
    /// URL to start crawling from
    ///
    /// May be left out of a config file when the URL comes from the command
    /// line. An empty value is rejected when the crawl starts.
    #[serde(default)]
    pub start_url: String,

    /// Output layout
    #[serde(default)]
    pub output_mode: OutputMode,

    /// Directory the output is written under
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// URL for the WebDriver instance
    #[serde(default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Run the browser without a window
    #[serde(default = "default_headless")]
    pub headless: bool,

    /// Upper bound for rendering one page
    #[serde(default = "default_render_timeout_secs")]
    pub render_timeout_secs: u64,

    /// Extra wait after the document is ready, for client-rendered content
    #[serde(default = "default_settle_delay_ms")]
    pub settle_delay_ms: u64,

    /// Maximum number of pages rendered at once
    #[serde(default = "default_max_concurrency")]
    pub max_concurrency: usize,

    /// Regex patterns for URLs to exclude, on top of the static asset list
    #[serde(default)]
    pub exclude_patterns: Vec<String>,
}

impl CrawlConfig {
    /// Create a new configuration with default values
    pub fn new(start_url: &str) -> Self {
        Self {
            start_url: start_url.to_string(),
            output_mode: OutputMode::default(),
            output_dir: default_output_dir(),
            webdriver_url: default_webdriver_url(),
            headless: default_headless(),
            render_timeout_secs: default_render_timeout_secs(),
            settle_delay_ms: default_settle_delay_ms(),
            max_concurrency: default_max_concurrency(),
            exclude_patterns: Vec::new(),
        }
    }

    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let io_err = |source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents).map_err(io_err)?;

        Self::from_json(&contents)
    }

    /// Load configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Apply a non-empty `WEBDRIVER_URL` from the environment
    pub fn apply_env(&mut self) {
        if let Ok(webdriver_url) = std::env::var("WEBDRIVER_URL") {
            if !webdriver_url.is_empty() {
                self.webdriver_url = webdriver_url;
            }
        }
    }

    pub fn render_timeout(&self) -> Duration {
        Duration::from_secs(self.render_timeout_secs)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

/// Default value for webdriver_url
fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_headless() -> bool {
    true
}

fn default_render_timeout_secs() -> u64 {
    30
}

fn default_settle_delay_ms() -> u64 {
    1000
}

/// Default value for max_concurrency
fn default_max_concurrency() -> usize {
    5
}
