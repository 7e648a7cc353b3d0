use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Errors raised while turning a URL into rendered HTML
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to open WebDriver session at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    #[error("render timed out after {0:?}")]
    Timeout(Duration),

    #[error("render failed: {0}")]
    Other(String),
}

/// Errors raised while persisting extracted pages
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised while loading crawl configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid exclude pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors that abort a whole crawl
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("invalid start URL {url:?}: {reason}")]
    InvalidStartUrl { url: String, reason: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Output(#[from] OutputError),
}
