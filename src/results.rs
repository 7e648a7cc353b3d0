use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One processed page, ready to be persisted
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractedPage {
    /// URL of the page
    pub url: String,

    /// Title of the page (if available)
    pub title: Option<String>,

    /// Markdown rendering of the body
    pub markdown: String,
}

impl ExtractedPage {
    /// Create a new extracted page
    pub fn new(url: String, title: Option<String>, markdown: String) -> Self {
        Self {
            url,
            title,
            markdown,
        }
    }
}

/// What a finished crawl did
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CrawlReport {
    /// URLs rendered and extracted, in completion order
    pub processed: Vec<String>,

    /// URLs whose render failed
    pub failed: Vec<String>,

    /// Files written
    pub saved: Vec<PathBuf>,

    /// URLs whose output could not be written
    pub unsaved: Vec<String>,
}

impl CrawlReport {
    /// Every URL that reached the `done` state
    pub fn visited(&self) -> usize {
        self.processed.len() + self.failed.len()
    }
}
