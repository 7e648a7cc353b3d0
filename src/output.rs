//! Persistence sinks for extracted pages.
//!
//! [`PerPageSink`] writes one file per page as pages arrive;
//! [`AggregateSink`] buffers every page and writes a single file when the
//! crawl finishes.

use crate::config::OutputMode;
use crate::error::OutputError;
use crate::naming::{self, OutputLocation};
use crate::results::ExtractedPage;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use url::Url;

/// Receives each processed page of a crawl
pub trait PageSink: Send + Sync {
    /// Persists one page, returning the file written (if any was written now)
    fn save(&self, page: &ExtractedPage) -> Result<Option<PathBuf>, OutputError>;

    /// Called once after every page has been saved
    fn finish(&self) -> Result<Option<PathBuf>, OutputError>;
}

/// Builds the sink for an output mode
pub fn sink_for(mode: OutputMode, output_dir: &Path, root_url: &Url) -> Box<dyn PageSink> {
    match mode {
        OutputMode::PerPage => Box::new(PerPageSink::new(output_dir)),
        OutputMode::Aggregate => Box::new(AggregateSink::new(output_dir, root_url)),
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), OutputError> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    fs::write(path, contents).map_err(io_err)
}

/// `<output_dir>/<host>/<title>.md`, one file per page
pub struct PerPageSink {
    output_dir: PathBuf,
    claimed: Mutex<HashSet<PathBuf>>,
}

impl PerPageSink {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            claimed: Mutex::new(HashSet::new()),
        }
    }

    /// Picks the first free path for `location` within this run
    fn claim(&self, location: &OutputLocation) -> PathBuf {
        let mut claimed = self
            .claimed
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut path = self.output_dir.join(location.relative_path());
        let mut n = 2;
        while claimed.contains(&path) {
            path = self.output_dir.join(location.with_suffix(n).relative_path());
            n += 1;
        }
        if n > 2 {
            ::log::warn!(
                "Output name {} already used in this run, writing {}",
                location.relative_path().display(),
                path.display()
            );
        }

        claimed.insert(path.clone());
        path
    }
}

/// File body for per-page output
pub fn format_page(page: &ExtractedPage, heading: &str) -> String {
    format!("# {}\n\nSource: {}\n\n{}\n", heading, page.url, page.markdown)
}

impl PageSink for PerPageSink {
    fn save(&self, page: &ExtractedPage) -> Result<Option<PathBuf>, OutputError> {
        let location = match Url::parse(&page.url) {
            Ok(url) => naming::title_location(&url, page.title.as_deref()),
            Err(_) => OutputLocation {
                folder: None,
                stem: naming::DEFAULT_PAGE_NAME.to_string(),
            },
        };
        let heading = page.title.as_deref().unwrap_or(&location.stem);
        let contents = format_page(page, heading);

        let path = self.claim(&location);
        write_file(&path, &contents)?;
        Ok(Some(path))
    }

    fn finish(&self) -> Result<Option<PathBuf>, OutputError> {
        Ok(None)
    }
}

/// `<output_dir>/<host-and-path>.md`, every page of the run in one file
pub struct AggregateSink {
    path: PathBuf,
    root_url: String,
    root_section: Mutex<Option<String>>,
    sections: Mutex<Vec<String>>,
}

impl AggregateSink {
    pub fn new(output_dir: impl Into<PathBuf>, root_url: &Url) -> Self {
        let location = naming::url_location(root_url);
        Self {
            path: output_dir.into().join(location.relative_path()),
            root_url: root_url.to_string(),
            root_section: Mutex::new(None),
            sections: Mutex::new(Vec::new()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// One aggregate section: heading, body, rule
pub fn format_section(page: &ExtractedPage) -> String {
    format!("## Content from {}\n\n{}\n\n---\n\n", page.url, page.markdown)
}

impl PageSink for AggregateSink {
    fn save(&self, page: &ExtractedPage) -> Result<Option<PathBuf>, OutputError> {
        let section = format_section(page);
        if page.url == self.root_url {
            *self
                .root_section
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(section);
        } else {
            self.sections
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .push(section);
        }
        Ok(None)
    }

    fn finish(&self) -> Result<Option<PathBuf>, OutputError> {
        let root = self
            .root_section
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        let sections = std::mem::take(
            &mut *self
                .sections
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner()),
        );

        if root.is_none() && sections.is_empty() {
            ::log::warn!("No pages extracted, not writing {}", self.path.display());
            return Ok(None);
        }

        let contents: String = root.into_iter().chain(sections).collect();
        write_file(&self.path, &contents)?;
        Ok(Some(self.path.clone()))
    }
}
