use clap::{Parser, ValueEnum};
use page_harvest::{CrawlConfig, OutputMode};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "page-harvest")]
#[command(about = "Renders a site's start page and its same-domain links, saving each as Markdown")]
#[command(version)]
pub struct Args {
    /// URL to start crawling from
    pub url: String,

    /// Directory the Markdown files are written under
    pub output_dir: Option<PathBuf>,

    /// Output layout
    #[arg(short, long, value_enum)]
    pub mode: Option<OutputModeArg>,

    /// JSON configuration file; command-line values override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// WebDriver server URL (also read from WEBDRIVER_URL)
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Render timeout per page, in seconds
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Extra wait after the page is ready, in milliseconds
    #[arg(long)]
    pub settle_delay: Option<u64>,

    /// Number of pages rendered at once
    #[arg(long)]
    pub concurrency: Option<usize>,

    /// Show the browser window
    #[arg(long)]
    pub no_headless: bool,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputModeArg {
    /// One file per page under <output_dir>/<host>/
    PerPage,
    /// All pages in a single file
    Aggregate,
}

impl From<OutputModeArg> for OutputMode {
    fn from(arg: OutputModeArg) -> Self {
        match arg {
            OutputModeArg::PerPage => OutputMode::PerPage,
            OutputModeArg::Aggregate => OutputMode::Aggregate,
        }
    }
}

impl Args {
    /// Layers the command line over a base configuration
    pub fn apply_to(&self, mut config: CrawlConfig) -> CrawlConfig {
        config.start_url = self.url.clone();
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(mode) = self.mode {
            config.output_mode = mode.into();
        }
        if let Some(url) = &self.webdriver_url {
            config.webdriver_url = url.clone();
        }
        if let Some(timeout) = self.timeout {
            config.render_timeout_secs = timeout;
        }
        if let Some(delay) = self.settle_delay {
            config.settle_delay_ms = delay;
        }
        if let Some(concurrency) = self.concurrency {
            config.max_concurrency = concurrency;
        }
        if self.no_headless {
            config.headless = false;
        }
        config
    }
}
