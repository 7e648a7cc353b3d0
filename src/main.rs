use clap::Parser;
use page_harvest::{CrawlConfig, CrawlReport, Harvest};
use std::process::ExitCode;

mod args;
use args::Args;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging, defaulting to info-level progress lines
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Parse command-line arguments; a missing URL exits with clap's usage error
    let args = Args::parse();

    let base = match &args.config {
        Some(path) => match CrawlConfig::from_file(path) {
            Ok(config) => config,
            Err(e) => {
                ::log::error!("Failed to load config: {}", e);
                return ExitCode::FAILURE;
            }
        },
        None => CrawlConfig::new(&args.url),
    };
    let mut config = args.apply_to(base);
    config.apply_env();

    ::log::info!("Starting crawler for URL: {}", config.start_url);
    println!("Note: rendering requires a WebDriver server (e.g., ChromeDriver).");
    println!(
        "Set WEBDRIVER_URL or --webdriver-url if not using the default http://localhost:4444"
    );

    let start_time = std::time::Instant::now();
    let report = match Harvest::from_config(config).run().await {
        Ok(report) => report,
        Err(e) => {
            ::log::error!("Crawl failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log_summary(&report, start_time.elapsed().as_secs_f64());
    ExitCode::SUCCESS
}

fn log_summary(report: &CrawlReport, seconds: f64) {
    ::log::info!(
        "Crawling complete - processed {} pages in {:.2} seconds",
        report.processed.len(),
        seconds
    );
    if !report.failed.is_empty() {
        ::log::warn!("{} pages failed to render", report.failed.len());
    }
    if !report.unsaved.is_empty() {
        ::log::warn!("{} pages could not be saved", report.unsaved.len());
    }
    for path in &report.saved {
        ::log::debug!("Wrote {}", path.display());
    }
}
