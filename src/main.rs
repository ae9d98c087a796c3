//! Site-Mirror main entry point
//!
//! This is the command-line interface for the Site-Mirror crawler.

use anyhow::Context;
use clap::Parser;
use site_mirror::config::{load_config_with_hash, Config, SeedConfig};
use site_mirror::crawler::crawl;
use site_mirror::output::print_report;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Site-Mirror: a polite single-domain site mirroring crawler
///
/// Site-Mirror walks one web domain from a seed URL, respects robots.txt,
/// waits before every request, and saves each page under a path derived
/// from its URL.
#[derive(Parser, Debug)]
#[command(name = "site-mirror")]
#[command(version)]
#[command(about = "A polite single-domain site mirroring crawler", long_about = None)]
struct Cli {
    /// Starting URL to crawl (e.g., https://example.com/)
    #[arg(value_name = "URL")]
    url: String,

    /// Output directory for mirrored pages
    #[arg(short, long, value_name = "DIR", default_value = "site_mirror")]
    output: PathBuf,

    /// Maximum number of pages to save [default: 100]
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Delay before every request, in seconds [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Ignore robots.txt (not recommended)
    #[arg(long)]
    no_robots: bool,

    /// Wait robots.txt's Crawl-delay instead of --delay when it is longer
    #[arg(long, conflicts_with = "no_robots")]
    honor_crawl_delay: bool,

    /// Request timeout, in seconds [default: 10]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Number of fetches allowed in flight at once [default: 1]
    #[arg(long, value_name = "N")]
    concurrency: Option<usize>,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Applies command-line overrides on top of the file configuration
    fn apply_overrides(&self, mut config: Config) -> Config {
        if let Some(max_pages) = self.max_pages {
            config.crawler.max_pages = max_pages;
        }
        if let Some(delay) = self.delay {
            config.crawler.delay_seconds = delay;
        }
        if self.no_robots {
            config.crawler.respect_robots = false;
        }
        if self.honor_crawl_delay {
            config.crawler.honor_crawl_delay = true;
        }
        if let Some(timeout) = self.timeout {
            config.crawler.request_timeout_seconds = timeout;
        }
        if let Some(concurrency) = self.concurrency {
            config.crawler.max_concurrent_fetches = concurrency;
        }
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    let seed = SeedConfig::new(&cli.url, cli.output.clone(), cli.apply_overrides(config))
        .context("Invalid crawl settings")?;

    if seed.max_concurrent_fetches() > 1 {
        tracing::warn!(
            "Running {} fetches concurrently; the default of 1 is the polite setting",
            seed.max_concurrent_fetches()
        );
    }

    let report = crawl(seed).await.context("Crawl aborted")?;

    if !cli.quiet {
        println!();
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_mirror=info,warn"),
            1 => EnvFilter::new("site_mirror=debug,info"),
            2 => EnvFilter::new("site_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}
