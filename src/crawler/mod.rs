//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Rate-limited HTTP fetching
//! - HTML parsing and same-domain link extraction
//! - The frontier and visited set
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod links;

pub use coordinator::Coordinator;
pub use fetcher::{build_http_client, fetch_url, FetchedPage, Fetcher};
pub use frontier::Frontier;
pub use links::{extract_links, parse_html, ParsedPage};

use crate::config::SeedConfig;
use crate::output::CrawlReport;
use crate::MirrorError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the output directory
/// 2. Load robots.txt (unless disabled)
/// 3. Fetch, save and extract links from pages until the frontier is empty
///    or the page budget is reached
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed, however many pages failed
/// * `Err(MirrorError)` - A page could not be written to disk
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::{Config, SeedConfig};
/// use site_mirror::crawler::crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let seed = SeedConfig::new("https://example.com/", "site_mirror", Config::default())?;
/// let report = crawl(seed).await?;
/// println!("{} pages saved", report.pages_saved());
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: SeedConfig) -> Result<CrawlReport, MirrorError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
