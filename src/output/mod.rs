//! Output generation module
//!
//! This module provides the crawl report returned by the coordinator and its
//! terminal rendering.

mod stats;

pub use stats::{print_statistics, CrawlStats};

use std::path::PathBuf;
use url::Url;

/// Final result of a completed crawl
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Counters accumulated during the crawl
    pub stats: CrawlStats,

    /// Root directory the mirror was written into
    pub output_directory: PathBuf,

    /// Page budget the crawl ran with
    pub max_pages: u32,

    /// URLs taken for fetching, in the order they were taken
    pub visited: Vec<Url>,

    /// Discovered URLs never taken, in the order they would have been
    pub remaining: Vec<Url>,
}

impl CrawlReport {
    pub fn pages_saved(&self) -> u32 {
        self.stats.pages_saved
    }

    /// Returns true if the crawl saved its full page budget
    pub fn hit_budget(&self) -> bool {
        self.pages_saved() >= self.max_pages
    }
}

/// Prints a crawl report to stdout
pub fn print_report(report: &CrawlReport) {
    print_statistics(&report.stats);
    println!();
    println!("Mirror: {}", report.output_directory.display());
    println!("Visited URLs: {}", report.visited.len());
    if report.hit_budget() {
        println!("Stopped on page budget of {} pages", report.max_pages);
    }
    if !report.remaining.is_empty() {
        println!("{} discovered URLs left unvisited", report.remaining.len());
    }
}
