//! Running crawl statistics
//!
//! This module provides the counters the coordinator updates as it folds each
//! page outcome into the crawl, and their formatted display.

use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStats {
    /// Pages fetched and written to disk
    pub pages_saved: u32,

    /// Count of every non-saved outcome
    pub outcomes: HashMap<PageOutcome, u32>,

    /// Pages whose links could not be extracted
    pub parse_failures: u32,

    /// Links that entered the frontier
    pub links_queued: u64,

    /// When the crawl started running
    pub started_at: DateTime<Utc>,

    /// When the crawl completed
    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            pages_saved: 0,
            outcomes: HashMap::new(),
            parse_failures: 0,
            links_queued: 0,
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Folds one page outcome into the counters
    pub fn record(&mut self, outcome: PageOutcome) {
        if outcome.counts_toward_budget() {
            self.pages_saved += 1;
        } else {
            *self.outcomes.entry(outcome).or_insert(0) += 1;
        }
    }

    /// Number of URLs that ended with `outcome`
    pub fn count(&self, outcome: PageOutcome) -> u32 {
        if outcome.counts_toward_budget() {
            self.pages_saved
        } else {
            self.outcomes.get(&outcome).copied().unwrap_or(0)
        }
    }

    /// Number of URLs a fetch was attempted for
    pub fn fetch_attempts(&self) -> u32 {
        self.pages_saved + self.count(PageOutcome::FetchFailed)
    }

    pub fn mark_finished(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall time from start to finish (or to now, while running)
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at.unwrap_or_else(Utc::now) - self.started_at
    }

    pub fn pages_per_second(&self) -> f64 {
        let secs = self.elapsed().num_milliseconds() as f64 / 1000.0;
        if secs > 0.0 {
            self.pages_saved as f64 / secs
        } else {
            0.0
        }
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStats) {
    println!("=== Crawl Statistics ===\n");

    println!("Overview:");
    println!("  Pages saved: {}", stats.pages_saved);
    println!("  Fetch attempts: {}", stats.fetch_attempts());
    println!("  Links queued: {}", stats.links_queued);
    println!(
        "  Elapsed: {:.1}s ({:.2} pages/sec)",
        stats.elapsed().num_milliseconds() as f64 / 1000.0,
        stats.pages_per_second()
    );
    println!();

    if !stats.outcomes.is_empty() || stats.parse_failures > 0 {
        println!("Skipped URLs:");
        let mut outcome_counts: Vec<_> = stats.outcomes.iter().collect();
        outcome_counts.sort_by(|a, b| b.1.cmp(a.1));

        for (outcome, count) in outcome_counts {
            println!("  {}: {}", outcome, count);
        }
        if stats.parse_failures > 0 {
            println!("  link extraction failed: {}", stats.parse_failures);
        }
        println!();
    }

    let attempts = stats.fetch_attempts();
    let success_rate = if attempts > 0 {
        (stats.pages_saved as f64 / attempts as f64) * 100.0
    } else {
        0.0
    };

    println!(
        "Success Rate: {:.1}% ({} / {} fetches saved)",
        success_rate, stats.pages_saved, attempts
    );
}
