//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlPhase`: The lifecycle of the whole crawl (idle, running, completed)
//! - `PageOutcome`: What happened to each URL taken from the frontier

mod crawl_phase;
mod page_outcome;

// Re-export main types
pub use crawl_phase::CrawlPhase;
pub use page_outcome::PageOutcome;
