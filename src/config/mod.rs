//! Configuration module for Site-Mirror
//!
//! This module handles the optional TOML configuration file, its validation, and
//! the immutable [`SeedConfig`] a crawl is started with.
//!
//! # Example
//!
//! ```no_run
//! use site_mirror::config::{load_config, SeedConfig};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mirror.toml")).unwrap();
//! let seed = SeedConfig::new("https://example.com/", "site_mirror", config).unwrap();
//! println!("Crawler will save at most {} pages", seed.max_pages());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, SeedConfig, UserAgentConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate_start_url;
