//! Robots.txt handling module
//!
//! This module provides the politeness gate: it fetches robots.txt once for the
//! crawled domain and answers "may this URL be fetched" queries. Any failure to
//! load robots.txt degrades the gate to [`RobotsGate::Unavailable`], which allows
//! everything.

mod parser;

pub use parser::ParsedRobots;

use crate::url::Domain;
use crate::MirrorError;
use reqwest::{Client, StatusCode};

/// Politeness gate state for one domain
#[derive(Debug, Clone)]
pub enum RobotsGate {
    /// robots.txt was fetched and parsed
    Loaded(ParsedRobots),

    /// robots.txt could not be loaded; every URL is allowed
    Unavailable,
}

impl RobotsGate {
    /// Loads robots.txt for the domain
    ///
    /// Never fails: a network error, a non-200 status or a body that is not
    /// valid UTF-8 is logged and yields [`RobotsGate::Unavailable`].
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client (carries the crawler's User-Agent)
    /// * `domain` - The crawl's domain
    pub async fn load(client: &Client, domain: &Domain) -> Self {
        match fetch_robots(client, domain).await {
            Ok(robots) => {
                tracing::info!("Loaded robots.txt from {}", domain.robots_url());
                RobotsGate::Loaded(robots)
            }
            Err(e) => {
                tracing::warn!("Could not load robots.txt: {}. Proceeding with caution.", e);
                RobotsGate::Unavailable
            }
        }
    }

    /// Checks if a URL may be fetched by the given agent
    ///
    /// # Returns
    ///
    /// * `true` - If the URL is allowed, or robots.txt is unavailable
    /// * `false` - If robots.txt disallows the URL
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        match self {
            RobotsGate::Loaded(robots) => robots.is_allowed(url, user_agent),
            RobotsGate::Unavailable => true,
        }
    }

    /// Crawl-delay declared for the agent, if robots.txt was loaded
    pub fn crawl_delay(&self, user_agent: &str) -> Option<f64> {
        match self {
            RobotsGate::Loaded(robots) => robots.crawl_delay(user_agent),
            RobotsGate::Unavailable => None,
        }
    }
}

/// Fetches and parses robots.txt for a domain
///
/// # Returns
///
/// * `Ok(ParsedRobots)` - Successfully fetched and parsed robots.txt
/// * `Err(MirrorError::RobotsUnavailable)` - Failed to fetch or decode
pub async fn fetch_robots(client: &Client, domain: &Domain) -> Result<ParsedRobots, MirrorError> {
    let robots_url = domain.robots_url();
    let unavailable = |reason: String| MirrorError::RobotsUnavailable {
        url: robots_url.clone(),
        reason,
    };

    let response = client
        .get(&robots_url)
        .send()
        .await
        .map_err(|e| unavailable(e.to_string()))?;

    if response.status() != StatusCode::OK {
        return Err(unavailable(format!("HTTP {}", response.status().as_u16())));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| unavailable(e.to_string()))?;
    let content = String::from_utf8(bytes.to_vec())
        .map_err(|_| unavailable("body is not valid UTF-8".to_string()))?;

    Ok(ParsedRobots::from_content(&content))
}
