use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

/// Configuration file structure for Site-Mirror
///
/// Every section and field has a default, so an empty file (or no file at all)
/// yields a usable configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages to save
    #[serde(rename = "max-pages")]
    pub max_pages: u32,

    /// Delay paid before every single request (seconds)
    #[serde(rename = "delay-seconds")]
    pub delay_seconds: f64,

    /// Whether robots.txt is consulted at all
    #[serde(rename = "respect-robots")]
    pub respect_robots: bool,

    /// Let a larger robots.txt Crawl-delay replace `delay_seconds`
    #[serde(rename = "honor-crawl-delay")]
    pub honor_crawl_delay: bool,

    /// Hard timeout for one request (seconds)
    #[serde(rename = "request-timeout-seconds")]
    pub request_timeout_seconds: u64,

    /// Number of fetches allowed in flight at once
    #[serde(rename = "max-concurrent-fetches")]
    pub max_concurrent_fetches: usize,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 100,
            delay_seconds: 1.0,
            respect_robots: true,
            honor_crawl_delay: false,
            request_timeout_seconds: 10,
            max_concurrent_fetches: 1,
        }
    }
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UserAgentConfig {
    /// Name of the crawler, also used as the robots.txt product token
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: "SiteMirrorBot".to_string(),
            crawler_version: env!("CARGO_PKG_VERSION").to_string(),
            contact_url: "https://example.com/site-mirror".to_string(),
        }
    }
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `Mozilla/5.0 (compatible; Name/Version; +ContactURL)`
    pub fn header_value(&self) -> String {
        format!(
            "Mozilla/5.0 (compatible; {}/{}; +{})",
            self.crawler_name, self.crawler_version, self.contact_url
        )
    }

    /// The token matched against `User-agent:` lines in robots.txt
    pub fn robots_token(&self) -> &str {
        &self.crawler_name
    }
}

/// Immutable input of one crawl
///
/// Built once by [`SeedConfig::new`], which validates every field, and then
/// passed by value into the coordinator. Nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    start_url: Url,
    output_directory: PathBuf,
    crawler: CrawlerConfig,
    user_agent: UserAgentConfig,
}

impl SeedConfig {
    pub(crate) fn from_parts(
        start_url: Url,
        output_directory: PathBuf,
        config: Config,
    ) -> Self {
        Self {
            start_url,
            output_directory,
            crawler: config.crawler,
            user_agent: config.user_agent,
        }
    }

    pub fn start_url(&self) -> &Url {
        &self.start_url
    }

    pub fn output_directory(&self) -> &Path {
        &self.output_directory
    }

    pub fn max_pages(&self) -> u32 {
        self.crawler.max_pages
    }

    pub fn delay(&self) -> Duration {
        Duration::from_secs_f64(self.crawler.delay_seconds)
    }

    pub fn respect_robots(&self) -> bool {
        self.crawler.respect_robots
    }

    pub fn honor_crawl_delay(&self) -> bool {
        self.crawler.honor_crawl_delay
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.crawler.request_timeout_seconds)
    }

    pub fn max_concurrent_fetches(&self) -> usize {
        self.crawler.max_concurrent_fetches
    }

    pub fn user_agent(&self) -> &UserAgentConfig {
        &self.user_agent
    }
}
