//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - The fixed delay paid before every request
//! - Collapsing every failure into a single fetch error

use crate::config::UserAgentConfig;
use crate::MirrorError;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use url::Url;

/// Maximum number of redirects followed for one request
const MAX_REDIRECTS: usize = 10;

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// Body decoded as (lossy) UTF-8, used for link extraction
    pub text: String,

    /// Raw body bytes, written to disk unchanged
    pub body: Vec<u8>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Hard timeout for a whole request
///
/// # Example
///
/// ```no_run
/// use site_mirror::config::UserAgentConfig;
/// use site_mirror::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited page fetcher
///
/// Every call to [`Fetcher::fetch`] sleeps for the full delay before sending its
/// request, regardless of how long ago the previous request finished.
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    delay: Duration,
}

impl Fetcher {
    pub fn new(client: Client, delay: Duration) -> Self {
        Self { client, delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Waits out the delay, then fetches the URL
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, MirrorError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        fetch_url(&self.client, url).await
    }
}

/// Fetches a URL without any delay
///
/// Redirects are followed by the client. Any non-2xx status, timeout,
/// connection error or body read error becomes [`MirrorError::Fetch`]; nothing
/// is retried.
pub async fn fetch_url(client: &Client, url: &Url) -> Result<FetchedPage, MirrorError> {
    let fetch_error = |message: String| MirrorError::Fetch {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| fetch_error(classify_error(&e)))?;

    let status = response.status();
    let final_url = response.url().clone();

    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {}", status.as_u16())));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| fetch_error(classify_error(&e)))?
        .to_vec();
    let text = String::from_utf8_lossy(&body).into_owned();

    Ok(FetchedPage {
        final_url,
        text,
        body,
    })
}

/// Turns a transport error into a short diagnostic
fn classify_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else if e.is_redirect() {
        format!("Redirect error: {}", e)
    } else {
        e.to_string()
    }
}
