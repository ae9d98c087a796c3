//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, writing into temporary directories.

use site_mirror::config::{Config, SeedConfig};
use site_mirror::crawler::Coordinator;
use site_mirror::state::{CrawlPhase, PageOutcome};
use site_mirror::storage::{MirrorStore, PageStore};
use site_mirror::url::extract_authority;
use site_mirror::MirrorError;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a seed config for a mock server with no delay
fn seed_config(base_url: &str, output: &Path, max_pages: u32, respect_robots: bool) -> SeedConfig {
    let mut config = Config::default();
    config.crawler.max_pages = max_pages;
    config.crawler.delay_seconds = 0.0;
    config.crawler.respect_robots = respect_robots;
    config.crawler.request_timeout_seconds = 5;
    config.user_agent.crawler_name = "TestBot".to_string();
    SeedConfig::new(&format!("{}/", base_url), output, config).expect("valid seed config")
}

/// Directory the mock server's pages are mirrored into
fn host_dir(output: &Path, base_url: &str) -> PathBuf {
    let url = Url::parse(base_url).expect("Failed to parse base URL");
    output.join(extract_authority(&url).expect("Failed to extract host"))
}

/// Recursively collects every file below `dir`
fn files_under(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    let Ok(entries) = std::fs::read_dir(dir) else {
        return files;
    };
    for entry in entries {
        let path = entry.unwrap().path();
        if path.is_dir() {
            files.extend(files_under(&path));
        } else {
            files.push(path);
        }
    }
    files
}

fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(format!("<html><body>{}</body></html>", body))
        .insert_header("content-type", "text/html")
}

async fn mount_page(server: &MockServer, at: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(at))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_budget_stops_crawl_and_off_domain_links_are_ignored() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/a">A</a> <a href="/b">B</a> <a href="http://other.test/x">Other</a>"#,
    )
    .await;
    mount_page(&mock_server, "/a", "Page A").await;

    // The budget of 2 is used up by / and /a
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html_page("Page B"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = seed_config(&base_url, output.path(), 2, true);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 2);
    assert_eq!(coordinator.phase(), CrawlPhase::Completed);

    let host = host_dir(output.path(), &base_url);
    assert!(host.join("index.html").is_file());
    assert!(host.join("a.html").is_file());
    assert!(!host.join("b.html").exists());
    assert!(!output.path().join("other.test").exists());
    assert_eq!(files_under(output.path()).len(), 2);

    // The unvisited in-domain link is still waiting in the frontier
    let remaining: Vec<String> = report.remaining.iter().map(|u| u.to_string()).collect();
    assert_eq!(remaining, vec![format!("{}/b", base_url)]);
    assert!(report.hit_budget());
}

#[tokio::test]
async fn test_robots_server_error_fails_open() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", "Home").await;

    let config = seed_config(&base_url, output.path(), 1, true);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 1);
    assert!(host_dir(output.path(), &base_url).join("index.html").is_file());
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private"),
        )
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/private">Private</a> <a href="/public">Public</a>"#,
    )
    .await;
    mount_page(&mock_server, "/public", r#"<a href="/private">Again</a>"#).await;

    // Disallowed page should never be requested
    Mock::given(method("GET"))
        .and(path("/private"))
        .respond_with(html_page("Secret"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = seed_config(&base_url, output.path(), 10, true);
    let mut coordinator = Coordinator::new(config).expect("Failed to create coordinator");
    let report = coordinator.run().await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 2);
    // Denied URLs are not marked visited, so rediscovery checks them again
    assert_eq!(report.stats.count(PageOutcome::RobotsDenied), 2);
    assert!(!report
        .visited
        .iter()
        .any(|u| u.path() == "/private"));
    assert!(!host_dir(output.path(), &base_url)
        .join("private.html")
        .exists());
}

#[tokio::test]
async fn test_robots_ignored_when_disabled() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", "Home").await;

    let config = seed_config(&base_url, output.path(), 5, false);
    let report = Coordinator::new(config)
        .expect("Failed to create coordinator")
        .run()
        .await
        .expect("Crawl failed");

    assert_eq!(report.pages_saved(), 1);
}

#[tokio::test]
async fn test_timed_out_page_is_skipped() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/slow">Slow</a> <a href="/fast">Fast</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html_page("Too late").set_delay(Duration::from_secs(3)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fast", "Fast").await;

    let mut config = Config::default();
    config.crawler.delay_seconds = 0.0;
    config.crawler.request_timeout_seconds = 1;
    let seed = SeedConfig::new(&format!("{}/", base_url), output.path(), config).unwrap();

    let report = Coordinator::new(seed).unwrap().run().await.expect("Crawl failed");

    let host = host_dir(output.path(), &base_url);
    assert_eq!(report.pages_saved(), 2);
    assert_eq!(report.stats.count(PageOutcome::FetchFailed), 1);
    assert!(host.join("fast.html").is_file());
    assert!(!host.join("slow.html").exists());
    // Failed URLs stay visited
    assert!(report.visited.iter().any(|u| u.path() == "/slow"));
}

#[tokio::test]
async fn test_http_errors_are_skipped_not_fatal() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/missing">Gone</a> <a href="/broken">Broken</a> <a href="/ok">OK</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "Fine").await;

    let config = seed_config(&base_url, output.path(), 10, true);
    let report = Coordinator::new(config).unwrap().run().await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 2);
    assert_eq!(report.stats.count(PageOutcome::FetchFailed), 2);
    assert!(report.remaining.is_empty());
    assert!(!report.hit_budget());
}

#[tokio::test]
async fn test_seed_failure_still_completes() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;

    let config = seed_config(&base_url, output.path(), 10, true);
    let mut coordinator = Coordinator::new(config).unwrap();
    let report = coordinator.run().await.expect("Crawl should complete");

    assert_eq!(report.pages_saved(), 0);
    assert_eq!(coordinator.phase(), CrawlPhase::Completed);
    assert!(output.path().is_dir());
    assert!(files_under(output.path()).is_empty());
}

#[tokio::test]
async fn test_whole_site_is_mirrored_with_structure() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/docs/">Docs</a> <a href="/about.htm">About</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/docs/",
        r#"<a href="guide/intro">Intro</a> <a href="../">Home</a>"#,
    )
    .await;
    mount_page(&mock_server, "/docs/guide/intro", r#"<a href="/api/items.json">API</a>"#).await;
    mount_page(&mock_server, "/about.htm", "About").await;
    Mock::given(method("GET"))
        .and(path("/api/items.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"items": []}"#)
                .insert_header("content-type", "application/json"),
        )
        .mount(&mock_server)
        .await;

    let config = seed_config(&base_url, output.path(), 100, true);
    let report = Coordinator::new(config).unwrap().run().await.expect("Crawl failed");

    let host = host_dir(output.path(), &base_url);
    assert_eq!(report.pages_saved(), 5);
    assert!(report.remaining.is_empty());
    assert!(host.join("index.html").is_file());
    assert!(host.join("docs.html").is_file());
    assert!(host.join("about.htm").is_file());
    assert!(host.join("docs/guide/intro.html").is_file());
    // Content-Type is never consulted for the file name
    assert_eq!(
        std::fs::read_to_string(host.join("api/items.json.html")).unwrap(),
        r#"{"items": []}"#
    );

    // Breadth-first from the seed
    let order: Vec<&str> = report.visited.iter().map(|u| u.path()).collect();
    assert_eq!(
        order,
        vec!["/", "/docs/", "/about.htm", "/docs/guide/intro", "/api/items.json"]
    );
}

#[tokio::test]
async fn test_delay_is_paid_before_every_fetch() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#).await;
    mount_page(&mock_server, "/next", "Next").await;

    let mut config = Config::default();
    config.crawler.delay_seconds = 0.3;
    config.crawler.respect_robots = false;
    let seed = SeedConfig::new(&format!("{}/", base_url), output.path(), config).unwrap();

    let started = Instant::now();
    let report = Coordinator::new(seed).unwrap().run().await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 2);
    assert!(started.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_budget_holds_with_concurrent_fetches() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    let links: String = (0..10)
        .map(|i| format!(r#"<a href="/p{}">P{}</a>"#, i, i))
        .collect();
    mount_page(&mock_server, "/", &links).await;
    for i in 0..10 {
        mount_page(&mock_server, &format!("/p{}", i), &links).await;
    }

    let mut config = Config::default();
    config.crawler.max_pages = 4;
    config.crawler.delay_seconds = 0.0;
    config.crawler.max_concurrent_fetches = 3;
    let seed = SeedConfig::new(&format!("{}/", base_url), output.path(), config).unwrap();

    let report = Coordinator::new(seed).unwrap().run().await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 4);
    assert_eq!(files_under(output.path()).len(), 4);
    assert_eq!(report.visited.len(), 4);
    for url in &report.remaining {
        assert!(!report.visited.contains(url));
    }
}

/// Page store that records what it was asked to save
#[derive(Default)]
struct RecordingStore {
    saved: Mutex<Vec<Url>>,
}

impl PageStore for RecordingStore {
    fn save(&self, url: &Url, _body: &[u8]) -> site_mirror::Result<PathBuf> {
        self.saved.lock().unwrap().push(url.clone());
        self.path_for(url)
    }

    fn path_for(&self, url: &Url) -> site_mirror::Result<PathBuf> {
        MirrorStore::new("/recorded").path_for(url)
    }
}

#[tokio::test]
async fn test_only_seed_host_is_ever_saved() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/local">Local</a>
           <a href="http://other.test/x">Other</a>
           <a href="//elsewhere.test/y">Protocol relative</a>
           <a href="mailto:someone@other.test">Mail</a>"#,
    )
    .await;
    mount_page(&mock_server, "/local", "Local").await;

    let store = Arc::new(RecordingStore::default());
    let config = seed_config(&base_url, output.path(), 50, true);
    let report = Coordinator::with_store(config, store.clone())
        .unwrap()
        .run()
        .await
        .expect("Crawl failed");

    let seed_host = extract_authority(&Url::parse(&base_url).unwrap());
    let saved = store.saved.lock().unwrap();
    assert_eq!(saved.len(), 2);
    assert_eq!(report.pages_saved(), 2);
    assert!(saved.iter().all(|u| extract_authority(u) == seed_host));
}

/// Page store whose writes always fail
struct FailingStore;

impl PageStore for FailingStore {
    fn save(&self, url: &Url, _body: &[u8]) -> site_mirror::Result<PathBuf> {
        Err(MirrorError::Persist {
            path: self.path_for(url)?,
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn path_for(&self, url: &Url) -> site_mirror::Result<PathBuf> {
        MirrorStore::new("/read-only").path_for(url)
    }
}

#[tokio::test]
async fn test_persistence_failure_aborts_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", r#"<a href="/next">Next</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/next"))
        .respond_with(html_page("Next"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = seed_config(&base_url, output.path(), 10, true);
    let mut coordinator = Coordinator::with_store(config, Arc::new(FailingStore)).unwrap();
    let result = coordinator.run().await;

    assert!(matches!(result, Err(MirrorError::Persist { .. })));
    assert_eq!(coordinator.phase(), CrawlPhase::Running);
}

#[tokio::test]
async fn test_coordinator_runs_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", "Home").await;

    let config = seed_config(&base_url, output.path(), 1, false);
    let mut coordinator = Coordinator::new(config).unwrap();
    coordinator.run().await.expect("Crawl failed");

    assert!(matches!(
        coordinator.run().await,
        Err(MirrorError::InvalidTransition { .. })
    ));
}

#[tokio::test]
async fn test_repeated_runs_map_to_same_paths() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", r#"<a href="/page">Page</a>"#).await;
    mount_page(&mock_server, "/page", "Stable").await;

    for _ in 0..2 {
        let config = seed_config(&base_url, output.path(), 10, false);
        let report = Coordinator::new(config).unwrap().run().await.expect("Crawl failed");
        assert_eq!(report.pages_saved(), 2);
    }

    // Second run overwrote the same two files
    assert_eq!(files_under(output.path()).len(), 2);
}

#[tokio::test]
async fn test_budget_reached_as_frontier_empties() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&mock_server, "/", r#"<a href="/only">Only</a>"#).await;
    mount_page(&mock_server, "/only", "No links").await;

    let config = seed_config(&base_url, output.path(), 2, false);
    let report = site_mirror::crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 2);
    assert!(report.remaining.is_empty());
    assert!(report.hit_budget());
}

#[tokio::test]
async fn test_crawl_delay_does_not_override_configured_delay() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nCrawl-delay: 5"))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/", "Home").await;

    let config = seed_config(&base_url, output.path(), 1, true);
    let started = Instant::now();
    let report = site_mirror::crawl(config).await.expect("Crawl failed");

    assert_eq!(report.pages_saved(), 1);
    assert!(started.elapsed() < Duration::from_secs(5));
}
