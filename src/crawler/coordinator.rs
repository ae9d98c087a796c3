//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop, which:
//! - Seeds the frontier and loads robots.txt
//! - Takes URLs from the frontier, checks them, and marks them visited
//! - Hands each URL to a fetch worker (one at a time by default)
//! - Folds worker results back into the frontier and the statistics
//!
//! Only the coordinator touches the frontier and visited set. Workers fetch,
//! persist and extract, then report back through the join set, so taking a URL
//! and merging its links are never interleaved with another worker's.

use crate::config::SeedConfig;
use crate::crawler::fetcher::{build_http_client, Fetcher};
use crate::crawler::frontier::Frontier;
use crate::crawler::links::extract_links;
use crate::output::{CrawlReport, CrawlStats};
use crate::robots::RobotsGate;
use crate::state::{CrawlPhase, PageOutcome};
use crate::storage::{MirrorStore, PageStore};
use crate::url::Domain;
use crate::{MirrorError, Result};
use reqwest::Client;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use url::Url;

/// Upper bound for a robots.txt Crawl-delay that raises the configured delay
const MAX_CRAWL_DELAY: Duration = Duration::from_secs(60);

/// Shared, read-only context handed to every fetch worker
struct WorkerContext {
    fetcher: Fetcher,
    store: Arc<dyn PageStore>,
    domain: Domain,
}

/// What a worker reports back for one URL
#[derive(Debug)]
enum PageResult {
    Saved {
        url: Url,
        path: PathBuf,
        links: Vec<Url>,
        parse_failed: bool,
    },
    FetchFailed {
        url: Url,
    },
}

/// Mutable crawl state, owned by the coordinator loop
struct CrawlState {
    frontier: Frontier,
    pages_saved: u32,
    in_flight: u32,
}

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<SeedConfig>,
    domain: Domain,
    client: Client,
    store: Arc<dyn PageStore>,
    phase: CrawlPhase,
}

impl Coordinator {
    /// Creates a coordinator writing into the configured output directory
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run, in the `Idle` phase
    /// * `Err(MirrorError)` - The HTTP client could not be built
    pub fn new(config: SeedConfig) -> Result<Self> {
        let store = Arc::new(MirrorStore::new(config.output_directory()));
        Self::with_store(config, store)
    }

    /// Creates a coordinator with a custom page store
    pub fn with_store(config: SeedConfig, store: Arc<dyn PageStore>) -> Result<Self> {
        let domain = Domain::from_seed(config.start_url())?;
        let client = build_http_client(config.user_agent(), config.request_timeout())?;

        Ok(Self {
            config: Arc::new(config),
            domain,
            client,
            store,
            phase: CrawlPhase::Idle,
        })
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Runs the crawl to completion
    ///
    /// The loop ends when the frontier is empty or `max_pages` pages have been
    /// saved. Fetch failures, robots denials and link extraction failures are
    /// logged and skipped. Only a failed write to disk aborts the crawl.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The crawl completed
    /// * `Err(MirrorError)` - A page could not be persisted, or the
    ///   coordinator was already run
    pub async fn run(&mut self) -> Result<CrawlReport> {
        self.transition(CrawlPhase::Running)?;

        std::fs::create_dir_all(self.config.output_directory()).map_err(|source| {
            MirrorError::Persist {
                path: self.config.output_directory().to_path_buf(),
                source,
            }
        })?;

        let gate = if self.config.respect_robots() {
            Some(RobotsGate::load(&self.client, &self.domain).await)
        } else {
            tracing::info!("Ignoring robots.txt");
            None
        };

        let delay = self.effective_delay(gate.as_ref());
        let context = Arc::new(WorkerContext {
            fetcher: Fetcher::new(self.client.clone(), delay),
            store: Arc::clone(&self.store),
            domain: self.domain.clone(),
        });

        let mut state = CrawlState {
            frontier: Frontier::with_seed(self.config.start_url().clone()),
            pages_saved: 0,
            in_flight: 0,
        };
        let mut stats = CrawlStats::new();
        let mut workers: JoinSet<Result<PageResult>> = JoinSet::new();
        let max_workers = self.config.max_concurrent_fetches();

        tracing::info!(
            "Starting crawl of {} (max {} pages, delay {:.1}s)",
            self.config.start_url(),
            self.config.max_pages(),
            delay.as_secs_f64()
        );

        loop {
            while workers.len() < max_workers {
                let Some(url) = self.claim_next(&mut state, gate.as_ref(), &mut stats) else {
                    break;
                };
                let context = Arc::clone(&context);
                workers.spawn(async move { process_page(&context, url).await });
            }

            let Some(joined) = workers.join_next().await else {
                break;
            };
            let result = joined.map_err(|e| MirrorError::Worker(e.to_string()))??;
            absorb(&mut state, result, &mut stats);
        }

        self.transition(CrawlPhase::Completed)?;
        stats.mark_finished();

        tracing::info!(
            "Crawl complete: {} pages saved to {}",
            state.pages_saved,
            self.config.output_directory().display()
        );

        let (visited, remaining) = state.frontier.into_parts();
        Ok(CrawlReport {
            stats,
            output_directory: self.config.output_directory().to_path_buf(),
            max_pages: self.config.max_pages(),
            visited,
            remaining,
        })
    }

    /// Takes the next URL to fetch from the frontier
    ///
    /// Pops, drops duplicates, checks robots.txt, marks visited and reserves a
    /// budget slot. Returns None when the frontier is empty or every remaining
    /// budget slot is already reserved.
    fn claim_next(
        &self,
        state: &mut CrawlState,
        gate: Option<&RobotsGate>,
        stats: &mut CrawlStats,
    ) -> Option<Url> {
        let max_pages = self.config.max_pages();
        let agent = self.config.user_agent().robots_token();

        while state.pages_saved + state.in_flight < max_pages {
            let url = state.frontier.pop()?;

            if state.frontier.is_visited(url.as_str()) {
                tracing::debug!("Skipping {} (already visited)", url);
                stats.record(PageOutcome::Duplicate);
                continue;
            }

            if let Some(gate) = gate {
                if !gate.is_allowed(url.as_str(), agent) {
                    tracing::info!("Skipping {} (disallowed by robots.txt)", url);
                    stats.record(PageOutcome::RobotsDenied);
                    continue;
                }
            }

            state.frontier.mark_visited(&url);
            state.in_flight += 1;
            tracing::info!(
                "Fetching {} ({}/{})",
                url,
                state.pages_saved + state.in_flight,
                max_pages
            );
            return Some(url);
        }

        None
    }

    /// Configured delay, raised to robots.txt's Crawl-delay when that is larger
    /// and `honor-crawl-delay` is set
    fn effective_delay(&self, gate: Option<&RobotsGate>) -> Duration {
        let configured = self.config.delay();
        if !self.config.honor_crawl_delay() {
            return configured;
        }
        let agent = self.config.user_agent().robots_token();

        match gate.and_then(|g| g.crawl_delay(agent)) {
            Some(secs) => {
                let requested = Duration::from_secs_f64(secs.min(MAX_CRAWL_DELAY.as_secs_f64()));
                if requested > configured {
                    tracing::info!(
                        "robots.txt asks for Crawl-delay {:.1}s, using it instead of {:.1}s",
                        requested.as_secs_f64(),
                        configured.as_secs_f64()
                    );
                    requested
                } else {
                    configured
                }
            }
            None => configured,
        }
    }

    fn transition(&mut self, next: CrawlPhase) -> Result<()> {
        if !self.phase.can_transition_to(next) {
            return Err(MirrorError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}

/// Fetches, persists and extracts links for one URL
///
/// A fetch failure is an ordinary result. A persistence failure is returned as
/// an error and ends the crawl.
async fn process_page(context: &WorkerContext, url: Url) -> Result<PageResult> {
    let page = match context.fetcher.fetch(&url).await {
        Ok(page) => page,
        Err(e) => {
            tracing::warn!("{}", e);
            return Ok(PageResult::FetchFailed { url });
        }
    };

    if page.final_url != url {
        tracing::debug!("{} redirected to {}", url, page.final_url);
    }

    let path = context.store.save(&url, &page.body)?;
    tracing::info!("Saved to {}", path.display());

    // Links resolve against the requested URL, not the post-redirect one
    let (links, parse_failed) = match extract_links(&page.text, &url, &context.domain) {
        Ok(links) => (links, false),
        Err(e) => {
            tracing::warn!("Failed to parse links from {}: {}", url, e);
            (Vec::new(), true)
        }
    };

    Ok(PageResult::Saved {
        url,
        path,
        links,
        parse_failed,
    })
}

/// Folds one worker result into the crawl state
fn absorb(state: &mut CrawlState, result: PageResult, stats: &mut CrawlStats) {
    state.in_flight -= 1;

    match result {
        PageResult::Saved {
            url,
            path,
            links,
            parse_failed,
        } => {
            state.pages_saved += 1;
            stats.record(PageOutcome::Saved);
            if parse_failed {
                stats.parse_failures += 1;
            }

            let mut queued = 0;
            for link in links {
                if state.frontier.push(link) {
                    queued += 1;
                }
            }
            stats.links_queued += queued;
            tracing::debug!(
                "{} -> {} ({} new links, {} in frontier)",
                url,
                path.display(),
                queued,
                state.frontier.len()
            );
        }
        PageResult::FetchFailed { url } => {
            tracing::debug!("{} stays visited after failed fetch", url);
            stats.record(PageOutcome::FetchFailed);
        }
    }

    debug_assert!(state.frontier.is_disjoint());
}
