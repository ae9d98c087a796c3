//! Crawl frontier and visited set
//!
//! The frontier is an insertion-ordered queue (FIFO), which makes the crawl
//! breadth-first from the seed. The visited set only grows. A URL is never in
//! both at once: `push` refuses visited URLs, and `pop` removes a URL from
//! candidacy before the caller decides whether to visit it.

use std::collections::{HashSet, VecDeque};
use url::Url;

/// Discovered-but-unvisited URLs plus the set of visited URLs
#[derive(Debug, Default)]
pub struct Frontier {
    /// Pending URLs in pop order
    queue: VecDeque<Url>,

    /// Membership index for `queue`
    queued: HashSet<String>,

    /// URLs taken for fetching, successful or not
    visited: HashSet<String>,

    /// `visited` in the order URLs were marked
    visit_order: Vec<Url>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed URL
    pub fn with_seed(seed: Url) -> Self {
        let mut frontier = Self::new();
        frontier.push(seed);
        frontier
    }

    /// Adds a URL to the back of the queue
    ///
    /// # Returns
    ///
    /// * `true` - The URL was queued
    /// * `false` - The URL is already visited or already queued
    pub fn push(&mut self, url: Url) -> bool {
        if self.visited.contains(url.as_str()) || self.queued.contains(url.as_str()) {
            return false;
        }
        self.queued.insert(url.as_str().to_string());
        self.queue.push_back(url);
        true
    }

    /// Removes and returns the next URL to consider
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.queue.pop_front()?;
        self.queued.remove(url.as_str());
        Some(url)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Records that a URL was taken for fetching
    ///
    /// # Returns
    ///
    /// * `true` - The URL was not visited before
    /// * `false` - The URL was already visited
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        debug_assert!(
            !self.queued.contains(url.as_str()),
            "URL marked visited while still queued: {}",
            url
        );
        if !self.visited.insert(url.as_str().to_string()) {
            return false;
        }
        self.visit_order.push(url.clone());
        true
    }

    /// Number of pending URLs
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Pending URLs in the order they would be popped
    pub fn pending(&self) -> impl Iterator<Item = &Url> {
        self.queue.iter()
    }

    /// Visited URLs in the order they were marked
    pub fn visited(&self) -> &[Url] {
        &self.visit_order
    }

    /// Returns true if no pending URL is also visited
    pub fn is_disjoint(&self) -> bool {
        self.queued.is_disjoint(&self.visited)
    }

    /// Consumes the frontier, returning `(visited, pending)` in order
    pub fn into_parts(self) -> (Vec<Url>, Vec<Url>) {
        (self.visit_order, self.queue.into_iter().collect())
    }
}
