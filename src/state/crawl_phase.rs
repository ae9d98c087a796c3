use std::fmt;

/// Crawl lifecycle phases
///
/// A crawl moves `Idle -> Running -> Completed` exactly once. There is no
/// failed phase: per-page failures are absorbed, and a fatal error simply
/// leaves the crawl in `Running`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Coordinator built, nothing fetched yet
    Idle,

    /// Frontier seeded, fetch loop in progress
    Running,

    /// Frontier exhausted or page budget reached
    Completed,
}

impl CrawlPhase {
    /// Returns true if `self -> next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Completed)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
