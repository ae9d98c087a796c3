use std::fmt;

/// What happened to one URL taken from the frontier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Fetched and written to disk
    Saved,

    /// Already in the visited set when popped
    Duplicate,

    /// Disallowed by robots.txt; not marked visited
    RobotsDenied,

    /// Network error, timeout, or non-2xx status; marked visited, not retried
    FetchFailed,
}

impl PageOutcome {
    /// Returns true if this outcome counts against the page budget
    pub fn counts_toward_budget(&self) -> bool {
        matches!(self, Self::Saved)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Duplicate => "duplicate",
            Self::RobotsDenied => "robots_denied",
            Self::FetchFailed => "fetch_failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
