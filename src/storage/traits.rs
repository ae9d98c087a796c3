//! Storage trait
//!
//! This module defines the trait interface for page storage backends.

use crate::Result;
use std::path::PathBuf;
use url::Url;

/// Trait for page storage backend implementations
///
/// Implementations are shared between fetch workers, so they must be safe to
/// call from several tasks at once.
pub trait PageStore: Send + Sync {
    /// Persists the raw bytes of one fetched page
    ///
    /// # Arguments
    ///
    /// * `url` - The URL the page was requested as
    /// * `body` - The raw response bytes
    ///
    /// # Returns
    ///
    /// * `Ok(PathBuf)` - Where the page was written
    /// * `Err(MirrorError::Persist)` - The write failed; callers treat this as fatal
    fn save(&self, url: &Url, body: &[u8]) -> Result<PathBuf>;

    /// Resolves where `url` would be stored without writing anything
    fn path_for(&self, url: &Url) -> Result<PathBuf>;
}
