//! Storage module for persisting fetched pages
//!
//! This module maps each URL to a deterministic local file path, preserving the
//! site's directory structure, and writes the page bytes there.

mod mirror;
mod traits;

pub use mirror::{derive_relative_path, MirrorStore, INDEX_FILE};
pub use traits::PageStore;
