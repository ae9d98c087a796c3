//! URL handling module for Site-Mirror
//!
//! This module defines the crawl's scope boundary ([`Domain`]) and the
//! authority extraction shared by scoping and the on-disk layout.

mod domain;

pub use domain::extract_authority;

use crate::{MirrorError, Result};
use url::Url;

/// The scope boundary of a crawl
///
/// Derived once from the seed URL. A URL is in scope iff its authority
/// (host plus explicit port) equals the seed's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    scheme: String,
    authority: String,
}

impl Domain {
    /// Derives the domain from the seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(Domain)` - The seed has a host
    /// * `Err(MirrorError)` - The seed has no host
    pub fn from_seed(seed: &Url) -> Result<Self> {
        let authority = extract_authority(seed).ok_or(MirrorError::UrlParse(
            ::url::ParseError::EmptyHost,
        ))?;
        Ok(Self {
            scheme: seed.scheme().to_string(),
            authority,
        })
    }

    /// Host plus explicit port, e.g. `example.com` or `127.0.0.1:8080`
    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// `{scheme}://{authority}`, the base robots.txt is fetched from
    pub fn base_url(&self) -> String {
        format!("{}://{}", self.scheme, self.authority)
    }

    /// Location of this domain's robots.txt
    pub fn robots_url(&self) -> String {
        format!("{}/robots.txt", self.base_url())
    }

    /// Returns true if the URL belongs to this crawl
    ///
    /// The scheme is not part of the comparison: `http` and `https` links to
    /// the same host are both in scope.
    pub fn contains(&self, url: &Url) -> bool {
        extract_authority(url).as_deref() == Some(self.authority.as_str())
    }
}
