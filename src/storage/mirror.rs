//! Filesystem mirror implementation of [`PageStore`]

use crate::storage::PageStore;
use crate::url::extract_authority;
use crate::{MirrorError, Result};
use std::fs;
use std::path::PathBuf;
use url::Url;

/// File name used when the URL path is empty (`/`)
pub const INDEX_FILE: &str = "index.html";

/// Writes pages under `{root}/{authority}/{derived path}`
#[derive(Debug, Clone)]
pub struct MirrorStore {
    root: PathBuf,
}

impl MirrorStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

}

impl PageStore for MirrorStore {
    fn save(&self, url: &Url, body: &[u8]) -> Result<PathBuf> {
        let file_path = self.path_for(url)?;

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).map_err(|source| MirrorError::Persist {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        // Overwrites silently; repeated runs into one directory replace files
        fs::write(&file_path, body).map_err(|source| MirrorError::Persist {
            path: file_path.clone(),
            source,
        })?;

        Ok(file_path)
    }

    fn path_for(&self, url: &Url) -> Result<PathBuf> {
        let authority =
            extract_authority(url).ok_or(MirrorError::UrlParse(::url::ParseError::EmptyHost))?;

        let mut file_path = self.root.join(authority);
        for segment in derive_relative_path(url).split('/').filter(|s| !s.is_empty()) {
            file_path.push(segment);
        }
        Ok(file_path)
    }
}

/// Derives the mirror-relative file path from the URL path alone
///
/// Leading and trailing slashes are stripped; an empty path becomes
/// `index.html`; anything not ending in `.html`/`.htm` gets `.html` appended.
/// Query strings, fragments and the response Content-Type play no part, so
/// `/api/items.json` is stored as `api/items.json.html`.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use site_mirror::storage::derive_relative_path;
///
/// let url = Url::parse("https://example.com/docs/guide/").unwrap();
/// assert_eq!(derive_relative_path(&url), "docs/guide.html");
/// ```
pub fn derive_relative_path(url: &Url) -> String {
    let trimmed = url.path().trim_matches('/');
    let mut path = if trimmed.is_empty() {
        INDEX_FILE.to_string()
    } else {
        trimmed.to_string()
    };

    if !path.ends_with(".html") && !path.ends_with(".htm") {
        path.push_str(".html");
    }
    path
}
