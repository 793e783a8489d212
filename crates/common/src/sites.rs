//! Warm-up site list
//!
//! An ordered list of reputable sites visited to build believable browsing
//! history (cookies, storage, TLS session tickets with major CDNs) before a
//! session or proxy is used against a protected target.

use serde::{Deserialize, Serialize};

/// Built-in warm-up sites, used when configuration supplies none.
///
/// High-reputation domains fronted by major CDNs, which is exactly the kind
/// of history a returning visitor would have.
pub const DEFAULT_WARMUP_SITES: &[&str] = &[
    "https://www.instagram.com/",
    "https://www.google.com/",
    "https://www.x.com/",
];

/// Ordered, non-empty list of absolute warm-up URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WarmupSiteList(Vec<String>);

impl WarmupSiteList {
    /// Parse a comma-separated site list from configuration.
    ///
    /// Entries are trimmed and empty entries dropped. A bare domain is
    /// normalized to `https://<domain>/`; anything already carrying a scheme
    /// passes through unchanged. An empty result falls back to
    /// [`DEFAULT_WARMUP_SITES`].
    pub fn parse(raw: &str) -> Self {
        let sites: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(normalize_site)
            .collect();

        if sites.is_empty() {
            Self::default()
        } else {
            Self(sites)
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for WarmupSiteList {
    fn default() -> Self {
        Self(DEFAULT_WARMUP_SITES.iter().map(|s| s.to_string()).collect())
    }
}

impl FromIterator<String> for WarmupSiteList {
    fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
        let sites: Vec<String> = iter.into_iter().collect();
        if sites.is_empty() {
            Self::default()
        } else {
            Self(sites)
        }
    }
}

fn normalize_site(site: &str) -> String {
    if site.starts_with("http") {
        site.to_string()
    } else {
        format!("https://{}/", site)
    }
}
