//! Runtime configuration.
//!
//! [`CatalogConfig`] tunes the catalog operations and [`SessionConfig`]
//! carries what the HTTP provider needs to open a session. Both deserialize
//! from JSON with every field optional; [`CatalogConfig::from_env`] reads
//! `YTM_*` environment variables on top of the defaults.

use std::collections::BTreeMap;
use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Result;

/// Consent cookie sent by sessions without credentials.
pub const ANONYMOUS_COOKIE: &str = "PREF=hl=en; CONSENT=YES+20210329;";

/// Default gateway the HTTP provider talks to.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8700/";

/// Catalog tuning knobs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Provider search limit and per-query cap when merging search results.
    pub search_results: usize,

    /// Maximum number of concurrent outbound provider calls.
    pub max_workers: usize,

    /// Minimum watch-context size before the secondary related source is asked.
    pub related_threshold: usize,

    /// Ids starting with this prefix are playlists; anything else is an album.
    pub playlist_prefix: String,

    /// Hand album tracks to the video loader after `list_playlists`.
    pub prefetch_tracks: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            search_results: 15,
            max_workers: 8,
            related_threshold: 10,
            playlist_prefix: "PL".to_string(),
            prefetch_tracks: true,
        }
    }
}

impl CatalogConfig {
    /// Parse from a JSON document; missing fields keep their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Defaults overridden by `YTM_SEARCH_RESULTS`, `YTM_MAX_WORKERS`,
    /// `YTM_RELATED_THRESHOLD`, `YTM_PLAYLIST_PREFIX` and
    /// `YTM_PREFETCH_TRACKS`.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        override_from_env("YTM_SEARCH_RESULTS", &mut config.search_results);
        override_from_env("YTM_MAX_WORKERS", &mut config.max_workers);
        override_from_env("YTM_RELATED_THRESHOLD", &mut config.related_threshold);
        override_from_env("YTM_PLAYLIST_PREFIX", &mut config.playlist_prefix);
        override_from_env("YTM_PREFETCH_TRACKS", &mut config.prefetch_tracks);
        config
    }
}

fn override_from_env<T: FromStr>(key: &str, slot: &mut T) {
    let Ok(raw) = env::var(key) else {
        return;
    };
    match raw.trim().parse() {
        Ok(value) => *slot = value,
        Err(_) => warn!(key, raw = raw.as_str(), "ignoring unparsable config value"),
    }
}

/// What the HTTP provider needs to open a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Gateway base URL.
    pub base_url: String,

    /// Request headers captured from a signed-in browser session.
    pub headers: BTreeMap<String, String>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            headers: BTreeMap::from([("Cookie".to_string(), ANONYMOUS_COOKIE.to_string())]),
        }
    }
}

impl SessionConfig {
    pub fn new<S: Into<String>>(base_url: S, headers: BTreeMap<String, String>) -> Self {
        Self {
            base_url: base_url.into(),
            headers,
        }
    }

    /// The `Cookie` header, matched case-insensitively.
    pub fn cookie(&self) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case("cookie"))
            .map(|(_, value)| value.as_str())
    }

    /// True when the headers carry no credentials beyond the consent cookie.
    pub fn is_anonymous(&self) -> bool {
        match self.cookie() {
            None => true,
            Some(cookie) => cookie.trim() == ANONYMOUS_COOKIE,
        }
    }
}
