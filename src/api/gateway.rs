//! HTTP client for the YouTube Music metadata gateway.
//!
//! The gateway exposes the provider's calls as plain JSON endpoints:
//!
//! | call                  | endpoint                                   |
//! |-----------------------|--------------------------------------------|
//! | search                | `search?query=..&filter=songs\|albums&limit=..` |
//! | album detail          | `albums/{browseId}`                        |
//! | playlist detail       | `playlists/{playlistId}`                   |
//! | library playlists     | `library/playlists`                        |
//! | user page             | `users/{channelId}`                        |
//! | watch context         | `watch/{videoId}`                          |
//! | account               | `account`                                  |
//!
//! Signed-in sessions forward the captured browser headers on every request.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::api::provider::MusicProvider;
use crate::config::SessionConfig;
use crate::converters::parse_records;
use crate::error::{CatalogError, Result};
use crate::models::{
    AlbumDetail, AlbumHit, PlaylistDetail, PlaylistSummary, SearchSong, UserProfile,
    WatchPlaylist,
};

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// Search result type filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchFilter {
    Songs,
    Albums,
}

impl SearchFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchFilter::Songs => "songs",
            SearchFilter::Albums => "albums",
        }
    }
}

/// Gateway client holding one HTTP session.
///
/// # Example
///
/// ```rust,no_run
/// use ytm_catalog::{config::SessionConfig, MusicProvider, YtMusicApi};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = YtMusicApi::new(&SessionConfig::default())?;
///     let songs = api.search_songs("daft punk", 5).await?;
///     println!("{} songs", songs.len());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct YtMusicApi {
    client: Client,
    base_url: String,
    authenticated: bool,
}

impl YtMusicApi {
    /// Open a session.
    ///
    /// Credentials are used unless the cookie is the anonymous consent
    /// cookie. Header material that cannot be sent is logged and the
    /// session degrades to anonymous.
    pub fn new(session: &SessionConfig) -> Result<Self> {
        let base_url = session.base_url.trim_end_matches('/').to_string();

        if !session.is_anonymous() {
            match build_header_map(session) {
                Ok(headers) => {
                    let client = Self::client_builder().default_headers(headers).build()?;
                    info!("Opened authenticated gateway session");
                    return Ok(Self {
                        client,
                        base_url,
                        authenticated: true,
                    });
                }
                Err(e) => {
                    error!("Session init error: {}. Continuing anonymously", e);
                }
            }
        }

        Ok(Self {
            client: Self::client_builder().build()?,
            base_url,
            authenticated: false,
        })
    }

    fn client_builder() -> reqwest::ClientBuilder {
        Client::builder().user_agent(USER_AGENT).cookie_store(true)
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// GET an endpoint and return its JSON body.
    async fn get_api(&self, endpoint: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = self.url(endpoint);
        debug!("GET {} with params: {:?}", url, params);

        let response = self.client.get(&url).query(params).send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(endpoint.to_string()));
        }
        let data: Value = response.error_for_status()?.json().await?;

        if let Some(error) = data.get("error") {
            let error_msg = error
                .get("message")
                .and_then(|m| m.as_str())
                .unwrap_or("Unknown error");
            return Err(CatalogError::Provider(format!("{}: {}", endpoint, error_msg)));
        }

        Ok(data)
    }

    async fn get_typed<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let data = self.get_api(endpoint, &[]).await?;
        Ok(serde_json::from_value(data)?)
    }

    /// GET an endpoint answering with a list, keeping the records that parse.
    async fn get_records<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let data = self.get_api(endpoint, params).await?;
        let records = list_body(&data).ok_or_else(|| {
            CatalogError::Provider(format!("{}: expected a list of records", endpoint))
        })?;
        Ok(parse_records(records, endpoint))
    }

    async fn search<T: DeserializeOwned>(
        &self,
        query: &str,
        filter: SearchFilter,
        limit: usize,
    ) -> Result<Vec<T>> {
        let limit = limit.to_string();
        self.get_records(
            "search",
            &[
                ("query", query),
                ("filter", filter.as_str()),
                ("limit", limit.as_str()),
            ],
        )
        .await
    }
}

/// A list body is either a bare array or an object with `results`.
fn list_body(data: &Value) -> Option<&[Value]> {
    data.as_array()
        .or_else(|| data.get("results").and_then(|r| r.as_array()))
        .map(|v| v.as_slice())
}

fn build_header_map(session: &SessionConfig) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    for (name, value) in &session.headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| CatalogError::InvalidHeader(format!("{}: {}", name, e)))?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|e| CatalogError::InvalidHeader(format!("{}: {}", name, e)))?;
        headers.insert(header_name, header_value);
    }
    Ok(headers)
}

#[async_trait]
impl MusicProvider for YtMusicApi {
    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SearchSong>> {
        self.search(query, SearchFilter::Songs, limit).await
    }

    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<AlbumHit>> {
        self.search(query, SearchFilter::Albums, limit).await
    }

    async fn get_album(&self, browse_id: &str) -> Result<AlbumDetail> {
        self.get_typed(&format!("albums/{}", browse_id)).await
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistDetail> {
        self.get_typed(&format!("playlists/{}", playlist_id)).await
    }

    async fn get_library_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        self.get_records("library/playlists", &[]).await
    }

    async fn get_user(&self, channel_id: &str) -> Result<UserProfile> {
        self.get_typed(&format!("users/{}", channel_id)).await
    }

    async fn get_watch_playlist(&self, video_id: &str) -> Result<WatchPlaylist> {
        self.get_typed(&format!("watch/{}", video_id)).await
    }

    async fn own_channel_id(&self) -> Result<Option<String>> {
        if !self.authenticated {
            return Ok(None);
        }
        let account = self.get_api("account", &[]).await?;
        Ok(account
            .get("channelId")
            .and_then(|id| id.as_str())
            .map(|id| id.to_string()))
    }
}
