//! Catalog operations.
//!
//! [`Catalog`] is the explicitly constructed context every operation runs
//! against: the pooled provider handle, the secondary related-videos
//! source, the video loader, the account's own channel id and the config.
//! It is built once and only read afterwards, so it can be shared freely
//! between concurrent callers.
//!
//! Operations never return errors. A failing remote call is logged and
//! contributes nothing; only [`Catalog::list_playlists`] reports total
//! unavailability, as `None`.

use std::sync::Arc;

use tracing::{debug, error, warn};

use crate::api::{
    MusicProvider, NoRelatedVideos, NoopLoader, PooledProvider, RelatedVideosSource, VideoLoader,
};
use crate::config::CatalogConfig;
use crate::converters::{self, parse_records, Fallback};
use crate::dispatch::{dispatch, fan_out, Query};
use crate::error::Result;
use crate::fallback::{at_least, fetch_with_fallback};
use crate::models::{
    common::primary_artist, AlbumHit, AlbumTrack, CanonicalEnvelope, CanonicalItem,
    PlaylistSummary, PlaylistTrack, RawRecord, SearchAlbum,
};

/// Channel title reported for the anonymous account's own library.
pub const UNKNOWN_CHANNEL: &str = "unknown";

/// A fetched playlist or album: its summary plus normalized tracks.
struct Container {
    summary: PlaylistSummary,
    tracks: Vec<CanonicalItem>,
}

/// Catalog operation context.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use ytm_catalog::{config::{CatalogConfig, SessionConfig}, Catalog, YtMusicApi};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let api = YtMusicApi::new(&SessionConfig::default())?;
///     let catalog = Catalog::new(Arc::new(api), CatalogConfig::default())
///         .bootstrap()
///         .await;
///
///     let found = catalog.search("daft punk").await;
///     println!("{}", serde_json::to_string_pretty(&found)?);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Catalog {
    provider: Arc<PooledProvider>,
    related: Arc<dyn RelatedVideosSource>,
    loader: Arc<dyn VideoLoader>,
    own_channel_id: Option<String>,
    config: CatalogConfig,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("provider", &self.provider)
            .field("own_channel_id", &self.own_channel_id)
            .field("config", &self.config)
            .finish()
    }
}

impl Catalog {
    /// Create a catalog over `provider`, bounded by `config.max_workers`.
    ///
    /// Starts without a secondary related source, with a no-op loader and
    /// with no known own channel id.
    pub fn new(provider: Arc<dyn MusicProvider>, config: CatalogConfig) -> Self {
        Self {
            provider: Arc::new(PooledProvider::new(provider, config.max_workers)),
            related: Arc::new(NoRelatedVideos),
            loader: Arc::new(NoopLoader),
            own_channel_id: None,
            config,
        }
    }

    /// Use `related` when the watch context comes back short.
    pub fn with_related_source(mut self, related: Arc<dyn RelatedVideosSource>) -> Self {
        self.related = related;
        self
    }

    /// Hand prefetch work to `loader`.
    pub fn with_loader(mut self, loader: Arc<dyn VideoLoader>) -> Self {
        self.loader = loader;
        self
    }

    /// Set the account's own channel id directly.
    pub fn with_own_channel_id<S: Into<String>>(mut self, channel_id: Option<S>) -> Self {
        self.own_channel_id = channel_id.map(Into::into);
        self
    }

    /// Ask the provider for the account's own channel id.
    ///
    /// A failure is logged and leaves the id unknown, so every channel is
    /// then treated as someone else's.
    pub async fn bootstrap(mut self) -> Self {
        match self.provider.own_channel_id().await {
            Ok(channel_id) => {
                debug!(?channel_id, "resolved own channel id");
                self.own_channel_id = channel_id;
            }
            Err(e) => {
                error!("Could not resolve own channel id: {}", e);
                self.own_channel_id = None;
            }
        }
        self
    }

    pub fn own_channel_id(&self) -> Option<&str> {
        self.own_channel_id.as_deref()
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    // ==================
    // SEARCH
    // ==================

    /// Search songs and albums concurrently.
    ///
    /// Each query is capped at `search_results`. Album hits are expanded
    /// with their detail (track count and listing); a hit whose detail
    /// fetch fails is dropped on its own.
    pub async fn search(&self, term: &str) -> CanonicalEnvelope {
        let queries = vec![
            Query::new(format!("search_songs({})", term), self.search_songs(term)),
            Query::new(format!("search_albums({})", term), self.search_albums(term)),
        ];

        dispatch(queries, self.config.search_results).await
    }

    async fn search_songs(&self, term: &str) -> Result<Vec<CanonicalItem>> {
        debug!(term, "search triggered: songs");
        let songs = self
            .provider
            .search_songs(term, self.config.search_results)
            .await?;

        let fallback = Fallback::default();
        Ok(songs
            .into_iter()
            .map(|song| converters::normalize(RawRecord::SearchSong(song), &fallback))
            .collect())
    }

    async fn search_albums(&self, term: &str) -> Result<Vec<CanonicalItem>> {
        debug!(term, "search triggered: albums");
        let hits = self
            .provider
            .search_albums(term, self.config.search_results)
            .await?;

        Ok(fan_out(
            "search_albums",
            hits,
            |hit| hit.browse_id.clone(),
            |hit| self.expand_album_hit(hit),
        )
        .await)
    }

    async fn expand_album_hit(&self, hit: AlbumHit) -> Result<CanonicalItem> {
        debug!(browse_id = hit.browse_id.as_str(), "get_album triggered: search");
        let detail = self.provider.get_album(&hit.browse_id).await?;
        Ok(converters::normalize(
            RawRecord::SearchAlbum(SearchAlbum { hit, detail }),
            &Fallback::default(),
        ))
    }

    // ==================
    // RELATED VIDEOS
    // ==================

    /// Tracks related to `video_id`.
    ///
    /// When the provider's watch context has fewer than `related_threshold`
    /// tracks, the secondary source is asked and the watch-context tracks
    /// are placed first. The queried video itself may appear in the
    /// secondary part; it is not filtered out.
    pub async fn list_related_videos(&self, video_id: &str) -> CanonicalEnvelope {
        let related = Arc::clone(&self.related);
        fetch_with_fallback(
            "list_related_videos",
            video_id,
            self.watch_context(video_id),
            move || async move { related.list(video_id).await },
            at_least(self.config.related_threshold),
        )
        .await
    }

    async fn watch_context(&self, video_id: &str) -> Result<CanonicalEnvelope> {
        debug!(video_id, "get_watch_playlist triggered: list_related_videos");
        let watch = self.provider.get_watch_playlist(video_id).await?;

        let fallback = Fallback::default();
        let items = parse_records::<PlaylistTrack>(&watch.tracks, "watch")
            .into_iter()
            .map(|track| converters::normalize(RawRecord::PlaylistTrack(track), &fallback))
            .collect::<Vec<_>>();

        Ok(CanonicalEnvelope::new(items))
    }

    // ==================
    // CHANNEL PLAYLISTS
    // ==================

    /// Playlists of a channel.
    ///
    /// `None` or the account's own channel id lists the account library,
    /// private playlists included, and degrades to the public listing when
    /// that fails. Any other channel only ever gets the public listing.
    pub async fn list_channel_playlists(&self, channel_id: Option<&str>) -> CanonicalEnvelope {
        let listing = match channel_id {
            Some(id) if !self.is_own_channel(id) => self.public_playlists(id).await,
            _ => self.own_playlists(channel_id).await,
        };

        match listing {
            Ok((summaries, channel_title)) => {
                let fallback = Fallback::channel_title(channel_title);
                summaries
                    .into_iter()
                    .map(|summary| {
                        converters::normalize(RawRecord::PlaylistSummary(summary), &fallback)
                    })
                    .collect::<Vec<_>>()
                    .into()
            }
            Err(e) => {
                warn!(
                    operation = "list_channel_playlists",
                    channel_id = channel_id.unwrap_or("<own>"),
                    error = %e,
                    "listing failed"
                );
                CanonicalEnvelope::empty()
            }
        }
    }

    fn is_own_channel(&self, channel_id: &str) -> bool {
        self.own_channel_id.as_deref() == Some(channel_id)
    }

    async fn own_playlists(
        &self,
        channel_id: Option<&str>,
    ) -> Result<(Vec<PlaylistSummary>, String)> {
        match self.library_playlists(channel_id).await {
            Ok(listing) => Ok(listing),
            Err(e) => {
                debug!(error = %e, "library listing failed, trying public listing");
                match channel_id {
                    Some(id) => self.public_playlists(id).await,
                    None => Err(e),
                }
            }
        }
    }

    async fn library_playlists(
        &self,
        channel_id: Option<&str>,
    ) -> Result<(Vec<PlaylistSummary>, String)> {
        debug!("get_library_playlists triggered: list_channel_playlists");
        let summaries = self.provider.get_library_playlists().await?;

        let channel_title = match channel_id {
            Some(id) => {
                debug!(channel_id = id, "get_user triggered: list_channel_playlists");
                self.provider.get_user(id).await?.name
            }
            None => UNKNOWN_CHANNEL.to_string(),
        };

        Ok((summaries, channel_title))
    }

    async fn public_playlists(&self, channel_id: &str) -> Result<(Vec<PlaylistSummary>, String)> {
        debug!(channel_id, "get_user triggered: list_channel_playlists");
        let user = self.provider.get_user(channel_id).await?;
        let summaries = parse_records(user.playlist_results(), channel_id);
        Ok((summaries, user.name))
    }

    // ==================
    // PLAYLISTS
    // ==================

    /// Summaries of the given playlists and albums, fetched concurrently.
    ///
    /// Ids whose fetch fails are left out. Returns `None` when ids were
    /// requested but none could be fetched, and an empty envelope when no
    /// ids were requested.
    ///
    /// The tracks of every fetched container are handed to the video loader
    /// on a background task when `prefetch_tracks` is set.
    pub async fn list_playlists<S: AsRef<str>>(&self, ids: &[S]) -> Option<CanonicalEnvelope> {
        if ids.is_empty() {
            return Some(CanonicalEnvelope::empty());
        }

        let containers = fan_out(
            "list_playlists",
            ids.iter().map(|id| id.as_ref()),
            |id| id.to_string(),
            |id| self.fetch_container(id),
        )
        .await;

        if containers.is_empty() {
            let requested: Vec<&str> = ids.iter().map(|id| id.as_ref()).collect();
            debug!(?requested, "list_playlists returned no results");
            return None;
        }

        let fallback = Fallback::default();
        let mut tracks = Vec::new();
        let mut items = Vec::with_capacity(containers.len());
        for container in containers {
            if self.config.prefetch_tracks {
                tracks.extend(container.tracks);
            }
            items.push(converters::normalize(
                RawRecord::PlaylistSummary(container.summary),
                &fallback,
            ));
        }

        if !tracks.is_empty() {
            self.prefetch(tracks);
        }

        Some(CanonicalEnvelope::new(items))
    }

    /// Start loading playback metadata for `items` without waiting.
    fn prefetch(&self, items: Vec<CanonicalItem>) {
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            warn!("no async runtime, skipping track prefetch");
            return;
        };

        let loader = Arc::clone(&self.loader);
        let count = items.len();
        runtime.spawn(async move {
            if let Err(e) = loader.load(items).await {
                warn!(count, error = %e, "track prefetch failed");
            }
        });
    }

    // ==================
    // PLAYLIST ITEMS
    // ==================

    /// Tracks of a playlist (ids with the playlist prefix) or an album
    /// (anything else).
    ///
    /// Tracks without their own thumbnail get the container's. Album tracks
    /// without credits get the album artist.
    pub async fn list_playlist_items(&self, id: &str) -> CanonicalEnvelope {
        match self.fetch_container(id).await {
            Ok(container) => CanonicalEnvelope::new(container.tracks),
            Err(e) => {
                warn!(operation = "list_playlist_items", id, error = %e, "fetch failed");
                CanonicalEnvelope::empty()
            }
        }
    }

    fn is_playlist_id(&self, id: &str) -> bool {
        id.starts_with(&self.config.playlist_prefix)
    }

    async fn fetch_container(&self, id: &str) -> Result<Container> {
        if self.is_playlist_id(id) {
            debug!(id, "get_playlist triggered");
            let detail = self.provider.get_playlist(id).await?;

            let fallback = Fallback::thumbnail(detail.thumbnails.last().cloned());
            let tracks = parse_records::<PlaylistTrack>(&detail.tracks, id)
                .into_iter()
                .map(|track| converters::normalize(RawRecord::PlaylistTrack(track), &fallback))
                .collect();

            Ok(Container {
                summary: detail.to_summary(id),
                tracks,
            })
        } else {
            debug!(id, "get_album triggered");
            let detail = self.provider.get_album(id).await?;

            let fallback = Fallback::new(
                detail.thumbnails.last().cloned(),
                primary_artist(&detail.artists).map(str::to_string),
            );
            let tracks = parse_records::<AlbumTrack>(&detail.tracks, id)
                .into_iter()
                .map(|track| converters::normalize(RawRecord::AlbumTrack(track), &fallback))
                .collect();

            Ok(Container {
                summary: detail.to_summary(id),
                tracks,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::{json, Value};
    use tokio::sync::mpsc;
    use tokio_test::assert_ok;
    use tracing_subscriber::EnvFilter;

    use crate::error::CatalogError;
    use crate::models::{
        AlbumDetail, ItemKind, PlaylistDetail, SearchSong, Thumbnail, UserProfile, WatchPlaylist,
    };

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn parse<T: serde::de::DeserializeOwned>(value: Value) -> T {
        serde_json::from_value(value).unwrap()
    }

    fn lookup<T: Clone>(map: &HashMap<String, T>, id: &str) -> Result<T> {
        map.get(id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    /// In-memory provider with a call log.
    #[derive(Default)]
    struct FakeProvider {
        songs: Vec<SearchSong>,
        album_hits: Vec<AlbumHit>,
        albums: HashMap<String, AlbumDetail>,
        playlists: HashMap<String, PlaylistDetail>,
        library: Option<Vec<PlaylistSummary>>,
        users: HashMap<String, UserProfile>,
        watch: HashMap<String, WatchPlaylist>,
        own_channel: Option<String>,
        account_fails: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn record(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn called(&self, call: &str) -> bool {
            self.calls().iter().any(|c| c == call)
        }
    }

    #[async_trait]
    impl MusicProvider for FakeProvider {
        async fn search_songs(&self, query: &str, _limit: usize) -> Result<Vec<SearchSong>> {
            self.record(format!("search_songs:{}", query));
            Ok(self.songs.clone())
        }

        async fn search_albums(&self, query: &str, _limit: usize) -> Result<Vec<AlbumHit>> {
            self.record(format!("search_albums:{}", query));
            Ok(self.album_hits.clone())
        }

        async fn get_album(&self, browse_id: &str) -> Result<AlbumDetail> {
            self.record(format!("get_album:{}", browse_id));
            lookup(&self.albums, browse_id)
        }

        async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistDetail> {
            self.record(format!("get_playlist:{}", playlist_id));
            lookup(&self.playlists, playlist_id)
        }

        async fn get_library_playlists(&self) -> Result<Vec<PlaylistSummary>> {
            self.record("get_library_playlists".to_string());
            self.library
                .clone()
                .ok_or_else(|| CatalogError::Provider("not signed in".into()))
        }

        async fn get_user(&self, channel_id: &str) -> Result<UserProfile> {
            self.record(format!("get_user:{}", channel_id));
            lookup(&self.users, channel_id)
        }

        async fn get_watch_playlist(&self, video_id: &str) -> Result<WatchPlaylist> {
            self.record(format!("get_watch_playlist:{}", video_id));
            lookup(&self.watch, video_id)
        }

        async fn own_channel_id(&self) -> Result<Option<String>> {
            if self.account_fails {
                return Err(CatalogError::Provider("account page changed".into()));
            }
            Ok(self.own_channel.clone())
        }
    }

    struct FakeRelated {
        items: usize,
        asked: AtomicUsize,
    }

    #[async_trait]
    impl RelatedVideosSource for FakeRelated {
        async fn list(&self, _video_id: &str) -> Result<CanonicalEnvelope> {
            self.asked.fetch_add(1, Ordering::SeqCst);
            Ok((0..self.items)
                .map(|i| {
                    CanonicalItem::video(format!("rel{}", i), "Related", "Uploader", None, "PT0:02:00".into())
                })
                .collect::<Vec<_>>()
                .into())
        }
    }

    struct RecordingLoader {
        tx: mpsc::UnboundedSender<Vec<CanonicalItem>>,
    }

    #[async_trait]
    impl VideoLoader for RecordingLoader {
        async fn load(&self, items: Vec<CanonicalItem>) -> Result<()> {
            self.tx
                .send(items)
                .map_err(|_| CatalogError::Unavailable("receiver gone".into()))
        }
    }

    fn watch_tracks(n: usize) -> WatchPlaylist {
        WatchPlaylist {
            tracks: (0..n)
                .map(|i| json!({"videoId": format!("w{}", i), "title": "Next", "length": "3:05", "byline": "Band"}))
                .collect(),
        }
    }

    fn album_detail() -> AlbumDetail {
        parse(json!({
            "title": "Discovery",
            "playlistId": "OLAK5uy_disc",
            "artists": [{"name": "Daft Punk", "id": "UCdp"}],
            "thumbnails": [{"url": "small"}, {"url": "cover"}],
            "tracks": [
                {"videoId": "t1", "title": "One More Time", "lengthMs": "320000"},
                {"videoId": "t2", "title": "Aerodynamic", "duration": "3:27",
                 "artists": [{"name": "Guest"}], "thumbnails": [{"url": "own"}]}
            ]
        }))
    }

    fn playlist_detail() -> PlaylistDetail {
        parse(json!({
            "title": "Road Trip",
            "author": {"name": "Curator"},
            "trackCount": 2,
            "thumbnails": [{"url": "pl-cover"}],
            "tracks": [
                {"videoId": "p1", "title": "First", "duration": "4:00", "artists": [{"name": "A"}]},
                {"videoId": "p2", "title": "Second", "duration": "1:02:03", "artists": [{"name": "B"}]}
            ]
        }))
    }

    fn channel_page(name: &str) -> UserProfile {
        parse(json!({
            "name": name,
            "playlists": {"results": [
                {"playlistId": "PLpub1", "title": "Big One", "count": "1,234"},
                {"playlistId": "PLpub2", "title": "Small One", "count": 3}
            ]}
        }))
    }

    fn catalog(provider: Arc<FakeProvider>) -> Catalog {
        init_tracing();
        Catalog::new(provider, CatalogConfig::default())
    }

    #[tokio::test]
    async fn test_bootstrap_resolves_own_channel() {
        let provider = Arc::new(FakeProvider {
            own_channel: Some("UCme".into()),
            ..Default::default()
        });
        let catalog = catalog(provider).bootstrap().await;
        assert_eq!(catalog.own_channel_id(), Some("UCme"));
    }

    #[tokio::test]
    async fn test_bootstrap_failure_leaves_channel_unknown() {
        let provider = Arc::new(FakeProvider {
            account_fails: true,
            ..Default::default()
        });
        let catalog = catalog(provider)
            .with_own_channel_id(Some("stale"))
            .bootstrap()
            .await;
        assert_eq!(catalog.own_channel_id(), None);
    }

    #[tokio::test]
    async fn test_search_merges_songs_and_albums() {
        let provider = Arc::new(FakeProvider {
            songs: vec![
                parse(json!({"videoId": "s1", "title": "Digital Love", "duration": "4:58",
                             "artists": [{"name": "Daft Punk"}], "album": {"name": "Discovery"}})),
                parse(json!({"videoId": "s2", "title": "Voyager", "lengthMs": 227000})),
            ],
            album_hits: vec![
                parse(json!({"browseId": "MPREb_ok", "title": "Discovery", "type": "Album",
                             "artists": [{"name": "Daft Punk"}]})),
                parse(json!({"browseId": "MPREb_gone", "title": "Lost"})),
            ],
            albums: HashMap::from([("MPREb_ok".to_string(), album_detail())]),
            ..Default::default()
        });
        let catalog = catalog(provider.clone());

        let found = catalog.search("daft punk").await;
        assert_eq!(found.len(), 3);
        assert_eq!(found.next_page_token, None);

        let song = found.items.iter().find(|i| i.id == "s1").unwrap();
        assert_eq!(song.kind, ItemKind::Video);
        assert_eq!(song.duration.as_deref(), Some("PT0:04:58"));
        assert_eq!(song.channel_title, "Daft Punk");

        let untitled_artist = found.items.iter().find(|i| i.id == "s2").unwrap();
        assert_eq!(untitled_artist.duration.as_deref(), Some("PT0:03:47"));

        let album = found.items.iter().find(|i| i.id == "MPREb_ok").unwrap();
        assert_eq!(album.kind, ItemKind::Playlist);
        assert_eq!(album.item_count, Some(2));
        assert_eq!(album.extra.as_ref().and_then(|e| e.as_array()).map(|a| a.len()), Some(2));

        assert!(provider.called("get_album:MPREb_gone"));
        assert!(!found.items.iter().any(|i| i.id == "MPREb_gone"));
    }

    #[tokio::test]
    async fn test_search_caps_each_query() {
        let provider = Arc::new(FakeProvider {
            songs: (0..5)
                .map(|i| parse(json!({"videoId": format!("s{}", i), "title": "Song"})))
                .collect(),
            ..Default::default()
        });
        let config = CatalogConfig {
            search_results: 2,
            ..Default::default()
        };
        let catalog = Catalog::new(provider, config);

        let found = catalog.search("anything").await;
        let ids: Vec<&str> = found.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["s0", "s1"]);
    }

    #[tokio::test]
    async fn test_related_videos_top_up_from_secondary() {
        let provider = Arc::new(FakeProvider {
            watch: HashMap::from([("v".to_string(), watch_tracks(3))]),
            ..Default::default()
        });
        let related = Arc::new(FakeRelated {
            items: 8,
            asked: AtomicUsize::new(0),
        });
        let catalog = catalog(provider).with_related_source(related.clone());

        let result = catalog.list_related_videos("v").await;
        assert_eq!(result.len(), 11);
        assert!(result.items[..3].iter().all(|i| i.id.starts_with('w')));
        assert!(result.items[3..].iter().all(|i| i.id.starts_with("rel")));
        assert_eq!(result.items[0].channel_title, "Band");
        assert_eq!(related.asked.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_related_videos_enough_watch_tracks() {
        let provider = Arc::new(FakeProvider {
            watch: HashMap::from([("v".to_string(), watch_tracks(10))]),
            ..Default::default()
        });
        let related = Arc::new(FakeRelated {
            items: 8,
            asked: AtomicUsize::new(0),
        });
        let catalog = catalog(provider).with_related_source(related.clone());

        assert_eq!(catalog.list_related_videos("v").await.len(), 10);
        assert_eq!(related.asked.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_related_videos_watch_failure_uses_secondary() {
        let related = Arc::new(FakeRelated {
            items: 4,
            asked: AtomicUsize::new(0),
        });
        let catalog = catalog(Arc::new(FakeProvider::default())).with_related_source(related);

        assert_eq!(catalog.list_related_videos("missing").await.len(), 4);
    }

    #[tokio::test]
    async fn test_own_channel_lists_library() {
        let provider = Arc::new(FakeProvider {
            library: Some(vec![
                parse(json!({"playlistId": "PLmine", "title": "Mine", "count": "12"})),
                parse(json!({"playlistId": "LM", "title": "Liked", "artists": [{"name": "Me"}]})),
            ]),
            users: HashMap::from([("UCme".to_string(), channel_page("My Channel"))]),
            ..Default::default()
        });
        let catalog = catalog(provider.clone()).with_own_channel_id(Some("UCme"));

        let anonymous = catalog.list_channel_playlists(None).await;
        assert_eq!(anonymous.len(), 2);
        assert_eq!(anonymous.items[0].channel_title, UNKNOWN_CHANNEL);
        assert_eq!(anonymous.items[0].item_count, Some(12));
        assert_eq!(anonymous.items[1].channel_title, "Me");
        assert_eq!(anonymous.items[1].item_count, Some(1));

        let own = catalog.list_channel_playlists(Some("UCme")).await;
        assert_eq!(own.items[0].channel_title, "My Channel");
        assert_eq!(
            provider.calls(),
            vec!["get_library_playlists", "get_library_playlists", "get_user:UCme"]
        );
    }

    #[tokio::test]
    async fn test_other_channel_never_lists_library() {
        let provider = Arc::new(FakeProvider {
            library: Some(vec![parse(json!({"playlistId": "PLmine"}))]),
            users: HashMap::from([("UCother".to_string(), channel_page("Other"))]),
            ..Default::default()
        });
        let catalog = catalog(provider.clone()).with_own_channel_id(Some("UCme"));

        let listed = catalog.list_channel_playlists(Some("UCother")).await;
        assert_eq!(provider.calls(), vec!["get_user:UCother"]);
        assert_eq!(listed.len(), 2);
        assert_eq!(listed.items[0].item_count, Some(1234));
        assert_eq!(listed.items[0].channel_title, "Other");
        assert_eq!(listed.items[1].item_count, Some(3));
    }

    #[tokio::test]
    async fn test_own_library_failure_degrades_to_public_listing() {
        let provider = Arc::new(FakeProvider {
            library: None,
            users: HashMap::from([("UCme".to_string(), channel_page("My Channel"))]),
            ..Default::default()
        });
        let catalog = catalog(provider.clone()).with_own_channel_id(Some("UCme"));

        let listed = catalog.list_channel_playlists(Some("UCme")).await;
        assert_eq!(listed.len(), 2);
        assert!(provider.called("get_library_playlists"));
        assert!(provider.called("get_user:UCme"));
    }

    #[tokio::test]
    async fn test_channel_listing_failure_is_empty() {
        let catalog = catalog(Arc::new(FakeProvider::default()));
        assert!(catalog.list_channel_playlists(Some("UCnobody")).await.is_empty());
        assert!(catalog.list_channel_playlists(None).await.is_empty());
    }

    #[tokio::test]
    async fn test_list_playlists_skips_failed_ids() {
        let provider = Arc::new(FakeProvider {
            playlists: HashMap::from([("PLok".to_string(), playlist_detail())]),
            ..Default::default()
        });
        let catalog = catalog(provider);

        let listed = catalog.list_playlists(&["PLbroken", "PLok"]).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed.items[0].id, "PLok");
        assert_eq!(listed.items[0].title, "Road Trip");
        assert_eq!(listed.items[0].channel_title, "Curator");
        assert_eq!(listed.items[0].item_count, Some(2));

        assert_eq!(catalog.list_playlists(&["PLbroken"]).await, None);
        assert_eq!(
            catalog.list_playlists::<&str>(&[]).await,
            Some(CanonicalEnvelope::empty())
        );
    }

    #[tokio::test]
    async fn test_list_playlists_routes_by_prefix() {
        let provider = Arc::new(FakeProvider {
            playlists: HashMap::from([("PLok".to_string(), playlist_detail())]),
            albums: HashMap::from([("MPREb_disc".to_string(), album_detail())]),
            ..Default::default()
        });
        let catalog = catalog(provider.clone());

        let ids = vec!["MPREb_disc".to_string(), "PLok".to_string()];
        let listed = catalog.list_playlists(&ids).await.unwrap();
        let got: Vec<&str> = listed.items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(got, vec!["OLAK5uy_disc", "PLok"]);
        assert_eq!(listed.items[0].channel_title, "Daft Punk");

        let mut calls = provider.calls();
        calls.sort();
        assert_eq!(calls, vec!["get_album:MPREb_disc", "get_playlist:PLok"]);
    }

    #[tokio::test]
    async fn test_list_playlists_hands_tracks_to_loader() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let provider = Arc::new(FakeProvider {
            albums: HashMap::from([("MPREb_disc".to_string(), album_detail())]),
            ..Default::default()
        });
        let catalog = catalog(provider).with_loader(Arc::new(RecordingLoader { tx }));

        assert!(catalog.list_playlists(&["MPREb_disc"]).await.is_some());

        let loaded = assert_ok!(tokio::time::timeout(Duration::from_secs(1), rx.recv()).await)
            .expect("loader was not called");
        let ids: HashSet<&str> = loaded.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, HashSet::from(["t1", "t2"]));
    }

    #[tokio::test]
    async fn test_loader_failure_does_not_affect_result() {
        let (tx, rx) = mpsc::unbounded_channel();
        drop(rx);
        let provider = Arc::new(FakeProvider {
            playlists: HashMap::from([("PLok".to_string(), playlist_detail())]),
            ..Default::default()
        });
        let catalog = catalog(provider).with_loader(Arc::new(RecordingLoader { tx }));

        let listed = catalog.list_playlists(&["PLok"]).await;
        assert_eq!(listed.map(|e| e.len()), Some(1));
    }

    #[tokio::test]
    async fn test_album_items_inherit_cover_and_artist() {
        let provider = Arc::new(FakeProvider {
            albums: HashMap::from([("MPREb_disc".to_string(), album_detail())]),
            ..Default::default()
        });
        let catalog = catalog(provider);

        let tracks = catalog.list_playlist_items("MPREb_disc").await;
        assert_eq!(tracks.len(), 2);

        let first = &tracks.items[0];
        assert_eq!(first.duration.as_deref(), Some("PT0:05:20"));
        assert_eq!(first.channel_title, "Daft Punk");
        assert_eq!(first.thumbnail, Some(Thumbnail::from_url("cover")));

        let second = &tracks.items[1];
        assert_eq!(second.channel_title, "Guest");
        assert_eq!(second.thumbnail, Some(Thumbnail::from_url("own")));
    }

    #[tokio::test]
    async fn test_playlist_items_inherit_cover() {
        let provider = Arc::new(FakeProvider {
            playlists: HashMap::from([("PLok".to_string(), playlist_detail())]),
            ..Default::default()
        });
        let catalog = catalog(provider.clone());

        let tracks = catalog.list_playlist_items("PLok").await;
        let durations: Vec<_> = tracks.items.iter().map(|i| i.duration.clone()).collect();
        assert_eq!(
            durations,
            vec![Some("PT0:04:00".to_string()), Some("PT1:02:03".to_string())]
        );
        assert!(tracks
            .items
            .iter()
            .all(|i| i.thumbnail == Some(Thumbnail::from_url("pl-cover"))));
        assert_eq!(provider.calls(), vec!["get_playlist:PLok"]);
    }

    #[tokio::test]
    async fn test_missing_container_lists_nothing() {
        let catalog = catalog(Arc::new(FakeProvider::default()));
        assert!(catalog.list_playlist_items("PLmissing").await.is_empty());
        assert!(catalog.list_playlist_items("MPREb_missing").await.is_empty());
    }

    #[tokio::test]
    async fn test_album_tracks_with_null_fields_are_kept() {
        let album: AlbumDetail = parse(json!({
            "title": "Sparse",
            "artists": [{"name": "Band"}],
            "thumbnails": [{"url": "cover"}],
            "tracks": [
                {"videoId": "n1", "title": "One", "duration": "1:00", "thumbnails": null},
                {"videoId": "n2", "title": "Two", "duration": "2:00", "artists": null},
                {"videoId": "n3", "title": null, "duration": "3:00"}
            ]
        }));
        let provider = Arc::new(FakeProvider {
            albums: HashMap::from([("MPREb_sparse".to_string(), album)]),
            ..Default::default()
        });
        let catalog = catalog(provider);

        let tracks = catalog.list_playlist_items("MPREb_sparse").await;
        assert_eq!(tracks.len(), 3);
        assert!(tracks
            .items
            .iter()
            .all(|i| i.thumbnail == Some(Thumbnail::from_url("cover")) && i.channel_title == "Band"));
        assert_eq!(tracks.items[2].title, crate::converters::UNKNOWN_TITLE);
    }
}
