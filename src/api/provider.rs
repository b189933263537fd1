//! Collaborator interfaces the catalog calls.
//!
//! - [`MusicProvider`]: the metadata provider (search, details, listings)
//! - [`RelatedVideosSource`]: secondary source for related videos
//! - [`VideoLoader`]: background prefetch of playback metadata

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{
    AlbumDetail, AlbumHit, CanonicalEnvelope, CanonicalItem, PlaylistDetail, PlaylistSummary,
    SearchSong, UserProfile, WatchPlaylist,
};

/// Metadata provider client.
///
/// Implementations must be safe to share between concurrently running
/// tasks; the catalog only ever reads through them.
#[async_trait]
pub trait MusicProvider: Send + Sync {
    /// Keyword search restricted to songs.
    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SearchSong>>;

    /// Keyword search restricted to albums.
    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<AlbumHit>>;

    /// Album detail by browse id.
    async fn get_album(&self, browse_id: &str) -> Result<AlbumDetail>;

    /// Playlist detail by playlist id.
    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistDetail>;

    /// Playlists of the authenticated account, private ones included.
    async fn get_library_playlists(&self) -> Result<Vec<PlaylistSummary>>;

    /// Public page of a user or channel.
    async fn get_user(&self, channel_id: &str) -> Result<UserProfile>;

    /// "Watch next" tracks for a video.
    async fn get_watch_playlist(&self, video_id: &str) -> Result<WatchPlaylist>;

    /// Channel id of the authenticated account, `None` when anonymous.
    async fn own_channel_id(&self) -> Result<Option<String>>;
}

/// Secondary source of related videos, used when the provider's watch
/// context comes back too short.
#[async_trait]
pub trait RelatedVideosSource: Send + Sync {
    async fn list(&self, video_id: &str) -> Result<CanonicalEnvelope>;
}

/// Prefetches playback metadata for items a caller is likely to play.
#[async_trait]
pub trait VideoLoader: Send + Sync {
    async fn load(&self, items: Vec<CanonicalItem>) -> Result<()>;
}

/// Loader that does nothing, for callers without a metadata cache.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLoader;

#[async_trait]
impl VideoLoader for NoopLoader {
    async fn load(&self, _items: Vec<CanonicalItem>) -> Result<()> {
        Ok(())
    }
}

/// Related-videos source that never has anything to add.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRelatedVideos;

#[async_trait]
impl RelatedVideosSource for NoRelatedVideos {
    async fn list(&self, _video_id: &str) -> Result<CanonicalEnvelope> {
        Ok(CanonicalEnvelope::empty())
    }
}
