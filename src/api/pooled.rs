//! Bounded worker pool around a provider.
//!
//! Every outbound call holds one permit for its whole duration, so the pool
//! size caps concurrent remote calls no matter how deeply operations nest
//! their fan-outs.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Semaphore;

use crate::api::provider::MusicProvider;
use crate::error::{CatalogError, Result};
use crate::models::{
    AlbumDetail, AlbumHit, PlaylistDetail, PlaylistSummary, SearchSong, UserProfile,
    WatchPlaylist,
};

/// Provider decorator admitting at most `max_workers` calls at once.
pub struct PooledProvider {
    inner: Arc<dyn MusicProvider>,
    permits: Semaphore,
    max_workers: usize,
}

impl PooledProvider {
    /// Wrap `inner`. A pool size of zero is raised to one.
    pub fn new(inner: Arc<dyn MusicProvider>, max_workers: usize) -> Self {
        let max_workers = max_workers.max(1);
        Self {
            inner,
            permits: Semaphore::new(max_workers),
            max_workers,
        }
    }

    pub fn max_workers(&self) -> usize {
        self.max_workers
    }

    /// Permits not currently held by an in-flight call.
    pub fn idle_workers(&self) -> usize {
        self.permits.available_permits()
    }

    async fn admit(&self) -> Result<tokio::sync::SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|_| CatalogError::PoolClosed)
    }
}

impl std::fmt::Debug for PooledProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PooledProvider")
            .field("max_workers", &self.max_workers)
            .field("idle_workers", &self.idle_workers())
            .finish()
    }
}

#[async_trait]
impl MusicProvider for PooledProvider {
    async fn search_songs(&self, query: &str, limit: usize) -> Result<Vec<SearchSong>> {
        let _permit = self.admit().await?;
        self.inner.search_songs(query, limit).await
    }

    async fn search_albums(&self, query: &str, limit: usize) -> Result<Vec<AlbumHit>> {
        let _permit = self.admit().await?;
        self.inner.search_albums(query, limit).await
    }

    async fn get_album(&self, browse_id: &str) -> Result<AlbumDetail> {
        let _permit = self.admit().await?;
        self.inner.get_album(browse_id).await
    }

    async fn get_playlist(&self, playlist_id: &str) -> Result<PlaylistDetail> {
        let _permit = self.admit().await?;
        self.inner.get_playlist(playlist_id).await
    }

    async fn get_library_playlists(&self) -> Result<Vec<PlaylistSummary>> {
        let _permit = self.admit().await?;
        self.inner.get_library_playlists().await
    }

    async fn get_user(&self, channel_id: &str) -> Result<UserProfile> {
        let _permit = self.admit().await?;
        self.inner.get_user(channel_id).await
    }

    async fn get_watch_playlist(&self, video_id: &str) -> Result<WatchPlaylist> {
        let _permit = self.admit().await?;
        self.inner.get_watch_playlist(video_id).await
    }

    async fn own_channel_id(&self) -> Result<Option<String>> {
        let _permit = self.admit().await?;
        self.inner.own_channel_id().await
    }
}
