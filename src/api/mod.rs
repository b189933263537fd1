//! Provider clients.
//!
//! - [`MusicProvider`]: the provider interface every operation calls
//! - [`YtMusicApi`]: HTTP client for the metadata gateway
//! - [`PooledProvider`]: bounds concurrent outbound calls to any provider

pub mod gateway;
pub mod pooled;
pub mod provider;

pub use gateway::{SearchFilter, YtMusicApi};
pub use pooled::PooledProvider;
pub use provider::{MusicProvider, NoRelatedVideos, NoopLoader, RelatedVideosSource, VideoLoader};
