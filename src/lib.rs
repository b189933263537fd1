//! # ytm-catalog
//!
//! Catalog browsing over YouTube Music metadata: search, related videos,
//! channel playlists, playlist summaries and playlist tracks, all returned
//! in one canonical item shape.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use ytm_catalog::{config::{CatalogConfig, SessionConfig}, Catalog, YtMusicApi};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Anonymous session against a local gateway
//!     let api = YtMusicApi::new(&SessionConfig::default())?;
//!     let catalog = Catalog::new(Arc::new(api), CatalogConfig::from_env())
//!         .bootstrap()
//!         .await;
//!
//!     // Songs and albums, searched concurrently
//!     let found = catalog.search("daft punk").await;
//!     println!("{} items", found.len());
//!
//!     // Tracks of an album
//!     let tracks = catalog.list_playlist_items("MPREb_4pL8gzRtw1p").await;
//!     println!("{} tracks", tracks.len());
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Layers
//!
//! - [`Catalog`] - the public operations
//! - [`dispatch`] and [`fallback`] - concurrent and fallback-aware fetching
//! - [`converters`] - raw provider records to [`CanonicalItem`]
//! - [`api`] - the provider interface and its HTTP client
//!
//! Operations never fail. Remote errors are logged through `tracing` and
//! the affected query contributes nothing; data-quality substitutions are
//! logged under the `ytm_catalog::data_quality` target.

pub mod api;
mod catalog;
pub mod config;
pub mod converters;
pub mod dispatch;
pub mod error;
pub mod fallback;
pub mod models;

// Main interface (recommended)
pub use catalog::{Catalog, UNKNOWN_CHANNEL};

// Provider layer
pub use api::{
    MusicProvider, NoRelatedVideos, NoopLoader, PooledProvider, RelatedVideosSource,
    VideoLoader, YtMusicApi,
};
pub use error::{CatalogError, Result};
pub use models::{CanonicalEnvelope, CanonicalItem, ItemKind};
