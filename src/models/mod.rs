//! Data models for provider responses and canonical output.
//!
//! Raw records and detail responses mirror what the provider sends;
//! canonical items and envelopes are what catalog operations return.

pub mod common;
pub mod detail;
pub mod item;
pub mod null_default;
pub mod raw;

// Re-exports for convenience
pub use common::{ArtistRef, Thumbnail};
pub use detail::{AlbumDetail, AlbumHit, PlaylistDetail, UserProfile, WatchPlaylist};
pub use item::{CanonicalEnvelope, CanonicalItem, ItemKind};
pub use raw::{
    AlbumTrack, Credits, DurationFields, PlaylistSummary, PlaylistTrack, RawCount, RawRecord,
    SearchAlbum, SearchSong,
};
