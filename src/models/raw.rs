//! Provider-native records.
//!
//! Each struct mirrors one record shape the provider hands back. The shapes
//! share concepts (duration, artist, thumbnail) but not field names, so the
//! caller that knows which call produced a record wraps it in the matching
//! [`RawRecord`] variant before normalizing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{ArtistRef, Thumbnail};
use super::detail::{AlbumDetail, AlbumHit};
use super::null_default;

/// Every spelling of a track duration the provider uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DurationFields {
    /// Clock string, e.g. `"3:35"`.
    #[serde(default)]
    pub duration: Option<String>,

    /// Clock string under the older key.
    #[serde(default)]
    pub length: Option<String>,

    /// Milliseconds, as a number or a numeric string.
    #[serde(default)]
    pub length_ms: Option<Value>,
}

/// Artist attribution: either a structured list or a free-text byline.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Credits {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub artists: Vec<ArtistRef>,

    #[serde(default)]
    pub byline: Option<String>,
}

/// Song hit from a `songs`-filtered search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SearchSong {
    pub video_id: String,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub title: String,

    #[serde(flatten)]
    pub durations: DurationFields,

    #[serde(flatten)]
    pub credits: Credits,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub thumbnails: Vec<Thumbnail>,

    /// Album reference, kept opaque.
    #[serde(default)]
    pub album: Option<Value>,
}

/// Album search hit joined with its fetched detail.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchAlbum {
    pub hit: AlbumHit,
    pub detail: AlbumDetail,
}

/// Track inside a playlist or a watch context.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistTrack {
    pub video_id: String,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub title: String,

    #[serde(flatten)]
    pub durations: DurationFields,

    #[serde(flatten)]
    pub credits: Credits,

    /// Watch contexts call this list `thumbnail`.
    #[serde(default, deserialize_with = "null_default::deserialize", alias = "thumbnail")]
    pub thumbnails: Vec<Thumbnail>,
}

/// Track inside an album detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumTrack {
    pub video_id: String,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub title: String,

    #[serde(flatten)]
    pub durations: DurationFields,

    #[serde(flatten)]
    pub credits: Credits,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub thumbnails: Vec<Thumbnail>,
}

/// Item count as the provider reports it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RawCount {
    Number(u64),
    /// Display text, possibly with thousands separators (`"1,234"`).
    Text(String),
}

/// Playlist entry from a library or channel listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistSummary {
    pub playlist_id: String,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub title: String,

    #[serde(default)]
    pub count: Option<RawCount>,

    #[serde(flatten)]
    pub credits: Credits,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub thumbnails: Vec<Thumbnail>,
}

/// One provider record, tagged by the call that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum RawRecord {
    SearchSong(SearchSong),
    SearchAlbum(SearchAlbum),
    PlaylistTrack(PlaylistTrack),
    AlbumTrack(AlbumTrack),
    PlaylistSummary(PlaylistSummary),
}

impl RawRecord {
    /// Short variant name for log context.
    pub fn variant(&self) -> &'static str {
        match self {
            RawRecord::SearchSong(_) => "search-song",
            RawRecord::SearchAlbum(_) => "search-album",
            RawRecord::PlaylistTrack(_) => "playlist-track",
            RawRecord::AlbumTrack(_) => "album-track",
            RawRecord::PlaylistSummary(_) => "playlist-summary",
        }
    }
}
