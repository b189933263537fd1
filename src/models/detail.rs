//! Provider detail responses: album, playlist, user, watch context.
//!
//! Track listings stay as raw JSON so they can be handed through as an
//! item's `extra` payload untouched and parsed record by record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::{ArtistRef, Thumbnail};
use super::null_default;
use super::raw::{Credits, PlaylistSummary, RawCount};

/// Album hit from an `albums`-filtered search.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumHit {
    pub browse_id: String,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub title: String,

    /// Release type ("Album", "Single", "EP").
    #[serde(rename = "type", default)]
    pub album_type: Option<String>,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub artists: Vec<ArtistRef>,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub thumbnails: Vec<Thumbnail>,
}

/// Full album detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AlbumDetail {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub title: String,

    /// Audio playlist id backing the album.
    #[serde(default)]
    pub playlist_id: Option<String>,

    #[serde(default)]
    pub track_count: Option<u64>,

    /// Older responses name this `artist`.
    #[serde(default, deserialize_with = "null_default::deserialize", alias = "artist")]
    pub artists: Vec<ArtistRef>,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub thumbnails: Vec<Thumbnail>,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub tracks: Vec<Value>,
}

impl AlbumDetail {
    /// Number of tracks, preferring the reported count.
    pub fn track_total(&self) -> u64 {
        self.track_count.unwrap_or(self.tracks.len() as u64)
    }

    /// Summary record for this album, keyed by its audio playlist id when
    /// the provider sent one and by `browse_id` otherwise.
    pub fn to_summary(&self, browse_id: &str) -> PlaylistSummary {
        PlaylistSummary {
            playlist_id: self
                .playlist_id
                .clone()
                .unwrap_or_else(|| browse_id.to_string()),
            title: self.title.clone(),
            count: Some(RawCount::Number(self.track_total())),
            credits: Credits {
                artists: self.artists.clone(),
                byline: None,
            },
            thumbnails: self.thumbnails.clone(),
        }
    }
}

/// Full playlist detail.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlaylistDetail {
    #[serde(default)]
    pub id: Option<String>,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub title: String,

    #[serde(default)]
    pub author: Option<ArtistRef>,

    #[serde(default)]
    pub track_count: Option<u64>,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub thumbnails: Vec<Thumbnail>,

    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub tracks: Vec<Value>,
}

impl PlaylistDetail {
    /// Summary record for this playlist; the author becomes the credit.
    pub fn to_summary(&self, playlist_id: &str) -> PlaylistSummary {
        PlaylistSummary {
            playlist_id: self.id.clone().unwrap_or_else(|| playlist_id.to_string()),
            title: self.title.clone(),
            count: Some(RawCount::Number(
                self.track_count.unwrap_or(self.tracks.len() as u64),
            )),
            credits: Credits {
                artists: self.author.iter().cloned().collect(),
                byline: None,
            },
            thumbnails: self.thumbnails.clone(),
        }
    }
}

/// Playlist shelf on a user page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserPlaylists {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub results: Vec<Value>,
}

/// Public user/channel page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub name: String,

    #[serde(default)]
    pub playlists: Option<UserPlaylists>,
}

impl UserProfile {
    /// Raw playlist entries, empty when the page has no playlist shelf.
    pub fn playlist_results(&self) -> &[Value] {
        self.playlists
            .as_ref()
            .map(|p| p.results.as_slice())
            .unwrap_or_default()
    }
}

/// "Watch next" context for a video.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WatchPlaylist {
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub tracks: Vec<Value>,
}
