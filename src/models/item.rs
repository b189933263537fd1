//! Canonical item and envelope models.
//!
//! These are the provider-agnostic shapes every catalog operation returns.
//! Items are built once by the normalizer and never mutated afterwards.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::common::Thumbnail;

/// Kind tag of a canonical item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    /// A single playable track.
    Video,
    /// A playlist or album container.
    Playlist,
}

/// Normalized, provider-agnostic catalog record.
///
/// Build with [`CanonicalItem::video`] or [`CanonicalItem::playlist`], which
/// keep `duration` and `item_count` tied to the right kind.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalItem {
    /// Item kind.
    pub kind: ItemKind,

    /// Opaque identifier, unique within its kind.
    pub id: String,

    /// Display title.
    pub title: String,

    /// Uploader, artist or collection owner.
    pub channel_title: String,

    /// Representative image.
    pub thumbnail: Option<Thumbnail>,

    /// Canonical duration string (videos only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,

    /// Number of entries (playlists only).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub item_count: Option<u64>,

    /// Provider payload passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<Value>,
}

impl CanonicalItem {
    /// Create a video item.
    pub fn video<S1, S2, S3>(
        id: S1,
        title: S2,
        channel_title: S3,
        thumbnail: Option<Thumbnail>,
        duration: String,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            kind: ItemKind::Video,
            id: id.into(),
            title: title.into(),
            channel_title: channel_title.into(),
            thumbnail,
            duration: Some(duration),
            item_count: None,
            extra: None,
        }
    }

    /// Create a playlist item.
    pub fn playlist<S1, S2, S3>(
        id: S1,
        title: S2,
        channel_title: S3,
        thumbnail: Option<Thumbnail>,
        item_count: u64,
    ) -> Self
    where
        S1: Into<String>,
        S2: Into<String>,
        S3: Into<String>,
    {
        Self {
            kind: ItemKind::Playlist,
            id: id.into(),
            title: title.into(),
            channel_title: channel_title.into(),
            thumbnail,
            duration: None,
            item_count: Some(item_count),
            extra: None,
        }
    }

    /// Attach a provider payload.
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = Some(extra);
        self
    }

    pub fn is_video(&self) -> bool {
        self.kind == ItemKind::Video
    }
}

/// Response wrapper returned by every catalog operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CanonicalEnvelope {
    /// Pagination token. Always `None`: upstream paging is not implemented.
    pub next_page_token: Option<String>,

    /// Items in response order.
    pub items: Vec<CanonicalItem>,
}

impl CanonicalEnvelope {
    /// Wrap items without a pagination token.
    pub fn new(items: Vec<CanonicalItem>) -> Self {
        Self {
            next_page_token: None,
            items,
        }
    }

    /// An envelope with no items.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<Vec<CanonicalItem>> for CanonicalEnvelope {
    fn from(items: Vec<CanonicalItem>) -> Self {
        Self::new(items)
    }
}
