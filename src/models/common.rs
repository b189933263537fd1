//! Common types shared across raw and canonical models.

use serde::{Deserialize, Serialize};

use super::null_default;

/// Image reference with optional dimensions.
///
/// Used both for the provider's thumbnail lists and for the single
/// thumbnail carried by a canonical item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Thumbnail {
    /// URL to the image.
    pub url: String,

    /// Width in pixels, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,

    /// Height in pixels, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Thumbnail {
    /// Create a thumbnail with known dimensions.
    pub fn new<S: Into<String>>(url: S, width: u32, height: u32) -> Self {
        Self {
            url: url.into(),
            width: Some(width),
            height: Some(height),
        }
    }

    /// Create a thumbnail from a bare URL.
    pub fn from_url<S: Into<String>>(url: S) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }
}

/// Artist reference as it appears inside provider records.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ArtistRef {
    /// Display name.
    #[serde(default, deserialize_with = "null_default::deserialize")]
    pub name: String,

    /// Channel or browse id, when the provider links one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ArtistRef {
    /// Create an artist reference with a name only.
    pub fn named<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            id: None,
        }
    }
}

/// The first non-empty artist name in a list.
pub fn primary_artist(artists: &[ArtistRef]) -> Option<&str> {
    artists
        .first()
        .map(|a| a.name.as_str())
        .filter(|name| !name.is_empty())
}
