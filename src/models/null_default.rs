//! Serde helper reading an explicit `null` as the field's default.
//!
//! `#[serde(default)]` only covers a missing key; the provider also sends
//! `null` for empty titles, artist lists and thumbnail lists.
//!
//! ```rust,ignore
//! #[serde(default, deserialize_with = "crate::models::null_default::deserialize")]
//! pub thumbnails: Vec<Thumbnail>,
//! ```

use serde::{Deserialize, Deserializer};

/// Deserialize `T`, mapping `null` to `T::default()`.
pub fn deserialize<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
