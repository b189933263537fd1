//! Raw record to canonical item converters.
//!
//! One function per [`RawRecord`] variant. Every function is total: absent
//! or malformed optional fields fall back in a fixed order and the
//! substitution is logged as a data-quality event.
//!
//! | concept       | resolution order                                        |
//! |---------------|---------------------------------------------------------|
//! | duration      | `duration`, `length`, `lengthMs`, zero                  |
//! | channel title | first artist, `byline`, caller fallback                 |
//! | thumbnail     | last entry of the record's list, caller fallback        |

pub mod duration;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, trace, warn};

use crate::models::{
    common::primary_artist, AlbumTrack, CanonicalItem, Credits, DurationFields, PlaylistSummary,
    PlaylistTrack, RawCount, RawRecord, SearchAlbum, SearchSong, Thumbnail,
};

use self::duration::DurationSource;

/// Title used when the provider sends none.
pub const UNKNOWN_TITLE: &str = "Unknown";

/// Item count assumed for a playlist entry that reports none.
pub const DEFAULT_ITEM_COUNT: u64 = 1;

/// Values the caller knows from the surrounding container.
#[derive(Debug, Clone, Default)]
pub struct Fallback {
    /// Used when the record has no thumbnail of its own.
    pub thumbnail: Option<Thumbnail>,
    /// Used when the record has no artist and no byline.
    pub channel_title: Option<String>,
}

impl Fallback {
    pub fn new(thumbnail: Option<Thumbnail>, channel_title: Option<String>) -> Self {
        Self {
            thumbnail,
            channel_title,
        }
    }

    pub fn thumbnail(thumbnail: Option<Thumbnail>) -> Self {
        Self {
            thumbnail,
            channel_title: None,
        }
    }

    pub fn channel_title<S: Into<String>>(channel_title: S) -> Self {
        Self {
            thumbnail: None,
            channel_title: Some(channel_title.into()),
        }
    }
}

/// Normalize any raw record.
pub fn normalize(record: RawRecord, fallback: &Fallback) -> CanonicalItem {
    trace!(variant = record.variant(), "normalizing record");
    match record {
        RawRecord::SearchSong(song) => normalize_search_song(song, fallback),
        RawRecord::SearchAlbum(album) => normalize_search_album(album, fallback),
        RawRecord::PlaylistTrack(track) => normalize_playlist_track(track, fallback),
        RawRecord::AlbumTrack(track) => normalize_album_track(track, fallback),
        RawRecord::PlaylistSummary(summary) => normalize_playlist_summary(summary, fallback),
    }
}

/// Song search hit to video. Album and artist list ride along in `extra`.
pub fn normalize_search_song(song: SearchSong, fallback: &Fallback) -> CanonicalItem {
    let duration = resolve_duration(&song.durations, &song.video_id);
    let channel_title = resolve_channel_title(&song.credits, fallback, &song.video_id);
    let thumbnail = resolve_thumbnail(&song.thumbnails, fallback);
    let title = resolve_title(song.title, &song.video_id);

    let extra = serde_json::json!({
        "album": song.album,
        "artists": song.credits.artists,
    });

    CanonicalItem::video(song.video_id, title, channel_title, thumbnail, duration).with_extra(extra)
}

/// Album search hit plus detail to playlist. The track listing rides along
/// in `extra` exactly as the provider sent it.
pub fn normalize_search_album(album: SearchAlbum, fallback: &Fallback) -> CanonicalItem {
    let SearchAlbum { hit, detail } = album;

    let channel_title = match primary_artist(&hit.artists) {
        Some(name) => name.to_string(),
        None => {
            let type_fallback = Fallback {
                thumbnail: None,
                channel_title: hit
                    .album_type
                    .clone()
                    .or_else(|| fallback.channel_title.clone()),
            };
            resolve_channel_title(&Credits::default(), &type_fallback, &hit.browse_id)
        }
    };

    let thumbnail = hit
        .thumbnails
        .last()
        .or_else(|| detail.thumbnails.last())
        .cloned()
        .or_else(|| fallback.thumbnail.clone());
    let item_count = detail.track_total();
    let title = resolve_title(hit.title, &hit.browse_id);

    CanonicalItem::playlist(hit.browse_id, title, channel_title, thumbnail, item_count)
        .with_extra(Value::Array(detail.tracks))
}

/// Playlist or watch-context track to video.
pub fn normalize_playlist_track(track: PlaylistTrack, fallback: &Fallback) -> CanonicalItem {
    let duration = resolve_duration(&track.durations, &track.video_id);
    let channel_title = resolve_channel_title(&track.credits, fallback, &track.video_id);
    let thumbnail = resolve_thumbnail(&track.thumbnails, fallback);
    let title = resolve_title(track.title, &track.video_id);

    CanonicalItem::video(track.video_id, title, channel_title, thumbnail, duration)
}

/// Album track to video.
pub fn normalize_album_track(track: AlbumTrack, fallback: &Fallback) -> CanonicalItem {
    let duration = resolve_duration(&track.durations, &track.video_id);
    let channel_title = resolve_channel_title(&track.credits, fallback, &track.video_id);
    let thumbnail = resolve_thumbnail(&track.thumbnails, fallback);
    let title = resolve_title(track.title, &track.video_id);

    CanonicalItem::video(track.video_id, title, channel_title, thumbnail, duration)
}

/// Library or channel playlist entry to playlist.
pub fn normalize_playlist_summary(summary: PlaylistSummary, fallback: &Fallback) -> CanonicalItem {
    let channel_title = resolve_channel_title(&summary.credits, fallback, &summary.playlist_id);
    let thumbnail = resolve_thumbnail(&summary.thumbnails, fallback);
    let item_count = resolve_item_count(summary.count.as_ref(), &summary.playlist_id);
    let title = resolve_title(summary.title, &summary.playlist_id);

    CanonicalItem::playlist(
        summary.playlist_id,
        title,
        channel_title,
        thumbnail,
        item_count,
    )
}

/// First present duration field wins.
fn resolve_duration(fields: &DurationFields, subject: &str) -> String {
    let source = if let Some(text) = fields.duration.as_deref() {
        DurationSource::Clock(text)
    } else if let Some(text) = fields.length.as_deref() {
        DurationSource::Clock(text)
    } else if let Some(ms) = fields.length_ms.as_ref() {
        DurationSource::Millis(ms)
    } else {
        DurationSource::Missing
    };

    duration::encode(source, subject)
}

fn resolve_channel_title(credits: &Credits, fallback: &Fallback, subject: &str) -> String {
    if let Some(name) = primary_artist(&credits.artists) {
        return name.to_string();
    }
    if let Some(byline) = credits.byline.as_deref().filter(|b| !b.is_empty()) {
        return byline.to_string();
    }
    if let Some(title) = fallback.channel_title.as_deref() {
        return title.to_string();
    }

    warn!(
        target: "ytm_catalog::data_quality",
        subject, "no artist, byline or fallback channel title"
    );
    String::new()
}

fn resolve_thumbnail(thumbnails: &[Thumbnail], fallback: &Fallback) -> Option<Thumbnail> {
    // Provider lists are ordered smallest first.
    thumbnails
        .last()
        .cloned()
        .or_else(|| fallback.thumbnail.clone())
}

fn resolve_title(title: String, subject: &str) -> String {
    if title.trim().is_empty() {
        warn!(target: "ytm_catalog::data_quality", subject, "title missing");
        UNKNOWN_TITLE.to_string()
    } else {
        title
    }
}

fn resolve_item_count(count: Option<&RawCount>, subject: &str) -> u64 {
    match count {
        None => DEFAULT_ITEM_COUNT,
        Some(RawCount::Number(n)) => *n,
        Some(RawCount::Text(text)) => parse_count(text).unwrap_or_else(|| {
            warn!(
                target: "ytm_catalog::data_quality",
                subject, raw = text.as_str(), "malformed item count, using zero"
            );
            0
        }),
    }
}

/// Parse a display count such as `"1,234"`.
pub fn parse_count(text: &str) -> Option<u64> {
    let digits: String = text.chars().filter(|c| *c != ',').collect();
    digits.trim().parse().ok()
}

/// Deserialize a list of raw JSON records, dropping the ones that do not
/// fit `T`. A dropped record is a data-quality event, not an error.
pub fn parse_records<T: DeserializeOwned>(values: &[Value], context: &str) -> Vec<T> {
    let parsed: Vec<T> = values
        .iter()
        .filter_map(|value| match serde_json::from_value::<T>(value.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(
                    target: "ytm_catalog::data_quality",
                    context, error = %e, "skipping malformed record"
                );
                None
            }
        })
        .collect();

    debug!(context, kept = parsed.len(), total = values.len(), "parsed records");
    parsed
}
