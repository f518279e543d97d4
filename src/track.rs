//! Track Model
//!
//! One track's metadata as announced by the remote, plus the cover-art
//! locations filled in later by the image channel.

use crate::constants::{
    MAX_ATTRIBUTE_VALUE_LENGTH, MAX_ELEMENT_ATTRIBUTES, MAX_IMAGE_HANDLE_LENGTH,
    MAX_IMAGE_LOCATION_LENGTH, media_attribute,
};
use heapless::{String, Vec};

/// Numeric attribute value meaning "unknown"
pub const UNKNOWN_NUMBER: i64 = -1;

/// Bounded attribute text
pub type AttributeText = String<MAX_ATTRIBUTE_VALUE_LENGTH>;

/// BIP image handle
pub type ImageHandle = String<MAX_IMAGE_HANDLE_LENGTH>;

/// Location of a fetched image (file path or URI)
pub type ImageLocation = String<MAX_IMAGE_LOCATION_LENGTH>;

/// Copy `value` into a bounded string, cutting at a character boundary
pub(crate) fn bounded<const N: usize>(value: &str) -> String<N> {
    let mut end = value.len().min(N);
    while !value.is_char_boundary(end) {
        end -= 1;
    }
    let mut text = String::new();
    text.push_str(&value[..end]).ok();
    text
}

/// One media element attribute as delivered by the transport
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ElementAttribute {
    /// Media attribute id (see [`media_attribute`])
    pub id: u32,
    /// Attribute value as text
    pub value: AttributeText,
}

impl ElementAttribute {
    /// Create an attribute, truncating over-long values
    #[must_use]
    pub fn new(id: u32, value: &str) -> Self {
        Self {
            id,
            value: bounded(value),
        }
    }
}

/// Attribute list carried by track events
pub type ElementAttributes = Vec<ElementAttribute, MAX_ELEMENT_ATTRIBUTES>;

/// Track metadata
///
/// Text fields use the empty string for "unknown" and numeric fields use
/// [`UNKNOWN_NUMBER`]. Only the cover-art fields change after construction,
/// and only for the handle the track was announced with.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Track {
    uid: u64,
    title: AttributeText,
    artist: AttributeText,
    album: AttributeText,
    genre: AttributeText,
    track_number: i64,
    total_tracks: i64,
    duration_ms: i64,
    cover_art_handle: ImageHandle,
    thumbnail_location: Option<ImageLocation>,
    image_location: Option<ImageLocation>,
}

impl Track {
    /// Create a track with every field unknown
    #[must_use]
    pub fn new(uid: u64) -> Self {
        Self {
            uid,
            title: String::new(),
            artist: String::new(),
            album: String::new(),
            genre: String::new(),
            track_number: UNKNOWN_NUMBER,
            total_tracks: UNKNOWN_NUMBER,
            duration_ms: UNKNOWN_NUMBER,
            cover_art_handle: String::new(),
            thumbnail_location: None,
            image_location: None,
        }
    }

    /// Build a track from element attributes
    ///
    /// Unknown ids are ignored; when an id repeats, the last value wins. A
    /// malformed number leaves only that field unknown.
    #[must_use]
    pub fn from_attributes(uid: u64, attributes: &[ElementAttribute]) -> Self {
        let mut track = Self::new(uid);
        for attribute in attributes {
            let value = attribute.value.as_str();
            match attribute.id {
                media_attribute::TITLE => track.title = attribute.value.clone(),
                media_attribute::ARTIST_NAME => track.artist = attribute.value.clone(),
                media_attribute::ALBUM_NAME => track.album = attribute.value.clone(),
                media_attribute::GENRE => track.genre = attribute.value.clone(),
                media_attribute::TRACK_NUMBER => track.track_number = parse_number(attribute),
                media_attribute::TOTAL_TRACK_NUMBER => {
                    track.total_tracks = parse_number(attribute);
                }
                media_attribute::PLAYING_TIME => track.duration_ms = parse_number(attribute),
                media_attribute::COVER_ART_HANDLE => track.cover_art_handle = bounded(value),
                other => trace!("[TRACK] Ignoring attribute {}", other),
            }
        }
        track
    }

    /// Track uid; 0 is the current track
    #[must_use]
    pub fn uid(&self) -> u64 {
        self.uid
    }

    /// Title
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Artist name
    #[must_use]
    pub fn artist(&self) -> &str {
        &self.artist
    }

    /// Album name
    #[must_use]
    pub fn album(&self) -> &str {
        &self.album
    }

    /// Genre
    #[must_use]
    pub fn genre(&self) -> &str {
        &self.genre
    }

    /// Track number on the original recording
    #[must_use]
    pub fn track_number(&self) -> i64 {
        self.track_number
    }

    /// Number of tracks on the original recording
    #[must_use]
    pub fn total_tracks(&self) -> i64 {
        self.total_tracks
    }

    /// Duration in milliseconds
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    pub(crate) fn set_duration_ms(&mut self, duration_ms: i64) {
        self.duration_ms = duration_ms;
    }

    /// BIP handle of the cover art, empty when none
    #[must_use]
    pub fn cover_art_handle(&self) -> &str {
        &self.cover_art_handle
    }

    /// Whether the track announced a cover-art handle
    #[must_use]
    pub fn has_cover_art_handle(&self) -> bool {
        !self.cover_art_handle.is_empty()
    }

    /// Location of the fetched thumbnail
    #[must_use]
    pub fn thumbnail_location(&self) -> Option<&str> {
        self.thumbnail_location.as_deref()
    }

    /// Location of the fetched full image
    #[must_use]
    pub fn image_location(&self) -> Option<&str> {
        self.image_location.as_deref()
    }

    /// Store a fetched cover-art location
    ///
    /// Returns `false` without touching the track when `handle` is not the
    /// track's own handle or no location was delivered. This drops fetch
    /// results that arrive after the track changed.
    pub fn update_cover_art(
        &mut self,
        handle: &str,
        location: Option<&str>,
        is_thumbnail: bool,
    ) -> bool {
        let Some(location) = location else {
            return false;
        };
        if handle != self.cover_art_handle.as_str() {
            return false;
        }

        let location = Some(bounded(location));
        if is_thumbnail {
            self.thumbnail_location = location;
        } else {
            self.image_location = location;
        }
        true
    }

    /// Forget the cover-art handle and any fetched locations
    pub fn clear_cover_art_data(&mut self) {
        self.cover_art_handle.clear();
        self.thumbnail_location = None;
        self.image_location = None;
    }

    /// Normalized metadata for the media session
    #[must_use]
    pub fn metadata(&self) -> MediaMetadata {
        MediaMetadata {
            media_id: self.uid,
            title: self.title.clone(),
            artist: self.artist.clone(),
            album: self.album.clone(),
            genre: self.genre.clone(),
            track_number: self.track_number,
            total_tracks: self.total_tracks,
            duration_ms: self.duration_ms,
            album_art_uri: self.image_location.clone(),
            display_icon: self.thumbnail_location.clone(),
        }
    }
}

fn parse_number(attribute: &ElementAttribute) -> i64 {
    if attribute.value.is_empty() {
        return UNKNOWN_NUMBER;
    }
    match attribute.value.parse::<i64>() {
        Ok(number) => number,
        Err(_) => {
            warn!(
                "[TRACK] Malformed number for attribute {}: {}",
                attribute.id,
                attribute.value.as_str()
            );
            UNKNOWN_NUMBER
        }
    }
}

/// Metadata handed to the media session
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MediaMetadata {
    /// Track uid
    pub media_id: u64,
    /// Title
    pub title: AttributeText,
    /// Artist name
    pub artist: AttributeText,
    /// Album name
    pub album: AttributeText,
    /// Genre
    pub genre: AttributeText,
    /// Track number, -1 when unknown
    pub track_number: i64,
    /// Number of tracks, -1 when unknown
    pub total_tracks: i64,
    /// Duration in milliseconds, -1 when unknown
    pub duration_ms: i64,
    /// Location of the full cover art image
    pub album_art_uri: Option<ImageLocation>,
    /// Location of the cover art thumbnail
    pub display_icon: Option<ImageLocation>,
}

impl core::fmt::Display for MediaMetadata {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{}, {}, {} genre={} id={} track={} tracks={} duration={}",
            self.title,
            self.artist,
            self.album,
            self.genre,
            self.media_id,
            self.track_number,
            self.total_tracks,
            self.duration_ms
        )?;
        if let Some(uri) = &self.album_art_uri {
            write!(f, " art={uri}")?;
        }
        if let Some(icon) = &self.display_icon {
            write!(f, " icon={icon}")?;
        }
        Ok(())
    }
}
