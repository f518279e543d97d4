//! Session State
//!
//! Everything the controller knows about the connected remote. A
//! [`SessionState`] exists only while a device is connected and is dropped as a
//! whole on disconnect.

use crate::constants::{
    DEFAULT_PSM, MAX_MIME_TYPE_LENGTH, MAX_NOW_PLAYING_TRACKS, MAX_PIXEL_SPEC_LENGTH, feature,
};
use crate::player::Player;
use crate::track::{Track, bounded};
use crate::volume::VolumeBridge;
use crate::{AvrcpControllerOptions, BluetoothAddress};
use heapless::{String, Vec};

/// uid of the current track
pub const CURRENT_TRACK_UID: u64 = 0;

/// Remote AVRCP features
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RemoteCapabilities {
    raw: u32,
}

impl RemoteCapabilities {
    /// Create from the raw feature bitmask
    #[must_use]
    pub const fn from_raw(raw: u32) -> Self {
        Self { raw }
    }

    /// Raw feature bitmask
    #[must_use]
    pub const fn raw(&self) -> u32 {
        self.raw
    }

    /// Metadata (AVRCP 1.3+)
    #[must_use]
    pub const fn metadata(&self) -> bool {
        self.raw & feature::METADATA != 0
    }

    /// Absolute volume
    #[must_use]
    pub const fn absolute_volume(&self) -> bool {
        self.raw & feature::ABSOLUTE_VOLUME != 0
    }

    /// Browsing
    #[must_use]
    pub const fn browsing(&self) -> bool {
        self.raw & feature::BROWSING != 0
    }

    /// Cover art over BIP
    #[must_use]
    pub const fn cover_art(&self) -> bool {
        self.raw & feature::COVER_ART != 0
    }

    /// No feature at all
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw == feature::NONE
    }
}

/// Now playing list, keyed by track uid
///
/// The entry with uid 0 is the current track.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NowPlaying {
    tracks: Vec<Track, MAX_NOW_PLAYING_TRACKS>,
}

impl NowPlaying {
    /// Create a list holding an empty current track
    #[must_use]
    pub fn new() -> Self {
        let mut now_playing = Self { tracks: Vec::new() };
        now_playing.update_track(Track::new(CURRENT_TRACK_UID));
        now_playing
    }

    /// Insert a track, replacing the entry with the same uid
    pub fn update_track(&mut self, track: Track) {
        if let Some(existing) = self.tracks.iter_mut().find(|t| t.uid() == track.uid()) {
            *existing = track;
        } else if self.tracks.push(track).is_err() {
            warn!("[SESSION] Now playing list full, dropping track");
        }
    }

    /// Track with the given uid
    #[must_use]
    pub fn track(&self, uid: u64) -> Option<&Track> {
        self.tracks.iter().find(|t| t.uid() == uid)
    }

    /// The current track
    #[must_use]
    pub fn current_track(&self) -> Option<&Track> {
        self.track(CURRENT_TRACK_UID)
    }

    /// The current track, mutable
    pub fn current_track_mut(&mut self) -> Option<&mut Track> {
        self.tracks.iter_mut().find(|t| t.uid() == CURRENT_TRACK_UID)
    }

    /// Number of tracks
    #[must_use]
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    /// Whether the list is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// Forget cover art on every track
    pub fn clear_cover_art_data(&mut self) {
        for track in &mut self.tracks {
            track.clear_cover_art_data();
        }
    }
}

/// Cover-art subscription of the media-session consumer
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AppProperties {
    /// Whether the consumer asked for cover art
    pub cover_art_requested: bool,
    /// Requested encoding
    pub mime_type: String<MAX_MIME_TYPE_LENGTH>,
    /// Requested height in pixels
    pub height: u32,
    /// Requested width in pixels
    pub width: u32,
    /// Maximum image size in bytes
    pub max_size: u64,
}

impl AppProperties {
    /// Defaults from the controller options, cover art not requested
    #[must_use]
    pub fn from_options(options: &AvrcpControllerOptions) -> Self {
        Self {
            cover_art_requested: false,
            mime_type: bounded(options.cover_art_mime_type),
            height: options.cover_art_height,
            width: options.cover_art_width,
            max_size: options.cover_art_max_size,
        }
    }

    /// BIP pixel descriptor, `W*H`
    #[must_use]
    pub fn pixel_spec(&self) -> String<MAX_PIXEL_SPEC_LENGTH> {
        let mut pixel = String::new();
        core::fmt::write(&mut pixel, format_args!("{}*{}", self.width, self.height)).ok();
        pixel
    }
}

/// Image side channel state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ImageChannelState {
    /// No channel
    #[default]
    Disconnected,
    /// Connect requested, waiting for the session to come up
    Connecting,
    /// Channel up
    Connected,
}

/// State of the connected remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    device: BluetoothAddress,
    capabilities: Option<RemoteCapabilities>,
    player: Option<Player>,
    now_playing: Option<NowPlaying>,
    cover_art_psm: u16,
    image_channel: ImageChannelState,
    volume: VolumeBridge,
}

impl SessionState {
    /// New session with the default player addressed
    #[must_use]
    pub fn new(device: BluetoothAddress) -> Self {
        Self {
            device,
            capabilities: None,
            player: Some(Player::default()),
            now_playing: None,
            cover_art_psm: DEFAULT_PSM,
            image_channel: ImageChannelState::Disconnected,
            volume: VolumeBridge::new(),
        }
    }

    /// Connected device
    #[must_use]
    pub fn device(&self) -> BluetoothAddress {
        self.device
    }

    /// Remote features, `None` until announced
    #[must_use]
    pub fn capabilities(&self) -> Option<RemoteCapabilities> {
        self.capabilities
    }

    /// Record the remote features
    ///
    /// Returns `false` if they were already set; the first announcement stays.
    pub fn set_capabilities(&mut self, capabilities: RemoteCapabilities) -> bool {
        if self.capabilities.is_some() {
            return false;
        }
        self.capabilities = Some(capabilities);
        true
    }

    /// Whether the remote announced cover-art support
    #[must_use]
    pub fn supports_cover_art(&self) -> bool {
        self.capabilities.is_some_and(|c| c.cover_art())
    }

    /// Whether the remote announced absolute volume support
    #[must_use]
    pub fn supports_absolute_volume(&self) -> bool {
        self.capabilities.is_some_and(|c| c.absolute_volume())
    }

    /// Addressed player
    #[must_use]
    pub fn player(&self) -> Option<&Player> {
        self.player.as_ref()
    }

    /// Addressed player, mutable
    pub fn player_mut(&mut self) -> Option<&mut Player> {
        self.player.as_mut()
    }

    /// Now playing list
    #[must_use]
    pub fn now_playing(&self) -> Option<&NowPlaying> {
        self.now_playing.as_ref()
    }

    /// Now playing list, mutable
    pub fn now_playing_mut(&mut self) -> Option<&mut NowPlaying> {
        self.now_playing.as_mut()
    }

    /// Create the now playing list if missing and select an empty current track
    pub fn create_now_playing(&mut self) -> &mut NowPlaying {
        let now_playing = self.now_playing.get_or_insert_with(NowPlaying::new);
        now_playing.update_track(Track::new(CURRENT_TRACK_UID));
        now_playing
    }

    /// PSM of the cover-art channel
    #[must_use]
    pub fn cover_art_psm(&self) -> u16 {
        self.cover_art_psm
    }

    /// Record the PSM of the cover-art channel
    pub fn set_cover_art_psm(&mut self, psm: u16) {
        self.cover_art_psm = psm;
    }

    /// Image channel state
    #[must_use]
    pub fn image_channel(&self) -> ImageChannelState {
        self.image_channel
    }

    /// Update the image channel state
    pub fn set_image_channel(&mut self, state: ImageChannelState) {
        self.image_channel = state;
    }

    /// Volume bridge
    #[must_use]
    pub fn volume(&self) -> &VolumeBridge {
        &self.volume
    }

    /// Volume bridge, mutable
    pub fn volume_mut(&mut self) -> &mut VolumeBridge {
        &mut self.volume
    }
}
