//! Attribute Codec
//!
//! Stateless translation between AVRCP wire values and the normalized
//! representation handed to the media-session side:
//!
//! - Player application settings (equalizer, repeat, shuffle, scan) in both
//!   directions
//! - Play status plus position into a [`PlaybackSnapshot`]
//! - The raw byte layouts the native layer uses for setting lists
//!
//! Nothing here fails: values without a mapping decode to
//! [`SettingState::Invalid`] / [`PlaybackState::None`] and encode to
//! [`INVALID_SETTING_VALUE`].

use crate::constants::{
    INVALID_SETTING_VALUE, MAX_PLAYER_SETTINGS, MAX_SETTING_VALUES, play_status,
    setting_attribute, setting_value,
};
use heapless::Vec;

/// Player application setting families, in the order commands are flattened
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Setting {
    /// Equalizer on/off
    Equalizer,
    /// Repeat mode
    Repeat,
    /// Shuffle mode
    Shuffle,
    /// Scan mode
    Scan,
}

impl Setting {
    /// All families in declaration order
    pub const ALL: [Setting; 4] = [
        Setting::Equalizer,
        Setting::Repeat,
        Setting::Shuffle,
        Setting::Scan,
    ];

    /// AVRCP attribute id of this family
    #[must_use]
    pub const fn attribute_id(self) -> u8 {
        match self {
            Self::Equalizer => setting_attribute::EQUALIZER,
            Self::Repeat => setting_attribute::REPEAT,
            Self::Shuffle => setting_attribute::SHUFFLE,
            Self::Scan => setting_attribute::SCAN,
        }
    }

    /// Family for an AVRCP attribute id
    #[must_use]
    pub const fn from_attribute_id(attribute_id: u8) -> Option<Self> {
        match attribute_id {
            setting_attribute::EQUALIZER => Some(Self::Equalizer),
            setting_attribute::REPEAT => Some(Self::Repeat),
            setting_attribute::SHUFFLE => Some(Self::Shuffle),
            setting_attribute::SCAN => Some(Self::Scan),
            _ => None,
        }
    }

    /// Bit of this family in a [`SettingsMask`]
    #[must_use]
    pub const fn mask_bit(self) -> u8 {
        match self {
            Self::Equalizer => SettingsMask::EQUALIZER,
            Self::Repeat => SettingsMask::REPEAT,
            Self::Shuffle => SettingsMask::SHUFFLE,
            Self::Scan => SettingsMask::SCAN,
        }
    }

    const fn index(self) -> usize {
        match self {
            Self::Equalizer => 0,
            Self::Repeat => 1,
            Self::Shuffle => 2,
            Self::Scan => 3,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Self::Equalizer => "EQ",
            Self::Repeat => "REPEAT",
            Self::Shuffle => "SHUFFLE",
            Self::Scan => "SCAN",
        }
    }
}

/// Normalized value of a player application setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingState {
    /// No mapping for the wire value
    #[default]
    Invalid,
    /// Off
    Off,
    /// On (equalizer only)
    On,
    /// Single track (repeat only)
    SingleTrack,
    /// All tracks
    AllTrack,
    /// Current group
    Group,
}

impl SettingState {
    /// Numeric code used when displaying settings
    #[must_use]
    pub const fn code(self) -> i8 {
        match self {
            Self::Invalid => -1,
            Self::Off => 0,
            Self::On => 1,
            Self::SingleTrack => 2,
            Self::AllTrack => 3,
            Self::Group => 4,
        }
    }
}

/// Set of setting families, as exposed to the external settings API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SettingsMask {
    raw: u8,
}

impl SettingsMask {
    /// Equalizer bit
    pub const EQUALIZER: u8 = 0x01;
    /// Repeat bit
    pub const REPEAT: u8 = 0x02;
    /// Shuffle bit
    pub const SHUFFLE: u8 = 0x04;
    /// Scan bit
    pub const SCAN: u8 = 0x08;

    /// Create from a raw bit set, dropping unknown bits
    #[must_use]
    pub const fn from_raw(raw: u8) -> Self {
        Self { raw: raw & 0x0F }
    }

    /// Raw bit set
    #[must_use]
    pub const fn raw(&self) -> u8 {
        self.raw
    }

    /// Whether `setting` is part of the set
    #[must_use]
    pub const fn contains(&self, setting: Setting) -> bool {
        self.raw & setting.mask_bit() != 0
    }

    /// Add `setting` to the set
    pub fn insert(&mut self, setting: Setting) {
        self.raw |= setting.mask_bit();
    }

    /// Number of families in the set
    #[must_use]
    pub const fn len(&self) -> usize {
        self.raw.count_ones() as usize
    }

    /// Whether the set is empty
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.raw == 0
    }
}

/// Normalized player application settings snapshot
///
/// Carries which families are present plus one value per family. Used both for
/// reporting the remote's current settings and for requesting new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayerSettings {
    supported: SettingsMask,
    values: [SettingState; 4],
}

impl PlayerSettings {
    /// Create a snapshot declaring the given families, all values `Invalid`
    #[must_use]
    pub fn new(supported: SettingsMask) -> Self {
        Self {
            supported,
            values: [SettingState::Invalid; 4],
        }
    }

    /// Families declared in this snapshot
    #[must_use]
    pub fn settings(&self) -> SettingsMask {
        self.supported
    }

    /// Set the value of a family, declaring it if needed
    pub fn add_setting_value(&mut self, setting: Setting, state: SettingState) {
        self.supported.insert(setting);
        self.values[setting.index()] = state;
    }

    /// Builder form of [`PlayerSettings::add_setting_value`]
    #[must_use]
    pub fn with(mut self, setting: Setting, state: SettingState) -> Self {
        self.add_setting_value(setting, state);
        self
    }

    /// Value of a family, `None` when it is not declared
    #[must_use]
    pub fn setting_value(&self, setting: Setting) -> Option<SettingState> {
        self.supported
            .contains(setting)
            .then(|| self.values[setting.index()])
    }

    /// Flatten to AVRCP `(attribute id, wire value)` pairs in family order
    #[must_use]
    pub fn to_wire_pairs(&self) -> Vec<(u8, u8), MAX_PLAYER_SETTINGS> {
        let mut pairs = Vec::new();
        for setting in Setting::ALL {
            if let Some(state) = self.setting_value(setting) {
                let id = setting.attribute_id();
                pairs.push((id, encode_setting_value(id, state))).ok();
            }
        }
        pairs
    }
}

impl core::fmt::Display for PlayerSettings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        for setting in Setting::ALL {
            if let Some(state) = self.setting_value(setting) {
                write!(f, " {} : {}", setting.label(), state.code())?;
            }
        }
        Ok(())
    }
}

/// Decode a wire setting value for the given attribute id
#[must_use]
pub fn decode_setting_value(attribute_id: u8, wire_value: u8) -> SettingState {
    use setting_value as v;

    match (Setting::from_attribute_id(attribute_id), wire_value) {
        (Some(Setting::Equalizer), v::EQUALIZER_OFF) => SettingState::Off,
        (Some(Setting::Equalizer), v::EQUALIZER_ON) => SettingState::On,
        (Some(Setting::Repeat), v::REPEAT_OFF) => SettingState::Off,
        (Some(Setting::Repeat), v::REPEAT_SINGLE_TRACK) => SettingState::SingleTrack,
        (Some(Setting::Repeat), v::REPEAT_ALL_TRACK) => SettingState::AllTrack,
        (Some(Setting::Repeat), v::REPEAT_GROUP) => SettingState::Group,
        (Some(Setting::Shuffle), v::SHUFFLE_OFF) => SettingState::Off,
        (Some(Setting::Shuffle), v::SHUFFLE_ALL_TRACK) => SettingState::AllTrack,
        (Some(Setting::Shuffle), v::SHUFFLE_GROUP) => SettingState::Group,
        (Some(Setting::Scan), v::SCAN_OFF) => SettingState::Off,
        (Some(Setting::Scan), v::SCAN_ALL_TRACK) => SettingState::AllTrack,
        (Some(Setting::Scan), v::SCAN_GROUP) => SettingState::Group,
        _ => SettingState::Invalid,
    }
}

/// Encode a normalized setting value for the given attribute id
///
/// Returns [`INVALID_SETTING_VALUE`] when the family has no such state.
#[must_use]
pub fn encode_setting_value(attribute_id: u8, state: SettingState) -> u8 {
    use setting_value as v;

    match (Setting::from_attribute_id(attribute_id), state) {
        (Some(Setting::Equalizer), SettingState::Off) => v::EQUALIZER_OFF,
        (Some(Setting::Equalizer), SettingState::On) => v::EQUALIZER_ON,
        (Some(Setting::Repeat), SettingState::Off) => v::REPEAT_OFF,
        (Some(Setting::Repeat), SettingState::SingleTrack) => v::REPEAT_SINGLE_TRACK,
        (Some(Setting::Repeat), SettingState::AllTrack) => v::REPEAT_ALL_TRACK,
        (Some(Setting::Repeat), SettingState::Group) => v::REPEAT_GROUP,
        (Some(Setting::Shuffle), SettingState::Off) => v::SHUFFLE_OFF,
        (Some(Setting::Shuffle), SettingState::AllTrack) => v::SHUFFLE_ALL_TRACK,
        (Some(Setting::Shuffle), SettingState::Group) => v::SHUFFLE_GROUP,
        (Some(Setting::Scan), SettingState::Off) => v::SCAN_OFF,
        (Some(Setting::Scan), SettingState::AllTrack) => v::SCAN_ALL_TRACK,
        (Some(Setting::Scan), SettingState::Group) => v::SCAN_GROUP,
        _ => INVALID_SETTING_VALUE,
    }
}

/// Play status of the remote player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlayStatus {
    /// Stopped
    Stopped,
    /// Playing
    Playing,
    /// Paused
    Paused,
    /// Seeking forward
    FwdSeek,
    /// Seeking backward
    RevSeek,
    /// Error or any value outside the AVRCP table
    Unknown(u8),
}

impl From<u8> for PlayStatus {
    fn from(raw: u8) -> Self {
        match raw {
            play_status::STOPPED => Self::Stopped,
            play_status::PLAYING => Self::Playing,
            play_status::PAUSED => Self::Paused,
            play_status::FWD_SEEK => Self::FwdSeek,
            play_status::REV_SEEK => Self::RevSeek,
            other => Self::Unknown(other),
        }
    }
}

impl From<PlayStatus> for u8 {
    fn from(status: PlayStatus) -> Self {
        match status {
            PlayStatus::Stopped => play_status::STOPPED,
            PlayStatus::Playing => play_status::PLAYING,
            PlayStatus::Paused => play_status::PAUSED,
            PlayStatus::FwdSeek => play_status::FWD_SEEK,
            PlayStatus::RevSeek => play_status::REV_SEEK,
            PlayStatus::Unknown(raw) => raw,
        }
    }
}

/// Media-session playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlaybackState {
    /// No recognizable state
    None,
    /// Stopped
    Stopped,
    /// Playing
    Playing,
    /// Paused
    Paused,
    /// Fast forwarding
    FastForwarding,
    /// Rewinding
    Rewinding,
    /// No player to report on
    Error,
}

/// Position value meaning "unknown"
pub const PLAYBACK_POSITION_UNKNOWN: i64 = -1;

/// Playback state as reported to the media session
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlaybackSnapshot {
    /// Playback state
    pub state: PlaybackState,
    /// Position in milliseconds
    pub position_ms: i64,
    /// Playback speed multiplier
    pub speed: f32,
}

impl PlaybackSnapshot {
    /// Snapshot reported while no player exists
    #[must_use]
    pub const fn error() -> Self {
        Self {
            state: PlaybackState::Error,
            position_ms: PLAYBACK_POSITION_UNKNOWN,
            speed: 0.0,
        }
    }
}

/// Translate a play status and position into a playback snapshot
#[must_use]
pub fn decode_play_status(status: PlayStatus, position_ms: i64) -> PlaybackSnapshot {
    let (state, position_ms, speed) = match status {
        PlayStatus::Stopped => (PlaybackState::Stopped, 0, 0.0),
        PlayStatus::Playing => (PlaybackState::Playing, position_ms, 1.0),
        PlayStatus::Paused => (PlaybackState::Paused, position_ms, 0.0),
        PlayStatus::FwdSeek => (PlaybackState::FastForwarding, position_ms, 3.0),
        PlayStatus::RevSeek => (PlaybackState::Rewinding, position_ms, -3.0),
        PlayStatus::Unknown(_) => (PlaybackState::None, position_ms, 1.0),
    };
    PlaybackSnapshot {
        state,
        position_ms,
        speed,
    }
}

/// One supported-settings announcement entry
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SupportedSetting {
    /// Setting attribute id
    pub attribute_id: u8,
    /// Values the remote accepts for this attribute
    pub values: Vec<u8, MAX_SETTING_VALUES>,
}

impl SupportedSetting {
    /// Create an entry from an attribute id and its accepted values
    ///
    /// Values beyond the container capacity are dropped.
    #[must_use]
    pub fn new(attribute_id: u8, values: &[u8]) -> Self {
        let mut accepted = Vec::new();
        for &value in values {
            if accepted.push(value).is_err() {
                break;
            }
        }
        Self {
            attribute_id,
            values: accepted,
        }
    }
}

/// Supported-settings announcement
pub type SupportedSettings = Vec<SupportedSetting, MAX_PLAYER_SETTINGS>;

/// Current-settings `(attribute id, wire value)` pairs
pub type SettingPairs = Vec<(u8, u8), MAX_PLAYER_SETTINGS>;

/// Decode the native `id, count, values[count], ...` layout
///
/// Parsing stops at a truncated tail; entries decoded so far are kept.
#[must_use]
pub fn parse_supported_settings(bytes: &[u8]) -> SupportedSettings {
    let mut settings = SupportedSettings::new();
    let mut rest = bytes;
    while let [attribute_id, count, tail @ ..] = rest {
        let count = usize::from(*count);
        let Some(values) = tail.get(..count) else {
            warn!("[CODEC] Truncated supported setting {}", attribute_id);
            break;
        };
        if settings
            .push(SupportedSetting::new(*attribute_id, values))
            .is_err()
        {
            break;
        }
        rest = &tail[count..];
    }
    settings
}

/// Decode the native `id, value, ...` layout
///
/// A dangling id without a value is ignored.
#[must_use]
pub fn parse_current_settings(bytes: &[u8]) -> SettingPairs {
    let mut pairs = SettingPairs::new();
    for chunk in bytes.chunks_exact(2) {
        if pairs.push((chunk[0], chunk[1])).is_err() {
            break;
        }
    }
    pairs
}
