//! `Remotebird` Constants
//!
//! This module contains the AVRCP protocol values and the capacity limits used
//! throughout the `Remotebird` library. Protocol values are the AVRCP 1.6
//! assigned numbers; capacities size the heapless containers.

/// Depth of the controller message queue
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Maximum stored length of a media element attribute value (bytes)
pub const MAX_ATTRIBUTE_VALUE_LENGTH: usize = 128;

/// Maximum number of element attributes carried by one track event
pub const MAX_ELEMENT_ATTRIBUTES: usize = 8;

/// Maximum length of a BIP image handle
pub const MAX_IMAGE_HANDLE_LENGTH: usize = 16;

/// Maximum length of a fetched image location (file path or URI)
pub const MAX_IMAGE_LOCATION_LENGTH: usize = 128;

/// Maximum length of a cover art mime type / encoding name
pub const MAX_MIME_TYPE_LENGTH: usize = 16;

/// Maximum length of a BIP pixel descriptor such as `640*480`
pub const MAX_PIXEL_SPEC_LENGTH: usize = 16;

/// Maximum number of tracks kept in the now playing list
pub const MAX_NOW_PLAYING_TRACKS: usize = 8;

/// Maximum number of player application settings per player
pub const MAX_PLAYER_SETTINGS: usize = 8;

/// Maximum number of supported values per player application setting
pub const MAX_SETTING_VALUES: usize = 8;

/// Maximum number of devices reported by connection queries
pub const MAX_CONNECTED_DEVICES: usize = 1;

/// Absolute volume full scale (AVRCP volume is 7 bits)
pub const ABS_VOL_BASE: u32 = 127;

/// PSM value meaning "no cover art channel announced"
pub const DEFAULT_PSM: u16 = 0x0000;

/// Remote feature bits reported with the features event
pub mod feature {
    /// No AVRCP features
    pub const NONE: u32 = 0x0000;
    /// Metadata (AVRCP 1.3+)
    pub const METADATA: u32 = 0x0001;
    /// Absolute volume (AVRCP 1.4+)
    pub const ABSOLUTE_VOLUME: u32 = 0x0002;
    /// Browsing (AVRCP 1.4+)
    pub const BROWSING: u32 = 0x0004;
    /// Cover art over BIP (AVRCP 1.6)
    pub const COVER_ART: u32 = 0x0008;
}

/// Media element attribute identifiers (AVRCP 1.6 section 26)
pub mod media_attribute {
    /// Title of the media
    pub const TITLE: u32 = 0x01;
    /// Name of the artist
    pub const ARTIST_NAME: u32 = 0x02;
    /// Name of the album
    pub const ALBUM_NAME: u32 = 0x03;
    /// Number of the media (e.g. track number of the CD)
    pub const TRACK_NUMBER: u32 = 0x04;
    /// Total number of the media (e.g. total track number of the CD)
    pub const TOTAL_TRACK_NUMBER: u32 = 0x05;
    /// Genre
    pub const GENRE: u32 = 0x06;
    /// Playing time in milliseconds
    pub const PLAYING_TIME: u32 = 0x07;
    /// BIP image handle of the default cover art
    pub const COVER_ART_HANDLE: u32 = 0x08;
}

/// Player application setting attribute identifiers
pub mod setting_attribute {
    /// Equalizer on/off status
    pub const EQUALIZER: u8 = 0x01;
    /// Repeat mode status
    pub const REPEAT: u8 = 0x02;
    /// Shuffle on/off status
    pub const SHUFFLE: u8 = 0x03;
    /// Scan on/off status
    pub const SCAN: u8 = 0x04;
}

/// Player application setting values as they appear on the wire
pub mod setting_value {
    /// Equalizer off
    pub const EQUALIZER_OFF: u8 = 0x01;
    /// Equalizer on
    pub const EQUALIZER_ON: u8 = 0x02;

    /// Repeat off
    pub const REPEAT_OFF: u8 = 0x01;
    /// Repeat a single track
    pub const REPEAT_SINGLE_TRACK: u8 = 0x02;
    /// Repeat all tracks
    pub const REPEAT_ALL_TRACK: u8 = 0x03;
    /// Repeat the current group
    pub const REPEAT_GROUP: u8 = 0x04;

    /// Shuffle off
    pub const SHUFFLE_OFF: u8 = 0x01;
    /// Shuffle all tracks
    pub const SHUFFLE_ALL_TRACK: u8 = 0x02;
    /// Shuffle the current group
    pub const SHUFFLE_GROUP: u8 = 0x03;

    /// Scan off
    pub const SCAN_OFF: u8 = 0x01;
    /// Scan all tracks
    pub const SCAN_ALL_TRACK: u8 = 0x02;
    /// Scan the current group
    pub const SCAN_GROUP: u8 = 0x03;
}

/// Wire value sent for a setting that has no AVRCP encoding
pub const INVALID_SETTING_VALUE: u8 = 0xFE;

/// Play status values reported by the remote
pub mod play_status {
    /// Stopped
    pub const STOPPED: u8 = 0x00;
    /// Playing
    pub const PLAYING: u8 = 0x01;
    /// Paused
    pub const PAUSED: u8 = 0x02;
    /// Forward seek
    pub const FWD_SEEK: u8 = 0x03;
    /// Reverse seek
    pub const REV_SEEK: u8 = 0x04;
    /// Error
    pub const ERROR: u8 = 0xFF;
}

/// Pass-through operation identifiers (AV/C panel subunit)
pub mod pass_through {
    /// Volume up
    pub const VOLUME_UP: u8 = 0x41;
    /// Volume down
    pub const VOLUME_DOWN: u8 = 0x42;
    /// Mute
    pub const MUTE: u8 = 0x43;
    /// Play
    pub const PLAY: u8 = 0x44;
    /// Stop
    pub const STOP: u8 = 0x45;
    /// Pause
    pub const PAUSE: u8 = 0x46;
    /// Rewind
    pub const REWIND: u8 = 0x48;
    /// Fast forward
    pub const FAST_FORWARD: u8 = 0x49;
    /// Forward (next track)
    pub const FORWARD: u8 = 0x4B;
    /// Backward (previous track)
    pub const BACKWARD: u8 = 0x4C;

    /// Qualification tester code requesting element attributes
    pub const PTS_GET_ELEMENT_ATTRIBUTES: u8 = 0xC1;
    /// Qualification tester code requesting the play status
    pub const PTS_GET_PLAY_STATUS: u8 = 0xC2;
}

/// Group navigation vendor-unique operation identifiers
pub mod group_navigation {
    /// Next group
    pub const NEXT_GROUP: u8 = 0x00;
    /// Previous group
    pub const PREVIOUS_GROUP: u8 = 0x01;
}

/// Notification response types for registered notifications
pub mod notification_response {
    /// Interim response sent right after registration
    pub const INTERIM: u8 = 0x00;
    /// Changed response sent when the value changes
    pub const CHANGED: u8 = 0x01;
}
