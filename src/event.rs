//! Inbound events
//!
//! Typed events delivered by the collaborators: the AVRCP transport, the image
//! channel and the system volume service. Wire decoding happens on the
//! collaborator side.

use crate::BluetoothAddress;
use crate::codec::{PlayStatus, SettingPairs, SupportedSettings};
use crate::gate::KeyState;
use crate::session::RemoteCapabilities;
use crate::track::{ElementAttributes, ImageHandle, ImageLocation};

/// Profile connection state of a remote device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConnectionState {
    /// Not connected
    Disconnected,
    /// Connected
    Connected,
}

/// Event consumed by the controller
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AvrcpEvent {
    /// Control channel went up or down
    ConnectionChanged {
        /// Originating device
        device: BluetoothAddress,
        /// New connection state
        state: ConnectionState,
    },
    /// Remote feature announcement
    RemoteFeatures {
        /// Originating device
        device: BluetoothAddress,
        /// Announced feature bits
        features: RemoteCapabilities,
        /// PSM of the cover-art channel, 0 if none
        cover_art_psm: u16,
    },
    /// Track changed notification with the new track's attributes
    TrackChanged {
        /// Originating device
        device: BluetoothAddress,
        /// Element attributes of the current track
        attributes: ElementAttributes,
    },
    /// Response to an element attributes request
    ElementAttributes {
        /// Originating device
        device: BluetoothAddress,
        /// Element attributes of the current track
        attributes: ElementAttributes,
    },
    /// Playback position update
    PlayPositionChanged {
        /// Originating device
        device: BluetoothAddress,
        /// Song length in milliseconds
        duration_ms: i64,
        /// Play position in milliseconds
        position_ms: i64,
    },
    /// Play status update
    PlayStatusChanged {
        /// Originating device
        device: BluetoothAddress,
        /// New play status
        status: PlayStatus,
    },
    /// Settings the addressed player supports
    SupportedPlayerAppSettings {
        /// Originating device
        device: BluetoothAddress,
        /// Announced attribute ids and their accepted values
        settings: SupportedSettings,
    },
    /// Current values of player application settings
    PlayerAppSettingChanged {
        /// Originating device
        device: BluetoothAddress,
        /// `(attribute id, wire value)` pairs
        settings: SettingPairs,
    },
    /// The remote sets the absolute volume
    SetAbsoluteVolume {
        /// Originating device
        device: BluetoothAddress,
        /// Absolute volume, 0..=127
        volume: u8,
        /// Transaction label to answer with
        label: u8,
    },
    /// The remote registers for volume change notifications
    RegisterVolumeNotification {
        /// Originating device
        device: BluetoothAddress,
        /// Transaction label to answer with
        label: u8,
    },
    /// Response to a pass-through command
    PassThroughResponse {
        /// Originating device
        device: BluetoothAddress,
        /// Operation id
        op: u8,
        /// Key state of the command
        key_state: KeyState,
    },
    /// Response to a group navigation command
    GroupNavigationResponse {
        /// Originating device
        device: BluetoothAddress,
        /// Operation id
        op: u8,
        /// Key state of the command
        key_state: KeyState,
    },
    /// Response to a set player application settings command
    SetPlayerAppSettingResponse {
        /// Originating device
        device: BluetoothAddress,
        /// Whether the remote accepted the new values
        accepted: bool,
    },
    /// Image channel is up
    ImageSessionUp {
        /// Originating device
        device: BluetoothAddress,
    },
    /// Image channel is down
    ImageSessionDown {
        /// Originating device
        device: BluetoothAddress,
    },
    /// Thumbnail fetched
    ThumbnailFetched {
        /// Originating device
        device: BluetoothAddress,
        /// Image handle the fetch was issued for
        handle: ImageHandle,
        /// Where the image was stored, `None` on failure
        location: Option<ImageLocation>,
    },
    /// Full image fetched
    ImageFetched {
        /// Originating device
        device: BluetoothAddress,
        /// Image handle the fetch was issued for
        handle: ImageHandle,
        /// Where the image was stored, `None` on failure
        location: Option<ImageLocation>,
    },
    /// Local system volume changed
    SystemVolumeChanged {
        /// New volume index
        value: u32,
        /// Volume index before the change
        previous: u32,
    },
}

impl AvrcpEvent {
    /// Originating device, `None` for local events
    #[must_use]
    pub fn device(&self) -> Option<BluetoothAddress> {
        match self {
            Self::ConnectionChanged { device, .. }
            | Self::RemoteFeatures { device, .. }
            | Self::TrackChanged { device, .. }
            | Self::ElementAttributes { device, .. }
            | Self::PlayPositionChanged { device, .. }
            | Self::PlayStatusChanged { device, .. }
            | Self::SupportedPlayerAppSettings { device, .. }
            | Self::PlayerAppSettingChanged { device, .. }
            | Self::SetAbsoluteVolume { device, .. }
            | Self::RegisterVolumeNotification { device, .. }
            | Self::PassThroughResponse { device, .. }
            | Self::GroupNavigationResponse { device, .. }
            | Self::SetPlayerAppSettingResponse { device, .. }
            | Self::ImageSessionUp { device }
            | Self::ImageSessionDown { device }
            | Self::ThumbnailFetched { device, .. }
            | Self::ImageFetched { device, .. } => Some(*device),
            Self::SystemVolumeChanged { .. } => None,
        }
    }

    /// Short name for logs
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::ConnectionChanged { .. } => "ConnectionChanged",
            Self::RemoteFeatures { .. } => "RemoteFeatures",
            Self::TrackChanged { .. } => "TrackChanged",
            Self::ElementAttributes { .. } => "ElementAttributes",
            Self::PlayPositionChanged { .. } => "PlayPositionChanged",
            Self::PlayStatusChanged { .. } => "PlayStatusChanged",
            Self::SupportedPlayerAppSettings { .. } => "SupportedPlayerAppSettings",
            Self::PlayerAppSettingChanged { .. } => "PlayerAppSettingChanged",
            Self::SetAbsoluteVolume { .. } => "SetAbsoluteVolume",
            Self::RegisterVolumeNotification { .. } => "RegisterVolumeNotification",
            Self::PassThroughResponse { .. } => "PassThroughResponse",
            Self::GroupNavigationResponse { .. } => "GroupNavigationResponse",
            Self::SetPlayerAppSettingResponse { .. } => "SetPlayerAppSettingResponse",
            Self::ImageSessionUp { .. } => "ImageSessionUp",
            Self::ImageSessionDown { .. } => "ImageSessionDown",
            Self::ThumbnailFetched { .. } => "ThumbnailFetched",
            Self::ImageFetched { .. } => "ImageFetched",
            Self::SystemVolumeChanged { .. } => "SystemVolumeChanged",
        }
    }
}
