//! Collaborator interfaces
//!
//! The controller never performs I/O itself. Commands, notifications and image
//! requests go out through these traits and are fire-and-forget: completions
//! come back later as [`AvrcpEvent`](crate::event::AvrcpEvent)s.

use crate::codec::{PlaybackSnapshot, PlayerSettings};
use crate::event::ConnectionState;
use crate::gate::KeyState;
use crate::track::MediaMetadata;
use crate::volume::NotificationResponse;
use crate::{AvrcpError, BluetoothAddress};

/// AVRCP control channel of the native stack
pub trait AvrcpTransport {
    /// Send a pass-through command
    fn send_pass_through_command(&mut self, device: BluetoothAddress, op: u8, key_state: KeyState);

    /// Send a group navigation command
    fn send_group_navigation_command(
        &mut self,
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    );

    /// Set player application setting values, as `(attribute id, value)` pairs
    fn set_player_application_setting_values(
        &mut self,
        device: BluetoothAddress,
        settings: &[(u8, u8)],
    );

    /// Answer an absolute volume command
    fn send_absolute_volume_response(&mut self, device: BluetoothAddress, volume: u8, label: u8);

    /// Answer a volume change notification registration
    fn send_register_volume_response(
        &mut self,
        device: BluetoothAddress,
        response: NotificationResponse,
        volume: u8,
        label: u8,
    );

    /// Request element attributes of the current track; empty means all
    fn request_element_attributes(&mut self, device: BluetoothAddress, attributes: &[u32]);
}

/// Cover-art side channel (BIP over OBEX)
pub trait ImageTransfer {
    /// Open the channel on the given PSM
    fn connect(&mut self, device: BluetoothAddress, psm: u16);

    /// Fetch the linked thumbnail of an image handle
    fn fetch_thumbnail(&mut self, handle: &str);

    /// Fetch an image in the given encoding and pixel size
    fn fetch_image(&mut self, handle: &str, encoding: &str, pixel: &str, max_size: u64);

    /// Close the channel and drop any fetch in flight
    fn disconnect(&mut self);
}

/// Media-session consumer notified of state changes
pub trait MediaSession {
    /// Current track metadata changed
    fn metadata_changed(&mut self, metadata: &MediaMetadata);

    /// Playback state changed
    fn playback_state_changed(&mut self, playback: PlaybackSnapshot);

    /// Player application settings changed
    fn player_settings_changed(&mut self, settings: PlayerSettings);

    /// Connection state of a device changed
    fn connection_state_changed(
        &mut self,
        old: ConnectionState,
        new: ConnectionState,
        device: BluetoothAddress,
    );
}

/// System audio volume service
pub trait SystemVolume {
    /// Highest volume index
    fn max_volume(&self) -> u32;

    /// Current volume index
    fn current_volume(&self) -> u32;

    /// Set the volume index
    fn set_volume(&mut self, index: u32, show_ui: bool);

    /// Start reporting volume changes as `SystemVolumeChanged` events
    fn register_listener(&mut self);

    /// Stop reporting volume changes
    ///
    /// # Errors
    ///
    /// Returns `AvrcpError::ListenerNotRegistered` if no listener was registered.
    fn unregister_listener(&mut self) -> Result<(), AvrcpError>;
}

/// Audio routing service (A2DP sink side)
pub trait AudioRouting {
    /// The remote started playing
    fn remote_playing(&mut self, device: BluetoothAddress);
}
