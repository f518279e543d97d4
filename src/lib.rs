#![no_std]
#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![allow(clippy::too_many_lines)]

#[macro_use]
mod fmt;

mod address;
pub mod api;
pub mod codec;
pub mod constants;
mod controller;
pub mod event;
pub mod gate;
pub mod player;
pub mod processor;
pub mod session;
pub mod track;
pub mod traits;
pub mod volume;

#[cfg(test)]
mod test_support;

use crate::codec::{PlaybackSnapshot, PlayerSettings};
use crate::constants::{EVENT_QUEUE_DEPTH, MAX_CONNECTED_DEVICES, MAX_MIME_TYPE_LENGTH};
use crate::event::{AvrcpEvent, ConnectionState};
use crate::gate::KeyState;
use crate::track::MediaMetadata;
use embassy_sync::{blocking_mutex::raw::RawMutex, channel::Channel, mutex::Mutex};
use heapless::{String, Vec};

pub use address::BluetoothAddress;
pub use controller::AvrcpController;

/// AVRCP controller errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AvrcpError {
    /// No remote device is connected, or the address is not the connected one
    DeviceNotConnected,
    /// A remote device is already connected
    AlreadyConnected,
    /// The pass-through command is not allowed in the current play status
    CommandNotAllowed,
    /// The remote did not announce support for the requested setting values
    SettingNotSupported,
    /// The session has not reached the state the operation needs
    NotReady,
    /// The controller message queue is full
    QueueFull,
    /// Invalid parameter provided (e.g., malformed address)
    InvalidParameter,
    /// The system volume listener was not registered
    ListenerNotRegistered,
    /// The processor answered with a response of the wrong kind
    UnexpectedResponse,
}

impl core::fmt::Display for AvrcpError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let text = match self {
            Self::DeviceNotConnected => "device not connected",
            Self::AlreadyConnected => "a device is already connected",
            Self::CommandNotAllowed => "command not allowed in current play status",
            Self::SettingNotSupported => "player application setting not supported",
            Self::NotReady => "session not ready",
            Self::QueueFull => "message queue full",
            Self::InvalidParameter => "invalid parameter",
            Self::ListenerNotRegistered => "volume listener not registered",
            Self::UnexpectedResponse => "unexpected response",
        };
        f.write_str(text)
    }
}

/// Options for configuring an `AvrcpController` instance
///
/// The cover-art fields are the defaults used until the consumer calls
/// `start_fetching_album_art`, and again after every disconnect.
///
/// # Examples
///
/// ```rust
/// use remotebird::AvrcpControllerOptions;
///
/// let options = AvrcpControllerOptions {
///     cover_art_mime_type: "PNG",
///     cover_art_height: 200,
///     cover_art_width: 200,
///     ..AvrcpControllerOptions::default()
/// };
/// assert_eq!(options.cover_art_max_size, 200_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AvrcpControllerOptions {
    /// Cover-art encoding requested from the image channel
    pub cover_art_mime_type: &'static str,
    /// Cover-art height in pixels
    pub cover_art_height: u32,
    /// Cover-art width in pixels
    pub cover_art_width: u32,
    /// Maximum cover-art size in bytes
    pub cover_art_max_size: u64,
    /// Ask the system volume service to show its UI on remote volume changes
    pub volume_show_ui: bool,
    /// Inform the audio-routing service when the remote starts playing
    pub notify_audio_routing: bool,
}

impl Default for AvrcpControllerOptions {
    fn default() -> Self {
        Self {
            cover_art_mime_type: "JPEG",
            cover_art_height: 500,
            cover_art_width: 500,
            cover_art_max_size: 200_000,
            volume_show_ui: true,
            notify_audio_routing: true,
        }
    }
}

/// Queues connecting producers (transport glue, API callers) to the processor
///
/// All inbound events and API requests share one FIFO, so the controller sees
/// them in arrival order. Responses to API requests come back on a second
/// channel; the API lock keeps one request/response pair in flight at a time.
///
/// `N` is the queue depth. Place the channels in a `static` with a
/// `CriticalSectionRawMutex` to share them between Embassy tasks.
pub struct AvrcpChannels<M: RawMutex, const N: usize = EVENT_QUEUE_DEPTH> {
    messages: Channel<M, Message, N>,
    responses: Channel<M, Response, N>,
    api_lock: Mutex<M, ()>,
}

impl<M: RawMutex, const N: usize> AvrcpChannels<M, N> {
    /// Create empty channels
    #[must_use]
    pub const fn new() -> Self {
        Self {
            messages: Channel::new(),
            responses: Channel::new(),
            api_lock: Mutex::new(()),
        }
    }

    /// Queue an inbound event without waiting
    ///
    /// # Errors
    ///
    /// Returns `AvrcpError::QueueFull` if the queue has no free slot.
    pub fn post_event(&self, event: AvrcpEvent) -> Result<(), AvrcpError> {
        self.messages
            .try_send(Message::Event(event))
            .map_err(|_| AvrcpError::QueueFull)
    }

    /// Queue an inbound event, waiting for a free slot
    pub async fn send_event(&self, event: AvrcpEvent) {
        self.messages.send(Message::Event(event)).await;
    }

    /// Number of messages waiting for the processor
    #[must_use]
    pub fn pending_messages(&self) -> usize {
        self.messages.len()
    }
}

impl<M: RawMutex, const N: usize> Default for AvrcpChannels<M, N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the processor dequeues
#[derive(Debug, Clone)]
pub(crate) enum Message {
    /// Inbound event from a collaborator
    Event(AvrcpEvent),
    /// Outbound request from the API
    Request(Request),
}

/// API requests sent to the processor
#[derive(Debug, Clone)]
pub(crate) enum Request {
    /// Send a pass-through command
    SendPassThrough {
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    },
    /// Send a group navigation command
    SendGroupNavigation {
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    },
    /// Change player application settings
    SetPlayerAppSettings(PlayerSettings),
    /// Subscribe to cover art
    StartFetchingAlbumArt {
        mime_type: String<MAX_MIME_TYPE_LENGTH>,
        height: u32,
        width: u32,
        max_size: u64,
    },
    /// Get the current track metadata
    GetMetadata,
    /// Get the current playback state
    GetPlaybackState,
    /// Get the current player settings
    GetPlayerSettings,
    /// Get the connected devices
    GetConnectedDevices,
    /// Get the connection state of a device
    GetConnectionState(BluetoothAddress),
    /// Tear down the session without a transport event
    Shutdown,
}

/// API responses sent back from the processor
#[derive(Debug, Clone)]
pub(crate) enum Response {
    /// Request applied
    Done,
    /// Settings request accepted or rejected
    Accepted(bool),
    /// Current track metadata
    Metadata(Option<MediaMetadata>),
    /// Current playback state
    PlaybackState(PlaybackSnapshot),
    /// Current player settings
    PlayerSettings(Option<PlayerSettings>),
    /// Connected devices
    ConnectedDevices(Vec<BluetoothAddress, MAX_CONNECTED_DEVICES>),
    /// Connection state of the requested device
    ConnectionState(ConnectionState),
    /// Error occurred
    Error(AvrcpError),
}
