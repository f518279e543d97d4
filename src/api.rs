//! `Remotebird` API Functions
//!
//! This module provides the public API functions for talking to the processor
//! task. Every call queues a request behind the events already waiting, so it
//! sees the session exactly as those events leave it, then waits for the
//! processor's answer. Calls from several tasks are served one at a time.
//!
//! # Cancellation
//!
//! Responses are not tagged. Dropping an API future after its request was
//! queued (for example from a losing `select` arm or a timeout) leaves the
//! processor's answer in the response channel, and the next caller receives
//! it instead of its own. Let API calls run to completion.
//!
//! The API functions are not coupled to any specific transport or media
//! framework; they only need the [`AvrcpChannels`] the processor drains.
//!
//! # Usage
//!
//! ```rust,ignore
//! use remotebird::api;
//! use remotebird::constants::pass_through;
//! use remotebird::gate::KeyState;
//!
//! // Ask for cover art in the default format
//! api::start_fetching_album_art(&CHANNELS, "JPEG", 500, 500, 200_000).await?;
//!
//! // Press play on the connected device
//! if let Some(device) = api::get_connected_devices(&CHANNELS).await?.first() {
//!     api::send_pass_through_command(&CHANNELS, *device, pass_through::PLAY, KeyState::Pressed)
//!         .await?;
//! }
//! ```

use crate::codec::{PlaybackSnapshot, PlayerSettings};
use crate::constants::MAX_CONNECTED_DEVICES;
use crate::event::ConnectionState;
use crate::gate::KeyState;
use crate::track::MediaMetadata;
use crate::{AvrcpChannels, AvrcpError, BluetoothAddress, Message, Request, Response};
use embassy_sync::blocking_mutex::raw::RawMutex;
use heapless::{String, Vec};

async fn request<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
    request: Request,
) -> Response {
    let _guard = channels.api_lock.lock().await;
    channels.messages.send(Message::Request(request)).await;
    channels.responses.receive().await
}

/// Send a pass-through command to the connected device.
///
/// # Errors
///
/// Returns an error if `device` is not connected or the command is not allowed in the current play status.
pub async fn send_pass_through_command<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
    device: BluetoothAddress,
    op: u8,
    key_state: KeyState,
) -> Result<(), AvrcpError> {
    match request(
        channels,
        Request::SendPassThrough {
            device,
            op,
            key_state,
        },
    )
    .await
    {
        Response::Done => Ok(()),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Send a group navigation command to the connected device.
///
/// # Errors
///
/// Returns an error if `device` is not connected.
pub async fn send_group_navigation_command<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
    device: BluetoothAddress,
    op: u8,
    key_state: KeyState,
) -> Result<(), AvrcpError> {
    match request(
        channels,
        Request::SendGroupNavigation {
            device,
            op,
            key_state,
        },
    )
    .await
    {
        Response::Done => Ok(()),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Change player application settings on the connected device.
///
/// Returns `false` if there is no addressed player or the remote did not announce the requested values.
///
/// # Errors
///
/// Returns an error if the response is unexpected.
pub async fn set_player_application_settings<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
    settings: PlayerSettings,
) -> Result<bool, AvrcpError> {
    match request(channels, Request::SetPlayerAppSettings(settings)).await {
        Response::Accepted(accepted) => Ok(accepted),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Subscribe to cover art in the given encoding and size.
///
/// # Errors
///
/// Returns an error if `mime_type` is too long or the response is unexpected.
pub async fn start_fetching_album_art<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
    mime_type: &str,
    height: u32,
    width: u32,
    max_size: u64,
) -> Result<(), AvrcpError> {
    let mime_type = String::try_from(mime_type).map_err(|()| AvrcpError::InvalidParameter)?;
    match request(
        channels,
        Request::StartFetchingAlbumArt {
            mime_type,
            height,
            width,
            max_size,
        },
    )
    .await
    {
        Response::Done => Ok(()),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Get the metadata of the current track, if any.
///
/// # Errors
///
/// Returns an error if the response is unexpected.
pub async fn get_current_metadata<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
) -> Result<Option<MediaMetadata>, AvrcpError> {
    match request(channels, Request::GetMetadata).await {
        Response::Metadata(metadata) => Ok(metadata),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Get the playback state of the addressed player.
///
/// # Errors
///
/// Returns an error if the response is unexpected.
pub async fn get_current_playback_state<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
) -> Result<PlaybackSnapshot, AvrcpError> {
    match request(channels, Request::GetPlaybackState).await {
        Response::PlaybackState(playback) => Ok(playback),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Get the player application settings of the addressed player, if any.
///
/// # Errors
///
/// Returns an error if the response is unexpected.
pub async fn get_current_player_settings<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
) -> Result<Option<PlayerSettings>, AvrcpError> {
    match request(channels, Request::GetPlayerSettings).await {
        Response::PlayerSettings(settings) => Ok(settings),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Get the connected devices.
///
/// # Errors
///
/// Returns an error if the response is unexpected.
pub async fn get_connected_devices<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
) -> Result<Vec<BluetoothAddress, MAX_CONNECTED_DEVICES>, AvrcpError> {
    match request(channels, Request::GetConnectedDevices).await {
        Response::ConnectedDevices(devices) => Ok(devices),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Get the connection state of a device.
///
/// # Errors
///
/// Returns an error if the response is unexpected.
pub async fn get_connection_state<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
    device: BluetoothAddress,
) -> Result<ConnectionState, AvrcpError> {
    match request(channels, Request::GetConnectionState(device)).await {
        Response::ConnectionState(state) => Ok(state),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}

/// Tear down the session, releasing the image channel and the volume listener.
///
/// # Errors
///
/// Returns an error if the response is unexpected.
pub async fn shutdown<M: RawMutex, const N: usize>(
    channels: &AvrcpChannels<M, N>,
) -> Result<(), AvrcpError> {
    match request(channels, Request::Shutdown).await {
        Response::Done => Ok(()),
        Response::Error(e) => Err(e),
        _ => Err(AvrcpError::UnexpectedResponse),
    }
}
