use super::{AvrcpController, tracked_session};
use crate::codec::PlayStatus;
use crate::event::{AvrcpEvent, ConnectionState};
use crate::session::{CURRENT_TRACK_UID, ImageChannelState, SessionState};
use crate::track::{ElementAttributes, ImageHandle, ImageLocation, Track, bounded};
use crate::traits::{AudioRouting, AvrcpTransport, ImageTransfer, MediaSession, SystemVolume};
use crate::{AvrcpError, BluetoothAddress};

impl<T, I, S, V, A> AvrcpController<T, I, S, V, A>
where
    T: AvrcpTransport,
    I: ImageTransfer,
    S: MediaSession,
    V: SystemVolume,
    A: AudioRouting,
{
    /// Apply one inbound event
    ///
    /// # Errors
    ///
    /// - `AvrcpError::AlreadyConnected` if a second device connects
    /// - `AvrcpError::DeviceNotConnected` if the event comes from a device
    ///   other than the connected one, or nobody is connected
    /// - `AvrcpError::NotReady` if the session lacks the state the event updates
    pub fn handle_event(&mut self, event: AvrcpEvent) -> Result<(), AvrcpError> {
        trace!("[AVRCP] Event {}", event.name());

        match event {
            AvrcpEvent::ConnectionChanged { device, state } => {
                self.connection_changed(device, state)
            }
            AvrcpEvent::RemoteFeatures {
                device,
                features,
                cover_art_psm,
            } => self.apply_remote_features(device, features, cover_art_psm),
            AvrcpEvent::TrackChanged { device, attributes }
            | AvrcpEvent::ElementAttributes { device, attributes } => {
                self.track_changed(device, &attributes)
            }
            AvrcpEvent::PlayPositionChanged {
                device,
                duration_ms,
                position_ms,
            } => self.play_position_changed(device, duration_ms, position_ms),
            AvrcpEvent::PlayStatusChanged { device, status } => {
                self.play_status_changed(device, status)
            }
            AvrcpEvent::SupportedPlayerAppSettings { device, settings } => {
                let session = tracked_session(&mut self.session, device)?;
                let player = session.player_mut().ok_or(AvrcpError::NotReady)?;
                player.apply_supported_settings(&settings);
                Ok(())
            }
            AvrcpEvent::PlayerAppSettingChanged { device, settings } => {
                let session = tracked_session(&mut self.session, device)?;
                let player = session.player_mut().ok_or(AvrcpError::NotReady)?;
                player.apply_current_settings(&settings);
                let snapshot = player.supported_settings_snapshot();
                debug!("[AVRCP] Player settings{}", snapshot);
                self.media.player_settings_changed(snapshot);
                Ok(())
            }
            AvrcpEvent::SetAbsoluteVolume {
                device,
                volume,
                label,
            } => {
                let session = tracked_session(&mut self.session, device)?;
                session.volume_mut().set_absolute_volume(
                    device,
                    volume,
                    label,
                    self.options.volume_show_ui,
                    &mut self.transport,
                    &mut self.volume,
                );
                Ok(())
            }
            AvrcpEvent::RegisterVolumeNotification { device, label } => {
                let session = tracked_session(&mut self.session, device)?;
                session
                    .volume_mut()
                    .register(device, label, &mut self.transport, &mut self.volume);
                Ok(())
            }
            AvrcpEvent::SystemVolumeChanged { value, previous } => {
                self.system_volume_changed(value, previous)
            }
            AvrcpEvent::PassThroughResponse {
                device,
                op,
                key_state,
            } => {
                tracked_session(&mut self.session, device)?;
                debug!(
                    "[AVRCP] Pass-through response op={} state={}",
                    op,
                    u8::from(key_state)
                );
                Ok(())
            }
            AvrcpEvent::GroupNavigationResponse {
                device,
                op,
                key_state,
            } => {
                tracked_session(&mut self.session, device)?;
                debug!(
                    "[AVRCP] Group navigation response op={} state={}",
                    op,
                    u8::from(key_state)
                );
                Ok(())
            }
            AvrcpEvent::SetPlayerAppSettingResponse { device, accepted } => {
                tracked_session(&mut self.session, device)?;
                debug!("[AVRCP] Set player settings accepted={}", accepted);
                Ok(())
            }
            AvrcpEvent::ImageSessionUp { device } => {
                let session = tracked_session(&mut self.session, device)?;
                info!("[AVRCP] Image channel up");
                session.set_image_channel(ImageChannelState::Connected);
                self.fetch_cover_art();
                Ok(())
            }
            AvrcpEvent::ImageSessionDown { device } => {
                let session = tracked_session(&mut self.session, device)?;
                info!("[AVRCP] Image channel down");
                session.set_image_channel(ImageChannelState::Disconnected);
                if let Some(now_playing) = session.now_playing_mut() {
                    now_playing.clear_cover_art_data();
                }
                Ok(())
            }
            AvrcpEvent::ThumbnailFetched {
                device,
                handle,
                location,
            } => self.cover_art_fetched(device, &handle, location.as_ref(), true),
            AvrcpEvent::ImageFetched {
                device,
                handle,
                location,
            } => self.cover_art_fetched(device, &handle, location.as_ref(), false),
        }
    }

    fn connection_changed(
        &mut self,
        device: BluetoothAddress,
        state: ConnectionState,
    ) -> Result<(), AvrcpError> {
        let old = self.connection_state(device);

        match (old, state) {
            (ConnectionState::Disconnected, ConnectionState::Connected) => {
                if let Some(session) = &self.session {
                    warn!(
                        "[AVRCP] {} connected while {} is, rejecting",
                        device,
                        session.device()
                    );
                    return Err(AvrcpError::AlreadyConnected);
                }
                info!("[AVRCP] Connected to {}", device);
                self.session = Some(SessionState::new(device));
            }
            (ConnectionState::Connected, ConnectionState::Disconnected) => {
                info!("[AVRCP] Disconnected from {}", device);
                self.teardown();
            }
            _ => {
                debug!("[AVRCP] No connection transition for {}", device);
                return Ok(());
            }
        }

        self.media.connection_state_changed(old, state, device);
        Ok(())
    }

    /// Replace the current track and chase its cover art
    fn track_changed(
        &mut self,
        device: BluetoothAddress,
        attributes: &ElementAttributes,
    ) -> Result<(), AvrcpError> {
        let session = tracked_session(&mut self.session, device)?;
        let now_playing = session.now_playing_mut().ok_or(AvrcpError::NotReady)?;

        let track = Track::from_attributes(CURRENT_TRACK_UID, attributes);
        let metadata = track.metadata();
        let handle: ImageHandle = bounded(track.cover_art_handle());
        now_playing.update_track(track);

        debug!("[TRACK] {}", metadata);
        self.media.metadata_changed(&metadata);

        if !self.app.cover_art_requested || !session.supports_cover_art() {
            return Ok(());
        }
        if session.image_channel() == ImageChannelState::Connected {
            self.fetch_image(&handle);
        } else {
            self.connect_image_channel();
        }
        Ok(())
    }

    fn play_position_changed(
        &mut self,
        device: BluetoothAddress,
        duration_ms: i64,
        position_ms: i64,
    ) -> Result<(), AvrcpError> {
        let session = tracked_session(&mut self.session, device)?;
        let player = session.player_mut().ok_or(AvrcpError::NotReady)?;

        player.set_play_position_ms(position_ms);
        let snapshot = player.playback_snapshot();
        self.media.playback_state_changed(snapshot);

        if let Some(track) = session
            .now_playing_mut()
            .and_then(|now_playing| now_playing.current_track_mut())
        {
            track.set_duration_ms(duration_ms);
        }
        Ok(())
    }

    fn play_status_changed(
        &mut self,
        device: BluetoothAddress,
        status: PlayStatus,
    ) -> Result<(), AvrcpError> {
        let session = tracked_session(&mut self.session, device)?;
        let player = session.player_mut().ok_or(AvrcpError::NotReady)?;

        player.set_play_status(status);
        self.media.playback_state_changed(player.playback_snapshot());

        if status == PlayStatus::Playing && self.options.notify_audio_routing {
            self.routing.remote_playing(device);
        }
        Ok(())
    }

    fn system_volume_changed(&mut self, value: u32, previous: u32) -> Result<(), AvrcpError> {
        let session = self
            .session
            .as_mut()
            .ok_or(AvrcpError::DeviceNotConnected)?;

        if value == previous || !session.supports_absolute_volume() {
            trace!("[VOLUME] Ignoring system volume {} -> {}", previous, value);
            return Ok(());
        }

        let device = session.device();
        session
            .volume_mut()
            .system_volume_changed(device, &mut self.transport, &self.volume);
        Ok(())
    }

    /// Store a fetched cover-art location on the current track
    ///
    /// Results for a handle the current track no longer carries are dropped.
    /// A thumbnail chains into a fetch of the full image.
    fn cover_art_fetched(
        &mut self,
        device: BluetoothAddress,
        handle: &str,
        location: Option<&ImageLocation>,
        is_thumbnail: bool,
    ) -> Result<(), AvrcpError> {
        let session = tracked_session(&mut self.session, device)?;
        let track = session
            .now_playing_mut()
            .and_then(|now_playing| now_playing.current_track_mut())
            .ok_or(AvrcpError::NotReady)?;

        if !track.update_cover_art(handle, location.map(ImageLocation::as_str), is_thumbnail) {
            debug!("[AVRCP] Stale cover art for handle {}", handle);
            return Ok(());
        }
        let metadata = track.metadata();

        if is_thumbnail {
            self.fetch_image(handle);
        }
        if self.app.cover_art_requested {
            self.media.metadata_changed(&metadata);
        }
        Ok(())
    }
}
