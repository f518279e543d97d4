//! AVRCP Controller - session state machine
//!
//! [`AvrcpController`] owns the session of the connected remote and the
//! collaborators it talks to. Every inbound event and every API request is
//! applied here, one at a time, by the processor draining the message queue.
//!
//! ## Structure
//!
//! - `event_processor` applies inbound [`AvrcpEvent`](crate::event::AvrcpEvent)s
//! - `request_processor` answers API requests
//! - this module holds the state, the queries and the outbound commands
//!
//! The controller can also be driven directly, without the processor, when
//! the application already serializes access to it.
//!
//! ## Lifecycle
//!
//! 1. `ConnectionChanged(Connected)` creates the session with a default player
//! 2. `RemoteFeatures` sets the capabilities and, with metadata support,
//!    creates the now playing list; with cover art support the image channel
//!    is opened right away
//! 3. Track, status and settings events update the session and notify the
//!    media session
//! 4. `ConnectionChanged(Disconnected)` or [`AvrcpController::shutdown`] tears
//!    everything down

mod event_processor;
mod request_processor;

use crate::codec::{PlaybackSnapshot, PlayerSettings};
use crate::constants::{DEFAULT_PSM, MAX_CONNECTED_DEVICES, media_attribute, pass_through};
use crate::event::ConnectionState;
use crate::gate::{KeyState, is_pass_through_allowed, is_pts_operation};
use crate::player::Player;
use crate::session::{
    AppProperties, ImageChannelState, NowPlaying, RemoteCapabilities, SessionState,
};
use crate::track::{MediaMetadata, Track, bounded};
use crate::traits::{AudioRouting, AvrcpTransport, ImageTransfer, MediaSession, SystemVolume};
use crate::{AvrcpControllerOptions, AvrcpError, BluetoothAddress};
use heapless::Vec;

/// AVRCP controller state engine
///
/// Generic over its collaborators:
/// - `T`: AVRCP transport
/// - `I`: image transfer channel
/// - `S`: media session
/// - `V`: system volume
/// - `A`: audio routing
pub struct AvrcpController<T, I, S, V, A> {
    transport: T,
    image: I,
    media: S,
    volume: V,
    routing: A,
    options: AvrcpControllerOptions,
    app: AppProperties,
    session: Option<SessionState>,
}

/// Session of `device`, if it is the tracked one
fn tracked_session(
    session: &mut Option<SessionState>,
    device: BluetoothAddress,
) -> Result<&mut SessionState, AvrcpError> {
    session
        .as_mut()
        .filter(|s| s.device() == device)
        .ok_or(AvrcpError::DeviceNotConnected)
}

impl<T, I, S, V, A> AvrcpController<T, I, S, V, A>
where
    T: AvrcpTransport,
    I: ImageTransfer,
    S: MediaSession,
    V: SystemVolume,
    A: AudioRouting,
{
    /// Create a controller with default options
    pub fn new(transport: T, image: I, media: S, volume: V, routing: A) -> Self {
        Self::with_options(
            transport,
            image,
            media,
            volume,
            routing,
            AvrcpControllerOptions::default(),
        )
    }

    /// Create a controller with custom options
    pub fn with_options(
        transport: T,
        image: I,
        media: S,
        volume: V,
        routing: A,
        options: AvrcpControllerOptions,
    ) -> Self {
        Self {
            transport,
            image,
            media,
            volume,
            routing,
            app: AppProperties::from_options(&options),
            options,
            session: None,
        }
    }

    /// Get a reference to the options
    #[must_use]
    pub fn options(&self) -> &AvrcpControllerOptions {
        &self.options
    }

    /// Current cover-art subscription
    #[must_use]
    pub fn app_properties(&self) -> &AppProperties {
        &self.app
    }

    /// Session of the connected device
    #[must_use]
    pub fn session(&self) -> Option<&SessionState> {
        self.session.as_ref()
    }

    /// Address of the connected device
    #[must_use]
    pub fn connected_device(&self) -> Option<BluetoothAddress> {
        self.session.as_ref().map(SessionState::device)
    }

    /// Connected devices; at most one
    #[must_use]
    pub fn connected_devices(&self) -> Vec<BluetoothAddress, MAX_CONNECTED_DEVICES> {
        self.connected_device().into_iter().collect()
    }

    /// Connection state of `device`
    #[must_use]
    pub fn connection_state(&self, device: BluetoothAddress) -> ConnectionState {
        if self.connected_device() == Some(device) {
            ConnectionState::Connected
        } else {
            ConnectionState::Disconnected
        }
    }

    /// Metadata of the current track
    #[must_use]
    pub fn current_metadata(&self) -> Option<MediaMetadata> {
        self.session
            .as_ref()
            .and_then(SessionState::now_playing)
            .and_then(NowPlaying::current_track)
            .map(Track::metadata)
    }

    /// Playback state of the addressed player
    ///
    /// Reports [`PlaybackSnapshot::error`] while there is no player.
    #[must_use]
    pub fn current_playback_state(&self) -> PlaybackSnapshot {
        self.session
            .as_ref()
            .and_then(SessionState::player)
            .map_or_else(PlaybackSnapshot::error, Player::playback_snapshot)
    }

    /// Player application settings of the addressed player
    #[must_use]
    pub fn current_player_settings(&self) -> Option<PlayerSettings> {
        self.session
            .as_ref()
            .and_then(SessionState::player)
            .map(Player::supported_settings_snapshot)
    }

    /// Send a pass-through command to the connected device
    ///
    /// Until the remote features and the addressed player are known, and for
    /// the qualification test tool codes, the command is sent as is. Otherwise
    /// it must pass the command gate for the current play status.
    ///
    /// # Errors
    ///
    /// - `AvrcpError::DeviceNotConnected` if `device` is not the connected one
    /// - `AvrcpError::CommandNotAllowed` if the gate refuses the command
    pub fn send_pass_through_command(
        &mut self,
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    ) -> Result<(), AvrcpError> {
        let session = self
            .session
            .as_ref()
            .filter(|s| s.device() == device)
            .ok_or(AvrcpError::DeviceNotConnected)?;

        let status = session
            .capabilities()
            .filter(|c| !c.is_empty())
            .and(session.player())
            .map(Player::play_status);

        match status {
            Some(status) if !is_pts_operation(op) => {
                if !is_pass_through_allowed(op, status) {
                    warn!(
                        "[AVRCP] Pass-through {} not allowed in status {}",
                        op,
                        u8::from(status)
                    );
                    return Err(AvrcpError::CommandNotAllowed);
                }
            }
            _ => debug!("[AVRCP] Pass-through {} sent without gating", op),
        }

        if op == pass_through::PTS_GET_ELEMENT_ATTRIBUTES {
            self.transport.request_element_attributes(
                device,
                &[media_attribute::TITLE, media_attribute::COVER_ART_HANDLE],
            );
        } else {
            self.transport
                .send_pass_through_command(device, op, key_state);
        }
        Ok(())
    }

    /// Send a group navigation command to the connected device
    ///
    /// # Errors
    ///
    /// Returns `AvrcpError::DeviceNotConnected` if `device` is not the connected one.
    pub fn send_group_navigation_command(
        &mut self,
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    ) -> Result<(), AvrcpError> {
        if self.connected_device() != Some(device) {
            return Err(AvrcpError::DeviceNotConnected);
        }
        self.transport
            .send_group_navigation_command(device, op, key_state);
        Ok(())
    }

    /// Change player application settings on the remote
    ///
    /// The settings are flattened in family order (equalizer, repeat,
    /// shuffle, scan) and only sent if the remote announced every value.
    ///
    /// # Errors
    ///
    /// - `AvrcpError::NotReady` if there is no session or addressed player
    /// - `AvrcpError::InvalidParameter` if `settings` declares no family
    /// - `AvrcpError::SettingNotSupported` if any value was not announced
    pub fn set_player_application_settings(
        &mut self,
        settings: &PlayerSettings,
    ) -> Result<(), AvrcpError> {
        let session = self.session.as_ref().ok_or(AvrcpError::NotReady)?;
        let player = session.player().ok_or(AvrcpError::NotReady)?;

        let pairs = settings.to_wire_pairs();
        if pairs.is_empty() {
            return Err(AvrcpError::InvalidParameter);
        }
        if !player.is_setting_supported(&pairs) {
            return Err(AvrcpError::SettingNotSupported);
        }

        self.transport
            .set_player_application_setting_values(session.device(), &pairs);
        Ok(())
    }

    /// Subscribe to cover art with the given format
    ///
    /// Opens the image channel, or fetches right away if it is already up.
    pub fn start_fetching_album_art(
        &mut self,
        mime_type: &str,
        height: u32,
        width: u32,
        max_size: u64,
    ) {
        info!(
            "[AVRCP] Cover art requested: {} {}*{} max {}",
            mime_type, width, height, max_size
        );
        self.app.cover_art_requested = true;
        self.app.mime_type = bounded(mime_type);
        self.app.height = height;
        self.app.width = width;
        self.app.max_size = max_size;

        self.connect_or_fetch_cover_art();
    }

    /// Tear down the session without waiting for a transport event
    ///
    /// Safe to call at any time, any number of times.
    pub fn shutdown(&mut self) {
        self.teardown();
    }

    /// Open the image channel, or fetch cover art if it is already up
    fn connect_or_fetch_cover_art(&mut self) {
        let Some(session) = self.session.as_ref() else {
            return;
        };
        if !session.supports_cover_art() {
            return;
        }

        if session.image_channel() == ImageChannelState::Connected {
            self.fetch_cover_art();
        } else {
            self.connect_image_channel();
        }
    }

    /// Request the image channel on the announced PSM
    fn connect_image_channel(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let psm = session.cover_art_psm();
        if psm == DEFAULT_PSM {
            debug!("[AVRCP] No cover art PSM, not connecting image channel");
            return;
        }

        session.set_image_channel(ImageChannelState::Connecting);
        self.image.connect(session.device(), psm);
    }

    /// Start a cover-art fetch for the current track
    ///
    /// Without a handle, the element attributes are requested again so that a
    /// fresh handle arrives with the next track event.
    fn fetch_cover_art(&mut self) {
        if !self.app.cover_art_requested {
            return;
        }
        let Some(session) = self.session.as_ref() else {
            return;
        };
        let Some(track) = session.now_playing().and_then(NowPlaying::current_track) else {
            return;
        };

        if track.has_cover_art_handle() {
            self.image.fetch_thumbnail(track.cover_art_handle());
        } else {
            debug!("[AVRCP] No cover art handle, requesting element attributes");
            self.transport
                .request_element_attributes(session.device(), &[]);
        }
    }

    /// Fetch the full image for `handle` in the subscribed format
    fn fetch_image(&mut self, handle: &str) {
        let pixel = self.app.pixel_spec();
        self.image
            .fetch_image(handle, &self.app.mime_type, &pixel, self.app.max_size);
    }

    /// Drop the session and release every collaborator resource
    fn teardown(&mut self) {
        let Some(mut session) = self.session.take() else {
            return;
        };
        info!("[AVRCP] Tearing down session for {}", session.device());

        self.image.disconnect();
        session.volume_mut().release(&mut self.volume);
        self.app = AppProperties::from_options(&self.options);
    }

    /// Record remote features once
    fn apply_remote_features(
        &mut self,
        device: BluetoothAddress,
        features: RemoteCapabilities,
        cover_art_psm: u16,
    ) -> Result<(), AvrcpError> {
        let session = tracked_session(&mut self.session, device)?;
        if !session.set_capabilities(features) {
            warn!(
                "[AVRCP] Features already known, ignoring {}",
                features.raw()
            );
            return Ok(());
        }
        info!(
            "[AVRCP] Remote features {} psm {}",
            features.raw(),
            cover_art_psm
        );

        if !features.metadata() {
            return Ok(());
        }
        session.create_now_playing();
        if features.cover_art() {
            session.set_cover_art_psm(cover_art_psm);
            self.connect_image_channel();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{PlaybackState, Setting, SettingState};
    use crate::constants::{feature, group_navigation, setting_attribute, setting_value};
    use crate::event::AvrcpEvent;
    use crate::test_support::{Call, TestBed, controller, device, other_device};

    fn connect(controller: &mut crate::test_support::TestController<'_>) {
        controller
            .handle_event(AvrcpEvent::ConnectionChanged {
                device: device(),
                state: ConnectionState::Connected,
            })
            .unwrap();
    }

    #[test]
    fn test_queries_without_session() {
        let bed = TestBed::new();
        let controller = controller(&bed);

        assert_eq!(controller.current_metadata(), None);
        assert_eq!(controller.current_player_settings(), None);
        assert_eq!(
            controller.current_playback_state(),
            PlaybackSnapshot::error()
        );
        assert!(controller.connected_devices().is_empty());
        assert_eq!(
            controller.connection_state(device()),
            ConnectionState::Disconnected
        );
    }

    #[test]
    fn test_pass_through_requires_connected_device() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);

        assert_eq!(
            controller.send_pass_through_command(device(), pass_through::PLAY, KeyState::Pressed),
            Err(AvrcpError::DeviceNotConnected)
        );
        connect(&mut controller);
        assert_eq!(
            controller.send_pass_through_command(
                other_device(),
                pass_through::PLAY,
                KeyState::Pressed
            ),
            Err(AvrcpError::DeviceNotConnected)
        );
    }

    #[test]
    fn test_pass_through_bootstrap_before_features() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);
        connect(&mut controller);
        bed.clear();

        // Default player is stopped, but without features nothing is gated.
        controller
            .send_pass_through_command(device(), pass_through::VOLUME_UP, KeyState::Pressed)
            .unwrap();
        assert_eq!(
            bed.calls().as_slice(),
            &[Call::PassThrough {
                device: device(),
                op: pass_through::VOLUME_UP,
                key_state: KeyState::Pressed,
            }]
        );
    }

    #[test]
    fn test_pass_through_gated_after_features() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);
        connect(&mut controller);
        controller
            .handle_event(AvrcpEvent::RemoteFeatures {
                device: device(),
                features: RemoteCapabilities::from_raw(feature::METADATA),
                cover_art_psm: 0,
            })
            .unwrap();
        controller
            .handle_event(AvrcpEvent::PlayStatusChanged {
                device: device(),
                status: crate::codec::PlayStatus::Playing,
            })
            .unwrap();
        bed.clear();

        assert_eq!(
            controller.send_pass_through_command(device(), pass_through::PLAY, KeyState::Pressed),
            Err(AvrcpError::CommandNotAllowed)
        );
        controller
            .send_pass_through_command(device(), pass_through::PAUSE, KeyState::Released)
            .unwrap();
        assert_eq!(
            bed.calls().as_slice(),
            &[Call::PassThrough {
                device: device(),
                op: pass_through::PAUSE,
                key_state: KeyState::Released,
            }]
        );
    }

    #[test]
    fn test_pts_element_attributes_carve_out() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);
        connect(&mut controller);
        controller
            .handle_event(AvrcpEvent::RemoteFeatures {
                device: device(),
                features: RemoteCapabilities::from_raw(feature::METADATA),
                cover_art_psm: 0,
            })
            .unwrap();
        bed.clear();

        controller
            .send_pass_through_command(
                device(),
                pass_through::PTS_GET_ELEMENT_ATTRIBUTES,
                KeyState::Pressed,
            )
            .unwrap();
        controller
            .send_pass_through_command(
                device(),
                pass_through::PTS_GET_PLAY_STATUS,
                KeyState::Pressed,
            )
            .unwrap();

        assert_eq!(
            bed.calls().as_slice(),
            &[
                Call::RequestElementAttributes(
                    Vec::from_slice(&[
                        media_attribute::TITLE,
                        media_attribute::COVER_ART_HANDLE
                    ])
                    .unwrap()
                ),
                Call::PassThrough {
                    device: device(),
                    op: pass_through::PTS_GET_PLAY_STATUS,
                    key_state: KeyState::Pressed,
                },
            ]
        );
    }

    #[test]
    fn test_group_navigation_forwarded_when_connected() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);
        assert_eq!(
            controller.send_group_navigation_command(
                device(),
                group_navigation::NEXT_GROUP,
                KeyState::Pressed
            ),
            Err(AvrcpError::DeviceNotConnected)
        );

        connect(&mut controller);
        bed.clear();
        controller
            .send_group_navigation_command(
                device(),
                group_navigation::PREVIOUS_GROUP,
                KeyState::Released,
            )
            .unwrap();
        assert_eq!(
            bed.calls().as_slice(),
            &[Call::GroupNavigation {
                device: device(),
                op: group_navigation::PREVIOUS_GROUP,
                key_state: KeyState::Released,
            }]
        );
    }

    #[test]
    fn test_set_player_application_settings() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);
        let request = PlayerSettings::default()
            .with(Setting::Shuffle, SettingState::AllTrack)
            .with(Setting::Repeat, SettingState::Off);

        assert_eq!(
            controller.set_player_application_settings(&request),
            Err(AvrcpError::NotReady)
        );

        connect(&mut controller);
        controller
            .handle_event(AvrcpEvent::SupportedPlayerAppSettings {
                device: device(),
                settings: crate::codec::parse_supported_settings(&[
                    0x02, 0x02, 0x01, 0x03, 0x03, 0x02, 0x01, 0x02,
                ]),
            })
            .unwrap();
        bed.clear();

        controller.set_player_application_settings(&request).unwrap();
        assert_eq!(
            bed.calls().as_slice(),
            &[Call::SetSettings(
                Vec::from_slice(&[
                    (setting_attribute::REPEAT, setting_value::REPEAT_OFF),
                    (setting_attribute::SHUFFLE, setting_value::SHUFFLE_ALL_TRACK),
                ])
                .unwrap()
            )]
        );

        bed.clear();
        let unsupported = PlayerSettings::default().with(Setting::Repeat, SettingState::Group);
        assert_eq!(
            controller.set_player_application_settings(&unsupported),
            Err(AvrcpError::SettingNotSupported)
        );
        assert_eq!(
            controller.set_player_application_settings(&PlayerSettings::default()),
            Err(AvrcpError::InvalidParameter)
        );
        assert!(bed.calls().is_empty());
    }

    #[test]
    fn test_start_fetching_album_art_updates_properties() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);

        controller.start_fetching_album_art("PNG", 300, 200, 64_000);
        let app = controller.app_properties();
        assert!(app.cover_art_requested);
        assert_eq!(app.mime_type.as_str(), "PNG");
        assert_eq!(app.pixel_spec().as_str(), "200*300");
        assert_eq!(app.max_size, 64_000);
        assert!(bed.calls().is_empty());
    }

    #[test]
    fn test_shutdown_is_idempotent() {
        let bed = TestBed::new();
        let mut controller = controller(&bed);
        connect(&mut controller);
        controller.start_fetching_album_art("PNG", 300, 200, 64_000);
        bed.clear();

        controller.shutdown();
        controller.shutdown();

        assert!(controller.session().is_none());
        assert!(!controller.app_properties().cover_art_requested);
        assert_eq!(
            controller.current_playback_state().state,
            PlaybackState::Error
        );
        assert_eq!(
            bed.calls().as_slice(),
            &[Call::ImageDisconnect, Call::UnregisterListener]
        );
    }
}
