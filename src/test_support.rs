//! Recording collaborators shared by the unit tests.

use crate::codec::{PlaybackSnapshot, PlayerSettings};
use crate::constants::{MAX_ELEMENT_ATTRIBUTES, MAX_PLAYER_SETTINGS};
use crate::event::ConnectionState;
use crate::gate::KeyState;
use crate::track::{ImageHandle, MediaMetadata, bounded};
use crate::traits::{AudioRouting, AvrcpTransport, ImageTransfer, MediaSession, SystemVolume};
use crate::volume::NotificationResponse;
use crate::{AvrcpController, AvrcpControllerOptions, AvrcpError, BluetoothAddress};
use core::cell::{Cell, RefCell};
use heapless::{String, Vec};

pub(crate) const CALL_LOG_DEPTH: usize = 32;

pub(crate) fn device() -> BluetoothAddress {
    BluetoothAddress::new([0x00, 0x1A, 0x7D, 0xDA, 0x71, 0x13])
}

pub(crate) fn other_device() -> BluetoothAddress {
    BluetoothAddress::new([0x00, 0x1A, 0x7D, 0xDA, 0x71, 0x14])
}

/// Everything the controller asked a collaborator to do
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    PassThrough {
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    },
    GroupNavigation {
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    },
    SetSettings(Vec<(u8, u8), MAX_PLAYER_SETTINGS>),
    AbsoluteVolumeResponse {
        device: BluetoothAddress,
        volume: u8,
        label: u8,
    },
    RegisterVolumeResponse {
        device: BluetoothAddress,
        response: NotificationResponse,
        volume: u8,
        label: u8,
    },
    RequestElementAttributes(Vec<u32, MAX_ELEMENT_ATTRIBUTES>),
    ImageConnect {
        device: BluetoothAddress,
        psm: u16,
    },
    FetchThumbnail(ImageHandle),
    FetchImage {
        handle: ImageHandle,
        encoding: String<16>,
        pixel: String<16>,
        max_size: u64,
    },
    ImageDisconnect,
    MetadataChanged(MediaMetadata),
    PlaybackStateChanged(PlaybackSnapshot),
    PlayerSettingsChanged(PlayerSettings),
    ConnectionStateChanged {
        old: ConnectionState,
        new: ConnectionState,
        device: BluetoothAddress,
    },
    SetVolume {
        index: u32,
        show_ui: bool,
    },
    RegisterListener,
    UnregisterListener,
    RemotePlaying(BluetoothAddress),
}

/// Shared call log and system volume
pub(crate) struct TestBed {
    calls: RefCell<Vec<Call, CALL_LOG_DEPTH>>,
    volume: Cell<u32>,
    max_volume: Cell<u32>,
    listening: Cell<bool>,
}

impl TestBed {
    pub(crate) fn new() -> Self {
        Self {
            calls: RefCell::new(Vec::new()),
            volume: Cell::new(0),
            max_volume: Cell::new(15),
            listening: Cell::new(false),
        }
    }

    pub(crate) fn set_system_volume(&self, volume: u32, max_volume: u32) {
        self.volume.set(volume);
        self.max_volume.set(max_volume);
    }

    pub(crate) fn calls(&self) -> Vec<Call, CALL_LOG_DEPTH> {
        self.calls.borrow().clone()
    }

    pub(crate) fn clear(&self) {
        self.calls.borrow_mut().clear();
    }

    pub(crate) fn is_listening(&self) -> bool {
        self.listening.get()
    }

    fn record(&self, call: Call) {
        self.calls
            .borrow_mut()
            .push(call)
            .expect("call log full");
    }
}

/// Collaborator handle implementing every trait against a [`TestBed`]
#[derive(Clone, Copy)]
pub(crate) struct Mock<'a>(pub(crate) &'a TestBed);

pub(crate) type TestController<'a> =
    AvrcpController<Mock<'a>, Mock<'a>, Mock<'a>, Mock<'a>, Mock<'a>>;

pub(crate) fn controller(bed: &TestBed) -> TestController<'_> {
    controller_with_options(bed, AvrcpControllerOptions::default())
}

pub(crate) fn controller_with_options(
    bed: &TestBed,
    options: AvrcpControllerOptions,
) -> TestController<'_> {
    let mock = Mock(bed);
    AvrcpController::with_options(mock, mock, mock, mock, mock, options)
}

impl AvrcpTransport for Mock<'_> {
    fn send_pass_through_command(&mut self, device: BluetoothAddress, op: u8, key_state: KeyState) {
        self.0.record(Call::PassThrough {
            device,
            op,
            key_state,
        });
    }

    fn send_group_navigation_command(
        &mut self,
        device: BluetoothAddress,
        op: u8,
        key_state: KeyState,
    ) {
        self.0.record(Call::GroupNavigation {
            device,
            op,
            key_state,
        });
    }

    fn set_player_application_setting_values(
        &mut self,
        _device: BluetoothAddress,
        settings: &[(u8, u8)],
    ) {
        self.0
            .record(Call::SetSettings(Vec::from_slice(settings).unwrap()));
    }

    fn send_absolute_volume_response(&mut self, device: BluetoothAddress, volume: u8, label: u8) {
        self.0.record(Call::AbsoluteVolumeResponse {
            device,
            volume,
            label,
        });
    }

    fn send_register_volume_response(
        &mut self,
        device: BluetoothAddress,
        response: NotificationResponse,
        volume: u8,
        label: u8,
    ) {
        self.0.record(Call::RegisterVolumeResponse {
            device,
            response,
            volume,
            label,
        });
    }

    fn request_element_attributes(&mut self, _device: BluetoothAddress, attributes: &[u32]) {
        self.0.record(Call::RequestElementAttributes(
            Vec::from_slice(attributes).unwrap(),
        ));
    }
}

impl ImageTransfer for Mock<'_> {
    fn connect(&mut self, device: BluetoothAddress, psm: u16) {
        self.0.record(Call::ImageConnect { device, psm });
    }

    fn fetch_thumbnail(&mut self, handle: &str) {
        self.0.record(Call::FetchThumbnail(bounded(handle)));
    }

    fn fetch_image(&mut self, handle: &str, encoding: &str, pixel: &str, max_size: u64) {
        self.0.record(Call::FetchImage {
            handle: bounded(handle),
            encoding: bounded(encoding),
            pixel: bounded(pixel),
            max_size,
        });
    }

    fn disconnect(&mut self) {
        self.0.record(Call::ImageDisconnect);
    }
}

impl MediaSession for Mock<'_> {
    fn metadata_changed(&mut self, metadata: &MediaMetadata) {
        self.0.record(Call::MetadataChanged(metadata.clone()));
    }

    fn playback_state_changed(&mut self, playback: PlaybackSnapshot) {
        self.0.record(Call::PlaybackStateChanged(playback));
    }

    fn player_settings_changed(&mut self, settings: PlayerSettings) {
        self.0.record(Call::PlayerSettingsChanged(settings));
    }

    fn connection_state_changed(
        &mut self,
        old: ConnectionState,
        new: ConnectionState,
        device: BluetoothAddress,
    ) {
        self.0
            .record(Call::ConnectionStateChanged { old, new, device });
    }
}

impl SystemVolume for Mock<'_> {
    fn max_volume(&self) -> u32 {
        self.0.max_volume.get()
    }

    fn current_volume(&self) -> u32 {
        self.0.volume.get()
    }

    fn set_volume(&mut self, index: u32, show_ui: bool) {
        self.0.volume.set(index);
        self.0.record(Call::SetVolume { index, show_ui });
    }

    fn register_listener(&mut self) {
        self.0.listening.set(true);
        self.0.record(Call::RegisterListener);
    }

    fn unregister_listener(&mut self) -> Result<(), AvrcpError> {
        self.0.record(Call::UnregisterListener);
        if self.0.listening.replace(false) {
            Ok(())
        } else {
            Err(AvrcpError::ListenerNotRegistered)
        }
    }
}

impl AudioRouting for Mock<'_> {
    fn remote_playing(&mut self, device: BluetoothAddress) {
        self.0.record(Call::RemotePlaying(device));
    }
}
