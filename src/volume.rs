//! Volume Bridge
//!
//! Couples the remote's absolute volume to the local system volume.
//!
//! The remote registers for volume notifications and gets one unsolicited
//! `CHANGED` response per registration. After it sets the volume itself, the
//! next local change is the echo of that request and produces no response.

use crate::BluetoothAddress;
use crate::constants::{ABS_VOL_BASE, notification_response};
use crate::traits::{AvrcpTransport, SystemVolume};

/// Response type of a volume notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum NotificationResponse {
    /// Sent right after registration
    Interim,
    /// Sent when the value changes
    Changed,
}

impl From<NotificationResponse> for u8 {
    fn from(response: NotificationResponse) -> Self {
        match response {
            NotificationResponse::Interim => notification_response::INTERIM,
            NotificationResponse::Changed => notification_response::CHANGED,
        }
    }
}

/// Volume notification state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum VolumeNotificationState {
    /// The remote never registered
    #[default]
    Undefined,
    /// Swallow the next local change
    DeferResponse,
    /// Report the next local change
    SendResponseOnChange,
}

/// Convert a system volume index to the 0..=127 AVRCP scale
#[must_use]
pub fn absolute_volume(index: u32, max: u32) -> u8 {
    if max == 0 {
        return 0;
    }
    let scaled = u64::from(index.min(max)) * u64::from(ABS_VOL_BASE) / u64::from(max);
    u8::try_from(scaled).unwrap_or(u8::MAX)
}

/// Convert an AVRCP absolute volume to a system volume index
#[must_use]
pub fn volume_index(max: u32, absolute: u8) -> u32 {
    let absolute = u32::from(absolute).min(ABS_VOL_BASE);
    let scaled = u64::from(max) * u64::from(absolute) / u64::from(ABS_VOL_BASE);
    u32::try_from(scaled).unwrap_or(max)
}

/// Absolute volume notification state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct VolumeBridge {
    state: VolumeNotificationState,
    label: Option<u8>,
    listening: bool,
}

impl VolumeBridge {
    /// Create an unregistered bridge
    #[must_use]
    pub const fn new() -> Self {
        Self {
            state: VolumeNotificationState::Undefined,
            label: None,
            listening: false,
        }
    }

    /// Current notification state
    #[must_use]
    pub fn state(&self) -> VolumeNotificationState {
        self.state
    }

    /// Transaction label of the last registration
    #[must_use]
    pub fn label(&self) -> Option<u8> {
        self.label
    }

    /// Whether the system volume listener is registered
    #[must_use]
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// Handle a volume notification registration from the remote
    ///
    /// Starts listening to the system volume on first registration and answers
    /// with an interim response carrying the current volume.
    pub fn register<T: AvrcpTransport, V: SystemVolume>(
        &mut self,
        device: BluetoothAddress,
        label: u8,
        transport: &mut T,
        volume: &mut V,
    ) {
        if !self.listening {
            volume.register_listener();
            self.listening = true;
        }
        self.label = Some(label);
        self.state = VolumeNotificationState::SendResponseOnChange;

        let current = absolute_volume(volume.current_volume(), volume.max_volume());
        debug!(
            "[VOLUME] Interim response volume={} label={}",
            current, label
        );
        transport.send_register_volume_response(
            device,
            NotificationResponse::Interim,
            current,
            label,
        );
    }

    /// Handle a local volume change
    ///
    /// Returns `true` if a `CHANGED` response was sent.
    pub fn system_volume_changed<T: AvrcpTransport, V: SystemVolume>(
        &mut self,
        device: BluetoothAddress,
        transport: &mut T,
        volume: &V,
    ) -> bool {
        match (self.state, self.label) {
            (VolumeNotificationState::SendResponseOnChange, Some(label)) => {
                let current = absolute_volume(volume.current_volume(), volume.max_volume());
                debug!(
                    "[VOLUME] Changed response volume={} label={}",
                    current, label
                );
                transport.send_register_volume_response(
                    device,
                    NotificationResponse::Changed,
                    current,
                    label,
                );
                self.state = VolumeNotificationState::DeferResponse;
                true
            }
            (VolumeNotificationState::DeferResponse, _) => {
                trace!("[VOLUME] Deferred change, no response");
                self.state = VolumeNotificationState::SendResponseOnChange;
                false
            }
            _ => false,
        }
    }

    /// Stop listening to the system volume and forget the registration
    ///
    /// The listener is always asked to unregister; a listener that was never
    /// registered is logged and ignored.
    pub fn release<V: SystemVolume>(&mut self, volume: &mut V) {
        if let Err(e) = volume.unregister_listener() {
            debug!("[VOLUME] Listener cleanup: {}", e);
        }
        *self = Self::new();
    }

    /// Handle an absolute volume command from the remote
    ///
    /// The system volume is only touched when the target index differs from
    /// the current one. The response is always sent.
    pub fn set_absolute_volume<T: AvrcpTransport, V: SystemVolume>(
        &mut self,
        device: BluetoothAddress,
        absolute: u8,
        label: u8,
        show_ui: bool,
        transport: &mut T,
        volume: &mut V,
    ) {
        self.state = VolumeNotificationState::DeferResponse;

        let max = volume.max_volume();
        let current = volume.current_volume();
        let target = volume_index(max, absolute);
        debug!(
            "[VOLUME] Set absolute volume={} max={} current={} target={}",
            absolute, max, current, target
        );
        if target != current {
            volume.set_volume(target, show_ui);
        }
        transport.send_absolute_volume_response(device, absolute, label);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{Call, Mock, TestBed, device};

    #[test]
    fn test_volume_scaling() {
        assert_eq!(absolute_volume(0, 15), 0);
        assert_eq!(absolute_volume(15, 15), 127);
        assert_eq!(absolute_volume(7, 15), 59);
        assert_eq!(absolute_volume(20, 15), 127);
        assert_eq!(absolute_volume(3, 0), 0);

        assert_eq!(volume_index(15, 127), 15);
        assert_eq!(volume_index(15, 64), 7);
        assert_eq!(volume_index(15, 0), 0);
        assert_eq!(volume_index(15, 200), 15);
    }

    #[test]
    fn test_register_sends_interim() {
        let bed = TestBed::new();
        bed.set_system_volume(7, 15);
        let mut bridge = VolumeBridge::new();

        bridge.register(device(), 5, &mut Mock(&bed), &mut Mock(&bed));

        assert_eq!(bridge.state(), VolumeNotificationState::SendResponseOnChange);
        assert_eq!(bridge.label(), Some(5));
        assert_eq!(
            bed.calls().as_slice(),
            &[
                Call::RegisterListener,
                Call::RegisterVolumeResponse {
                    device: device(),
                    response: NotificationResponse::Interim,
                    volume: 59,
                    label: 5,
                },
            ]
        );
    }

    #[test]
    fn test_one_changed_response_per_registration() {
        let bed = TestBed::new();
        bed.set_system_volume(7, 15);
        let mut bridge = VolumeBridge::new();
        bridge.register(device(), 5, &mut Mock(&bed), &mut Mock(&bed));
        bed.clear();

        bed.set_system_volume(15, 15);
        assert!(bridge.system_volume_changed(device(), &mut Mock(&bed), &Mock(&bed)));
        assert_eq!(bridge.state(), VolumeNotificationState::DeferResponse);

        bed.set_system_volume(14, 15);
        assert!(!bridge.system_volume_changed(device(), &mut Mock(&bed), &Mock(&bed)));

        assert_eq!(
            bed.calls().as_slice(),
            &[Call::RegisterVolumeResponse {
                device: device(),
                response: NotificationResponse::Changed,
                volume: 127,
                label: 5,
            }]
        );
    }

    #[test]
    fn test_changes_ignored_before_registration() {
        let bed = TestBed::new();
        let mut bridge = VolumeBridge::new();

        assert!(!bridge.system_volume_changed(device(), &mut Mock(&bed), &Mock(&bed)));
        assert_eq!(bridge.state(), VolumeNotificationState::Undefined);
        assert!(bed.calls().is_empty());
    }

    #[test]
    fn test_register_after_set_absolute_volume_starts_listening() {
        let bed = TestBed::new();
        bed.set_system_volume(7, 15);
        let mut bridge = VolumeBridge::new();

        bridge.set_absolute_volume(device(), 64, 1, true, &mut Mock(&bed), &mut Mock(&bed));
        assert!(!bridge.is_listening());

        bridge.register(device(), 2, &mut Mock(&bed), &mut Mock(&bed));
        assert!(bridge.is_listening());
        assert!(bed.is_listening());
        assert!(bed.calls().contains(&Call::RegisterListener));
    }

    #[test]
    fn test_release_forgets_registration() {
        let bed = TestBed::new();
        let mut bridge = VolumeBridge::new();
        bridge.register(device(), 5, &mut Mock(&bed), &mut Mock(&bed));

        bridge.release(&mut Mock(&bed));
        assert!(!bridge.is_listening());
        assert!(!bed.is_listening());
        assert_eq!(bridge, VolumeBridge::new());

        // Releasing again only logs the missing listener.
        bridge.release(&mut Mock(&bed));
        assert!(!bridge.is_listening());
    }

    #[test]
    fn test_set_absolute_volume_skips_equal_index() {
        let bed = TestBed::new();
        bed.set_system_volume(7, 15);
        let mut bridge = VolumeBridge::new();

        bridge.set_absolute_volume(device(), 64, 3, true, &mut Mock(&bed), &mut Mock(&bed));
        assert_eq!(bridge.state(), VolumeNotificationState::DeferResponse);
        assert_eq!(
            bed.calls().as_slice(),
            &[Call::AbsoluteVolumeResponse {
                device: device(),
                volume: 64,
                label: 3,
            }]
        );

        bed.clear();
        bridge.set_absolute_volume(device(), 127, 4, false, &mut Mock(&bed), &mut Mock(&bed));
        assert_eq!(
            bed.calls().as_slice(),
            &[
                Call::SetVolume {
                    index: 15,
                    show_ui: false,
                },
                Call::AbsoluteVolumeResponse {
                    device: device(),
                    volume: 127,
                    label: 4,
                },
            ]
        );
    }
}
