//! Player Model
//!
//! The addressed player: play status, play position and the player
//! application settings negotiated with the remote.

use crate::codec::{
    PLAYBACK_POSITION_UNKNOWN, PlayStatus, PlaybackSnapshot, PlayerSettings, Setting,
    SupportedSetting, decode_play_status, decode_setting_value,
};
use crate::constants::{MAX_PLAYER_SETTINGS, MAX_SETTING_VALUES};
use heapless::Vec;

/// One player application setting
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlayerAppSetting {
    /// Setting attribute id
    pub attribute_id: u8,
    /// Current wire value, `None` until the remote reports one
    pub current_value: Option<u8>,
    /// Wire values the remote accepts
    pub supported_values: Vec<u8, MAX_SETTING_VALUES>,
}

/// Remote media player
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Player {
    id: u16,
    play_status: PlayStatus,
    play_position_ms: i64,
    settings: Vec<PlayerAppSetting, MAX_PLAYER_SETTINGS>,
}

impl Default for Player {
    fn default() -> Self {
        Self::new(0)
    }
}

impl Player {
    /// Create a stopped player with unknown position
    #[must_use]
    pub fn new(id: u16) -> Self {
        Self {
            id,
            play_status: PlayStatus::Stopped,
            play_position_ms: PLAYBACK_POSITION_UNKNOWN,
            settings: Vec::new(),
        }
    }

    /// Player id
    #[must_use]
    pub fn id(&self) -> u16 {
        self.id
    }

    /// Current play status
    #[must_use]
    pub fn play_status(&self) -> PlayStatus {
        self.play_status
    }

    /// Set the play status
    pub fn set_play_status(&mut self, status: PlayStatus) {
        self.play_status = status;
    }

    /// Current play position in milliseconds
    #[must_use]
    pub fn play_position_ms(&self) -> i64 {
        self.play_position_ms
    }

    /// Set the play position
    pub fn set_play_position_ms(&mut self, position_ms: i64) {
        self.play_position_ms = position_ms;
    }

    /// Playback snapshot for the media session
    #[must_use]
    pub fn playback_snapshot(&self) -> PlaybackSnapshot {
        decode_play_status(self.play_status, self.play_position_ms)
    }

    /// Known settings
    #[must_use]
    pub fn settings(&self) -> &[PlayerAppSetting] {
        &self.settings
    }

    /// Record supported settings
    ///
    /// The first announcement of an attribute id wins; later ones for the same
    /// id are ignored, so replaying an announcement changes nothing.
    pub fn apply_supported_settings(&mut self, announced: &[SupportedSetting]) {
        for entry in announced {
            if self.setting(entry.attribute_id).is_some() {
                continue;
            }
            let setting = PlayerAppSetting {
                attribute_id: entry.attribute_id,
                current_value: None,
                supported_values: entry.values.clone(),
            };
            if self.settings.push(setting).is_err() {
                warn!(
                    "[PLAYER] No room for setting {}, dropping",
                    entry.attribute_id
                );
                break;
            }
        }
    }

    /// Record current setting values for already known attribute ids
    pub fn apply_current_settings(&mut self, values: &[(u8, u8)]) {
        for &(attribute_id, value) in values {
            match self
                .settings
                .iter_mut()
                .find(|s| s.attribute_id == attribute_id)
            {
                Some(setting) => setting.current_value = Some(value),
                None => warn!(
                    "[PLAYER] Value {} for undeclared setting {}",
                    value, attribute_id
                ),
            }
        }
    }

    /// Whether every requested `(attribute id, value)` pair was announced
    #[must_use]
    pub fn is_setting_supported(&self, requested: &[(u8, u8)]) -> bool {
        requested.iter().all(|&(attribute_id, value)| {
            self.setting(attribute_id)
                .is_some_and(|s| s.supported_values.contains(&value))
        })
    }

    /// Current wire value of an attribute
    #[must_use]
    pub fn current_setting_value(&self, attribute_id: u8) -> Option<u8> {
        self.setting(attribute_id).and_then(|s| s.current_value)
    }

    /// Normalized snapshot of the known setting families and their values
    #[must_use]
    pub fn supported_settings_snapshot(&self) -> PlayerSettings {
        let mut snapshot = PlayerSettings::default();
        for setting in &self.settings {
            if let Some(family) = Setting::from_attribute_id(setting.attribute_id) {
                let value = setting.current_value.unwrap_or_default();
                snapshot.add_setting_value(family, decode_setting_value(setting.attribute_id, value));
            }
        }
        snapshot
    }

    fn setting(&self, attribute_id: u8) -> Option<&PlayerAppSetting> {
        self.settings.iter().find(|s| s.attribute_id == attribute_id)
    }
}
