//! Command Gate
//!
//! Pass-through legality table. A command that would make no sense in the
//! addressed player's current play status is not sent to the remote.

use crate::codec::PlayStatus;
use crate::constants::pass_through;

/// Key state of a pass-through or group navigation command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyState {
    /// Key pressed
    Pressed = 0,
    /// Key released
    Released = 1,
}

impl From<KeyState> for u8 {
    fn from(state: KeyState) -> Self {
        state as u8
    }
}

/// Whether `op` may be sent while the addressed player is in `status`
#[must_use]
pub fn is_pass_through_allowed(op: u8, status: PlayStatus) -> bool {
    use PlayStatus::{FwdSeek, Paused, Playing, RevSeek, Stopped};

    match op {
        pass_through::PLAY => matches!(status, Stopped | Paused),
        // A duplicate pause is harmless, so it is accepted while paused or stopped too.
        pass_through::PAUSE | pass_through::STOP => {
            matches!(status, Playing | FwdSeek | RevSeek | Stopped | Paused)
        }
        pass_through::BACKWARD
        | pass_through::FORWARD
        | pass_through::FAST_FORWARD
        | pass_through::REWIND => true,
        _ => false,
    }
}

/// Operation codes used by the qualification test tool
///
/// These skip the gate entirely.
#[must_use]
pub fn is_pts_operation(op: u8) -> bool {
    matches!(
        op,
        pass_through::PTS_GET_ELEMENT_ATTRIBUTES | pass_through::PTS_GET_PLAY_STATUS
    )
}
