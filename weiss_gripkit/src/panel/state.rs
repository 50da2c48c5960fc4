use serde::{Deserialize, Serialize};

use crate::commands::DeviceSnapshot;
use crate::{GripDirection, GripStatus};

/// Everything the presentation layer renders.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiState {
    pub communication_ok: bool,
    pub activated: bool,
    pub mounted: bool,
    pub status: GripStatus,
    pub grip_direction: GripDirection,
}

impl Default for UiState {
    /// Shown until the first poll lands: no communication, status `Error`.
    fn default() -> Self {
        Self {
            communication_ok: false,
            activated: true,
            mounted: true,
            status: GripStatus::Error,
            grip_direction: GripDirection::In,
        }
    }
}

impl UiState {
    /// Overwrites the device-sourced fields. `grip_direction` is left alone.
    /// Returns whether anything changed.
    pub fn apply_snapshot(&mut self, snapshot: &DeviceSnapshot) -> bool {
        let before = *self;
        self.communication_ok = snapshot.valid;
        self.activated = snapshot.activated;
        self.mounted = snapshot.mounted;
        self.status = snapshot.status;
        before != *self
    }
}

/// Operator input.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCommand {
    GripRequested,
    ReleaseRequested,
    DirectionChanged(GripDirection),
}
