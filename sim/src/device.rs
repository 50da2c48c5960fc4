//! Device model of a GripKit CR EASY as seen through its CBun backend.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use weiss_gripkit::commands::{SetGripperResult, StatusReply, WireStatus};

pub type SharedDevice = Arc<Mutex<GripperDevice>>;

/// Status as the backend tracks it. `StatusError` means the status inputs
/// could not be read and has no wire code.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceStatus {
    IdleOrError,
    Released,
    NoPart,
    Holding,
    StatusError,
}

impl DeviceStatus {
    pub fn wire(self) -> Option<WireStatus> {
        match self {
            DeviceStatus::IdleOrError => Some(WireStatus::IdleOrError),
            DeviceStatus::Released => Some(WireStatus::Released),
            DeviceStatus::NoPart => Some(WireStatus::NoPart),
            DeviceStatus::Holding => Some(WireStatus::Holding),
            DeviceStatus::StatusError => None,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GripAction {
    Grip,
    Release,
}

#[derive(Debug, Clone, Copy)]
struct PendingAction {
    action: GripAction,
    settles_at: Instant,
}

/// Simulated gripper. Time is passed in explicitly so that travel can be
/// stepped in tests.
#[derive(Debug, Clone)]
pub struct GripperDevice {
    activated: bool,
    mounted: bool,
    status: DeviceStatus,
    part_present: bool,
    status_readable: bool,
    response_delay: Duration,
    travel_time: Duration,
    pending: Option<PendingAction>,
}

impl GripperDevice {
    pub const DEFAULT_TRAVEL_TIME: Duration = Duration::from_millis(300);

    /// Activated, mounted and open, with a part between the fingers.
    pub fn new(travel_time: Duration) -> Self {
        Self {
            activated: true,
            mounted: true,
            status: DeviceStatus::Released,
            part_present: true,
            status_readable: true,
            response_delay: Duration::ZERO,
            travel_time,
            pending: None,
        }
    }

    pub fn shared(self) -> SharedDevice {
        Arc::new(Mutex::new(self))
    }

    pub fn is_activated(&self) -> bool {
        self.activated
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn response_delay(&self) -> Duration {
        self.response_delay
    }

    /// Status after applying any action whose travel has finished by `now`.
    pub fn status(&mut self, now: Instant) -> DeviceStatus {
        self.settle(now);
        if !self.status_readable {
            return DeviceStatus::StatusError;
        }
        self.status
    }

    /// The `getStatus` reply. An inactive gripper reports `IdleOrError`.
    pub fn status_reply(&mut self, now: Instant) -> StatusReply {
        if !self.activated {
            return StatusReply {
                success: true,
                status: WireStatus::IdleOrError,
                activated: false,
                mounted: self.mounted,
            };
        }
        match self.status(now).wire() {
            Some(status) => StatusReply {
                success: true,
                status,
                activated: true,
                mounted: self.mounted,
            },
            None => StatusReply::failure(),
        }
    }

    /// Starts a grip (`close = true`) or release. Replaces any action still
    /// travelling.
    pub fn set_gripper(&mut self, close: bool, now: Instant) -> SetGripperResult {
        if !self.activated {
            return SetGripperResult::NotActivated;
        }
        self.settle(now);

        let action = if close { GripAction::Grip } else { GripAction::Release };
        self.pending = Some(PendingAction {
            action,
            settles_at: now + self.travel_time,
        });
        self.settle(now);
        SetGripperResult::Accepted
    }

    pub fn activate(&mut self) {
        if !self.activated {
            info!("Gripper activated");
            self.activated = true;
            self.status = DeviceStatus::Released;
        }
    }

    pub fn deactivate(&mut self) {
        if self.activated {
            info!("Gripper deactivated");
        }
        self.activated = false;
        self.pending = None;
        self.status = DeviceStatus::IdleOrError;
    }

    pub fn set_mounted(&mut self, mounted: bool) {
        self.mounted = mounted;
    }

    /// Whether the next grip will find a part. Does not change a settled grip.
    pub fn set_part_present(&mut self, present: bool) {
        self.part_present = present;
    }

    pub fn set_status_readable(&mut self, readable: bool) {
        self.status_readable = readable;
    }

    pub fn set_response_delay(&mut self, delay: Duration) {
        self.response_delay = delay;
    }

    fn settle(&mut self, now: Instant) {
        let Some(pending) = self.pending else {
            return;
        };
        if now < pending.settles_at {
            return;
        }

        self.pending = None;
        self.status = match pending.action {
            GripAction::Grip if self.part_present => DeviceStatus::Holding,
            GripAction::Grip => DeviceStatus::NoPart,
            GripAction::Release => DeviceStatus::Released,
        };
        info!("Gripper settled: {:?}", self.status);
    }
}

impl Default for GripperDevice {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TRAVEL_TIME)
    }
}
