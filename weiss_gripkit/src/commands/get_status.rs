use int_enum::IntEnum;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::xmlrpc::Value;
use crate::{GripStatus, RpcError};

pub const GET_STATUS: &str = "getStatus";

/// Status numbering used on the wire by the device backend.
#[repr(i32)]
#[derive(Debug, Serialize, Deserialize, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum WireStatus {
    IdleOrError = 0,
    Holding = 1,
    NoPart = 2,
    Released = 3,
}

impl From<WireStatus> for GripStatus {
    fn from(status: WireStatus) -> Self {
        match status {
            WireStatus::IdleOrError => GripStatus::Error,
            WireStatus::Holding => GripStatus::Gripped,
            WireStatus::NoPart => GripStatus::NoPart,
            WireStatus::Released => GripStatus::Released,
        }
    }
}

/// Maps a wire status code to the display status. Unknown codes are `Error`.
pub fn decode_status_code(code: i64) -> GripStatus {
    i32::try_from(code)
        .ok()
        .and_then(|code| WireStatus::try_from(code).ok())
        .map(GripStatus::from)
        .unwrap_or(GripStatus::Error)
}

/// The `getStatus` reply struct as the device sends it.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusReply {
    pub success: bool,
    pub status: WireStatus,
    pub activated: bool,
    pub mounted: bool,
}

impl StatusReply {
    /// Reply for a status read that failed on the device side.
    pub fn failure() -> Self {
        Self {
            success: false,
            status: WireStatus::IdleOrError,
            activated: false,
            mounted: false,
        }
    }

    /// A failed read carries only the `success` member.
    pub fn to_value(&self) -> Value {
        if !self.success {
            return Value::from_members([("success", Value::from(0))]);
        }
        Value::from_members([
            ("success", Value::from(1)),
            ("status", Value::from(i32::from(self.status))),
            ("activated", Value::from(i32::from(self.activated))),
            ("mounted", Value::from(i32::from(self.mounted))),
        ])
    }
}

/// One decoded read of the device status.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceSnapshot {
    pub valid: bool,
    pub status: GripStatus,
    pub activated: bool,
    pub mounted: bool,
}

impl DeviceSnapshot {
    /// Snapshot used for every failed or unsuccessful read.
    ///
    /// `activated` and `mounted` are reported as `true` so that only the
    /// communication flag and the status degrade.
    pub const fn degraded() -> Self {
        Self {
            valid: false,
            status: GripStatus::Error,
            activated: true,
            mounted: true,
        }
    }

    /// Decodes a `getStatus` reply.
    ///
    /// `success == 0` yields [`DeviceSnapshot::degraded`]. A reply missing
    /// members it needs is a [`RpcError::MalformedReply`].
    pub fn from_reply(reply: &Value) -> Result<Self, RpcError> {
        if reply.as_struct().is_none() {
            return Err(RpcError::MalformedReply(format!(
                "getStatus returned {} instead of struct",
                reply.type_name()
            )));
        }
        if reply.int_member("success")? == 0 {
            return Ok(Self::degraded());
        }
        Ok(Self {
            valid: true,
            status: decode_status_code(reply.int_member("status")?),
            activated: reply.int_member("activated")? == 1,
            mounted: reply.int_member("mounted")? == 1,
        })
    }

    /// Folds any call or decode failure into [`DeviceSnapshot::degraded`].
    pub fn from_result(result: Result<Value, RpcError>) -> Self {
        match result.and_then(|reply| Self::from_reply(&reply)) {
            Ok(snapshot) => snapshot,
            Err(e) => {
                debug!("getStatus failed: {}", e);
                Self::degraded()
            }
        }
    }
}
