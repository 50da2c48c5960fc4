use int_enum::IntEnum;
use serde::{Deserialize, Serialize};

use crate::xmlrpc::{Params, Value};

pub const SET_GRIPPER: &str = "setGripper";

/// Parameters for `setGripper`: `true` closes the gripper, `false` opens it.
pub fn set_gripper_params(close: bool) -> Params {
    vec![Value::Bool(close)]
}

/// Integer the device answers to `setGripper`.
#[repr(i32)]
#[derive(Debug, Serialize, Deserialize, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum SetGripperResult {
    Failed = -1,
    NotActivated = 0,
    Accepted = 1,
}

impl SetGripperResult {
    pub fn from_reply(reply: &Value) -> Option<Self> {
        let code = i32::try_from(reply.as_i64()?).ok()?;
        Self::try_from(code).ok()
    }

    pub fn to_value(self) -> Value {
        Value::from(i32::from(self))
    }

    pub fn message(&self) -> &str {
        match self {
            SetGripperResult::Failed => "gripper reported an internal failure",
            SetGripperResult::NotActivated => "gripper is not activated",
            SetGripperResult::Accepted => "request accepted",
        }
    }
}
