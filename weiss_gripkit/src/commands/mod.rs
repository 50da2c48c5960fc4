//! Typed wrappers for the two methods the gripper exposes.

mod get_status;
mod set_gripper;

pub use get_status::*;
pub use set_gripper::*;
