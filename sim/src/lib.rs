// Library exports for the GripKit simulator

pub mod config;
pub mod device;
pub mod server;

pub use config::SimConfig;
pub use device::{DeviceStatus, GripAction, GripperDevice, SharedDevice};
pub use server::{dispatch, handle_request, router, serve};
