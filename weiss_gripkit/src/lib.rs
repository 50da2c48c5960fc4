use serde::{Deserialize, Serialize};

pub mod xmlrpc;
pub mod commands;
pub mod errors;
pub use errors::*;

#[cfg(feature = "client")]
pub mod drivers;
#[cfg(feature = "client")]
pub mod panel;

pub use commands::DeviceSnapshot;

/// Grip state as shown to the operator.
///
/// This is the display ordering. The device reports the same states with a
/// different numbering, see [`commands::WireStatus`].
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GripStatus {
    Gripped,
    Released,
    #[default]
    Error,
    NoPart,
}

impl std::fmt::Display for GripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GripStatus::Gripped => write!(f, "Gripped"),
            GripStatus::Released => write!(f, "Released"),
            GripStatus::Error => write!(f, "Error"),
            GripStatus::NoPart => write!(f, "No part"),
        }
    }
}

/// Which way the operator intends to grip a part.
///
/// Purely local display state. It is never read from the device and is
/// only changed by [`panel::UserCommand::DirectionChanged`].
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GripDirection {
    #[default]
    In,
    Out,
}

impl GripDirection {
    pub fn toggled(self) -> Self {
        match self {
            GripDirection::In => GripDirection::Out,
            GripDirection::Out => GripDirection::In,
        }
    }
}

impl std::fmt::Display for GripDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GripDirection::In => write!(f, "Grip in"),
            GripDirection::Out => write!(f, "Grip out"),
        }
    }
}
