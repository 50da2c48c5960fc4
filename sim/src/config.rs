use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::device::GripperDevice;

/// Startup settings of the `sim` binary.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub port: u16,
    pub travel_ms: u64,
    pub part_present: bool,
}

impl SimConfig {
    /// Defaults overridden by `GRIPKIT_SIM_PORT` and `GRIPKIT_SIM_TRAVEL_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: std::env::var("GRIPKIT_SIM_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            travel_ms: std::env::var("GRIPKIT_SIM_TRAVEL_MS")
                .ok()
                .and_then(|t| t.parse::<u64>().ok())
                .unwrap_or(defaults.travel_ms),
            ..defaults
        }
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let text = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    pub fn device(&self) -> GripperDevice {
        let mut device = GripperDevice::new(Duration::from_millis(self.travel_ms));
        device.set_part_present(self.part_present);
        device
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            travel_ms: GripperDevice::DEFAULT_TRAVEL_TIME.as_millis() as u64,
            part_present: true,
        }
    }
}
