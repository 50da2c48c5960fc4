use serde::{Deserialize, Serialize};
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;
use std::time::Duration;

use crate::RpcError;

/// Where the gripper's XML-RPC endpoint lives and how the panel talks to it.
///
/// ```rust,ignore
/// let config = GripkitConfig::new("192.168.1.10".to_string(), 8080, "weiss_gripkit".to_string());
///
/// if let Err(e) = config.validate() {
///     println!("Configuration error: {}", e);
///     return;
/// }
///
/// println!("Talking to {}", config.connection_url());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct GripkitConfig {
    pub addr: String,
    pub port: u16,
    /// Device name of the CBun instance; also the HTTP path of its endpoint.
    pub device: String,
    pub call_timeout_ms: u64,
    pub poll_interval_ms: u64,
}

impl GripkitConfig {
    pub const DEFAULT_CALL_TIMEOUT_MS: u64 = 2000;
    pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

    pub fn new(addr: String, port: u16, device: String) -> Self {
        Self {
            addr,
            port,
            device,
            ..Default::default()
        }
    }

    /// Defaults overridden by `GRIPKIT_ADDR`, `GRIPKIT_PORT`, `GRIPKIT_DEVICE`,
    /// `GRIPKIT_CALL_TIMEOUT_MS` and `GRIPKIT_POLL_INTERVAL_MS`.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            addr: std::env::var("GRIPKIT_ADDR").unwrap_or(defaults.addr),
            port: std::env::var("GRIPKIT_PORT")
                .ok()
                .and_then(|p| p.parse::<u16>().ok())
                .unwrap_or(defaults.port),
            device: std::env::var("GRIPKIT_DEVICE").unwrap_or(defaults.device),
            call_timeout_ms: std::env::var("GRIPKIT_CALL_TIMEOUT_MS")
                .ok()
                .and_then(|t| t.parse::<u64>().ok())
                .unwrap_or(defaults.call_timeout_ms),
            poll_interval_ms: std::env::var("GRIPKIT_POLL_INTERVAL_MS")
                .ok()
                .and_then(|t| t.parse::<u64>().ok())
                .unwrap_or(defaults.poll_interval_ms),
        }
    }

    /// Reads a JSON config file. Missing fields take their defaults.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, RpcError> {
        let text = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            RpcError::Configuration(format!("cannot read {}: {}", path.as_ref().display(), e))
        })?;
        serde_json::from_str(&text).map_err(|e| RpcError::Configuration(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.addr.is_empty() {
            return Err("Address cannot be empty.".to_string());
        }
        if self.port == 0 {
            return Err("Port number must be greater than 0.".to_string());
        }
        if self.device.is_empty() || self.device.contains(|c: char| c == '/' || c.is_whitespace()) {
            return Err("Device name must be a non-empty single path segment.".to_string());
        }
        if self.call_timeout_ms == 0 {
            return Err("Call timeout must be greater than 0.".to_string());
        }
        if self.poll_interval_ms == 0 {
            return Err("Poll interval must be greater than 0.".to_string());
        }
        Ok(())
    }

    /// `addr:port`, used both to connect and as the HTTP `Host`.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.addr, self.port)
    }

    pub fn endpoint_path(&self) -> String {
        format!("/{}", self.device)
    }

    /// Generates the endpoint URL from the address, port and device name.
    pub fn connection_url(&self) -> String {
        format!("http://{}{}", self.authority(), self.endpoint_path())
    }

    /// First socket address `addr:port` resolves to.
    pub fn resolve(&self) -> Result<SocketAddr, String> {
        (self.addr.as_str(), self.port)
            .to_socket_addrs()
            .map_err(|e| format!("cannot resolve {}: {}", self.addr, e))?
            .next()
            .ok_or_else(|| format!("{} resolved to no address", self.addr))
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_millis(self.call_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for GripkitConfig {
    fn default() -> Self {
        Self {
            addr: "127.0.0.1".to_string(),
            port: 8080,
            device: "weiss_gripkit".to_string(),
            call_timeout_ms: Self::DEFAULT_CALL_TIMEOUT_MS,
            poll_interval_ms: Self::DEFAULT_POLL_INTERVAL_MS,
        }
    }
}
