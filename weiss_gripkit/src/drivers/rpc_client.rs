use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::timeout;
use tracing::debug;

use crate::xmlrpc::{Params, Value};
use crate::RpcError;

use super::{Endpoint, GripkitConfig, HttpEndpoint};

/// Serialized, time-bounded access to one XML-RPC endpoint.
///
/// Clones share the same lock, so at most one call is in flight across all of
/// them. Callers that arrive while a call is running wait for it to finish.
/// A call that exceeds the timeout is dropped, which also closes its
/// connection, and fails with [`RpcError::Timeout`]. There is no retry.
#[derive(Clone)]
pub struct RpcClient {
    endpoint: Arc<dyn Endpoint>,
    in_flight: Arc<Mutex<()>>,
    call_timeout: Duration,
}

impl RpcClient {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

    pub fn new(endpoint: Arc<dyn Endpoint>, call_timeout: Duration) -> Self {
        Self {
            endpoint,
            in_flight: Arc::new(Mutex::new(())),
            call_timeout,
        }
    }

    /// Client for the HTTP endpoint described by `config`.
    pub fn from_config(config: &GripkitConfig) -> Result<Self, RpcError> {
        config.validate().map_err(RpcError::Configuration)?;
        Ok(Self::new(
            Arc::new(HttpEndpoint::from_config(config)),
            config.call_timeout(),
        ))
    }

    pub fn call_timeout(&self) -> Duration {
        self.call_timeout
    }

    pub async fn call(&self, method: &str, params: Params) -> Result<Value, RpcError> {
        let _guard = self.in_flight.lock().await;
        debug!("-> {}({:?})", method, params);

        let result = match timeout(self.call_timeout, self.endpoint.execute(method, &params)).await {
            Ok(result) => result,
            Err(_) => Err(RpcError::Timeout(self.call_timeout)),
        };

        match &result {
            Ok(value) => debug!("<- {}: {:?}", method, value),
            Err(e) => debug!("<- {} failed: {}", method, e),
        }
        result
    }
}

impl std::fmt::Debug for RpcClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcClient")
            .field("call_timeout", &self.call_timeout)
            .finish_non_exhaustive()
    }
}
