use futures_util::future::{BoxFuture, FutureExt};
use reqwest::header::CONTENT_TYPE;
use reqwest::StatusCode;
use tracing::trace;

use crate::xmlrpc::{self, Value};
use crate::RpcError;

use super::GripkitConfig;

/// Something that can execute one XML-RPC method call.
///
/// [`super::RpcClient`] adds locking and the timeout on top, so
/// implementations only perform the exchange itself.
pub trait Endpoint: Send + Sync {
    fn execute<'a>(&'a self, method: &'a str, params: &'a [Value]) -> BoxFuture<'a, Result<Value, RpcError>>;
}

/// XML-RPC over HTTP POST.
#[derive(Debug, Clone)]
pub struct HttpEndpoint {
    client: reqwest::Client,
    url: String,
}

impl HttpEndpoint {
    /// `authority` is `host:port`, `path` the absolute request path.
    pub fn new(authority: String, path: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: format!("http://{}{}", authority, path),
        }
    }

    pub fn from_config(config: &GripkitConfig) -> Self {
        Self::new(config.authority(), config.endpoint_path())
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    async fn exchange(&self, method: &str, params: &[Value]) -> Result<Value, RpcError> {
        let body = xmlrpc::encode_call(method, params);

        let response = self
            .client
            .post(&self.url)
            .header(CONTENT_TYPE, "text/xml")
            .body(body)
            .send()
            .await
            .map_err(|e| RpcError::FailedToSend(format!("POST {}: {}", self.url, e)))?;
        trace!("Sent {} to {}", method, self.url);

        let status = response.status();
        if status != StatusCode::OK {
            return Err(RpcError::FailedToReceive(format!("HTTP status {}", status.as_u16())));
        }
        let text = response
            .text()
            .await
            .map_err(|e| RpcError::FailedToReceive(e.to_string()))?;
        trace!("Received: {}", text);

        xmlrpc::decode_response(&text)
    }
}

impl Endpoint for HttpEndpoint {
    fn execute<'a>(&'a self, method: &'a str, params: &'a [Value]) -> BoxFuture<'a, Result<Value, RpcError>> {
        self.exchange(method, params).boxed()
    }
}
