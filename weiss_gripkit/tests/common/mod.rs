#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::{BoxFuture, FutureExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;

use weiss_gripkit::drivers::{Endpoint, RpcClient};
use weiss_gripkit::xmlrpc::{Params, Value};
use weiss_gripkit::RpcError;

type Handler = Box<dyn Fn(&str, &[Value]) -> Result<Value, RpcError> + Send + Sync>;

/// In-process endpoint that answers through a closure and records every call.
pub struct MockEndpoint {
    handler: Handler,
    delay: Duration,
    calls: Mutex<Vec<(String, Params)>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

struct InFlight<'a>(&'a AtomicUsize);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockEndpoint {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&str, &[Value]) -> Result<Value, RpcError> + Send + Sync + 'static,
    {
        Self {
            handler: Box::new(handler),
            delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every call sleeps this long before answering.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> Vec<(String, Params)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls_to(&self, method: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|(m, _)| m == method).count()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Endpoint for MockEndpoint {
    fn execute<'a>(&'a self, method: &'a str, params: &'a [Value]) -> BoxFuture<'a, Result<Value, RpcError>> {
        async move {
            self.calls.lock().unwrap().push((method.to_string(), params.to_vec()));
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            let _guard = InFlight(&self.in_flight);
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            (self.handler)(method, params)
        }
        .boxed()
    }
}

pub fn client(endpoint: &Arc<MockEndpoint>, call_timeout: Duration) -> RpcClient {
    RpcClient::new(endpoint.clone(), call_timeout)
}

pub fn status_reply(success: i32, status: i32, activated: i32, mounted: i32) -> Value {
    Value::from_members([
        ("success", Value::from(success)),
        ("status", Value::from(status)),
        ("activated", Value::from(activated)),
        ("mounted", Value::from(mounted)),
    ])
}

/// Healthy gripper holding a part.
pub fn holding() -> Value {
    status_reply(1, 1, 1, 1)
}

/// Polls `check` every 5 ms until it holds or `limit` passes.
pub async fn eventually<F: FnMut() -> bool>(limit: Duration, mut check: F) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    check()
}

/// Accepts one connection, reads the whole request, writes `response` verbatim
/// and closes. The handle yields the raw request text.
pub async fn answer_once(response: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let authority = listener.local_addr().unwrap().to_string();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let request = read_request(&mut stream).await;
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        request
    });
    (authority, handle)
}

async fn read_request(stream: &mut TcpStream) -> String {
    let mut data = Vec::new();
    let mut chunk = [0u8; 1024];

    loop {
        let n = stream.read(&mut chunk).await.unwrap();
        if n == 0 {
            break;
        }
        data.extend_from_slice(&chunk[..n]);

        let text = String::from_utf8_lossy(&data);
        if let Some(end) = text.find("\r\n\r\n") {
            let length = text[..end]
                .lines()
                .filter_map(|line| line.split_once(':'))
                .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
                .and_then(|(_, value)| value.trim().parse::<usize>().ok())
                .unwrap_or(0);
            if data.len() >= end + 4 + length {
                break;
            }
        }
    }
    String::from_utf8(data).unwrap()
}
