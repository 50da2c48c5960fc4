use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::commands::{DeviceSnapshot, GET_STATUS};
use crate::xmlrpc::Params;

use super::RpcClient;

/// Passes the first snapshot and then only snapshots that differ from the
/// last one passed.
#[derive(Debug, Default, Clone)]
pub struct SnapshotFilter {
    last: Option<DeviceSnapshot>,
}

impl SnapshotFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accept(&mut self, snapshot: DeviceSnapshot) -> Option<DeviceSnapshot> {
        if self.last == Some(snapshot) {
            return None;
        }
        self.last = Some(snapshot);
        Some(snapshot)
    }

    pub fn last(&self) -> Option<DeviceSnapshot> {
        self.last
    }
}

/// Periodic `getStatus` reader.
///
/// A failed poll never ends the loop; it becomes a degraded snapshot and the
/// next tick tries again.
#[derive(Debug, Clone)]
pub struct StatusPoller {
    client: RpcClient,
    interval: Duration,
}

impl StatusPoller {
    pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

    pub fn new(client: RpcClient, interval: Duration) -> Self {
        Self { client, interval }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One status read, failures folded into [`DeviceSnapshot::degraded`].
    pub async fn poll_once(&self) -> DeviceSnapshot {
        DeviceSnapshot::from_result(self.client.call(GET_STATUS, Params::new()).await)
    }

    /// Polls until `shutdown` is signalled or its sender is dropped, or until
    /// `snapshots` is closed. Only changed snapshots are sent.
    ///
    /// The shutdown signal is checked before every call and while sleeping;
    /// a call in flight when it fires is abandoned.
    pub async fn run(&self, snapshots: mpsc::Sender<DeviceSnapshot>, mut shutdown: watch::Receiver<bool>) {
        let mut filter = SnapshotFilter::new();

        loop {
            if *shutdown.borrow_and_update() {
                break;
            }

            let snapshot = tokio::select! {
                snapshot = self.poll_once() => snapshot,
                _ = shutdown.changed() => break,
            };

            if let Some(changed) = filter.accept(snapshot) {
                debug!("Status changed: {:?}", changed);
                if snapshots.send(changed).await.is_err() {
                    debug!("Snapshot receiver dropped");
                    break;
                }
            }

            tokio::select! {
                _ = sleep(self.interval) => {}
                _ = shutdown.changed() => break,
            }
        }

        info!("Status poller stopped");
    }

    /// Starts [`StatusPoller::run`] on its own task.
    pub fn spawn(&self, shutdown: watch::Receiver<bool>) -> (mpsc::Receiver<DeviceSnapshot>, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(16);
        let poller = self.clone();
        let handle = tokio::spawn(async move { poller.run(tx, shutdown).await });
        (rx, handle)
    }
}
