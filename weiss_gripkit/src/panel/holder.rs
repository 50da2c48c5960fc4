use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::drivers::{CommandSender, GripkitConfig, RpcClient, StatusPoller};
use crate::RpcError;

use super::{UiState, UserCommand};

/// Owns the panel's [`UiState`] for as long as the panel is shown.
///
/// Creating the panel starts a background poller. Its snapshots and the
/// operator's direction changes are the only writers, and both go through the
/// one `watch::Sender`, whose read-modify-write is serialized. Readers always
/// see a whole state. Dropping the panel or calling
/// [`GripperPanel::shutdown`] stops the poller.
pub struct GripperPanel {
    state: Arc<watch::Sender<UiState>>,
    commands: CommandSender,
    shutdown: watch::Sender<bool>,
    tasks: Vec<JoinHandle<()>>,
}

impl GripperPanel {
    /// Opens the HTTP endpoint described by `config` and starts polling.
    /// Must be called from within a tokio runtime.
    pub fn start(config: &GripkitConfig) -> Result<Self, RpcError> {
        let client = RpcClient::from_config(config)?;
        match config.resolve() {
            Ok(peer) => info!("Starting gripper panel for {} ({})", config.connection_url(), peer),
            Err(e) => warn!("Starting gripper panel for {}: {}", config.connection_url(), e),
        }
        Ok(Self::with_client(client, config.poll_interval()))
    }

    pub fn with_client(client: RpcClient, poll_interval: Duration) -> Self {
        let (state, _) = watch::channel(UiState::default());
        let state = Arc::new(state);
        let (shutdown, shutdown_rx) = watch::channel(false);

        let poller = StatusPoller::new(client.clone(), poll_interval);
        let (mut snapshots, poll_task) = poller.spawn(shutdown_rx);

        let merge_state = Arc::clone(&state);
        let merge_task = tokio::spawn(async move {
            while let Some(snapshot) = snapshots.recv().await {
                merge_state.send_if_modified(|ui| ui.apply_snapshot(&snapshot));
            }
        });

        Self {
            state,
            commands: CommandSender::new(client),
            shutdown,
            tasks: vec![poll_task, merge_task],
        }
    }

    pub fn current_state(&self) -> UiState {
        *self.state.borrow()
    }

    /// Receiver that is notified whenever the state changes.
    pub fn subscribe(&self) -> watch::Receiver<UiState> {
        self.state.subscribe()
    }

    /// Applies one operator command.
    ///
    /// A direction change is visible in [`GripperPanel::current_state`] as soon
    /// as this returns and makes no remote call. Grip and release wait for the
    /// `setGripper` call (bounded by the call timeout) and swallow failures.
    pub async fn dispatch(&self, command: UserCommand) {
        match command {
            UserCommand::GripRequested => self.commands.send_grip(true).await,
            UserCommand::ReleaseRequested => self.commands.send_grip(false).await,
            UserCommand::DirectionChanged(direction) => {
                self.state.send_if_modified(|ui| {
                    let changed = ui.grip_direction != direction;
                    ui.grip_direction = direction;
                    changed
                });
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.tasks.iter().any(|task| !task.is_finished())
    }

    /// Stops polling and waits for the background tasks to finish.
    pub async fn shutdown(mut self) {
        let _ = self.shutdown.send(true);
        for task in std::mem::take(&mut self.tasks) {
            if let Err(e) = task.await {
                if !e.is_cancelled() {
                    warn!("Panel task ended abnormally: {}", e);
                }
            }
        }
        info!("Gripper panel shut down");
    }
}

impl Drop for GripperPanel {
    fn drop(&mut self) {
        let _ = self.shutdown.send(true);
        for task in &self.tasks {
            task.abort();
        }
    }
}
