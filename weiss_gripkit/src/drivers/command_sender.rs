use tracing::{debug, error, warn};

use crate::commands::{set_gripper_params, SetGripperResult, SET_GRIPPER};

use super::RpcClient;

/// Fire-and-forget `setGripper` calls.
///
/// Nothing is reported back to the caller. Whether the gripper moved shows up
/// in the next status poll.
#[derive(Debug, Clone)]
pub struct CommandSender {
    client: RpcClient,
}

impl CommandSender {
    pub fn new(client: RpcClient) -> Self {
        Self { client }
    }

    /// `close = true` grips, `close = false` releases.
    pub async fn send_grip(&self, close: bool) {
        let action = if close { "grip" } else { "release" };

        match self.client.call(SET_GRIPPER, set_gripper_params(close)).await {
            Ok(reply) => match SetGripperResult::from_reply(&reply) {
                Some(SetGripperResult::Accepted) => debug!("Gripper {} accepted", action),
                Some(result) => warn!("Gripper {} not performed: {}", action, result.message()),
                None => debug!("Gripper {} returned {:?}", action, reply),
            },
            Err(e) => error!("Failed to {} gripper: {}", action, e),
        }
    }

    pub async fn grip(&self) {
        self.send_grip(true).await
    }

    pub async fn release(&self) {
        self.send_grip(false).await
    }
}
