mod common;

use std::sync::Arc;
use std::time::{Duration, Instant};

use common::{client, MockEndpoint};
use weiss_gripkit::commands::{SetGripperResult, SET_GRIPPER};
use weiss_gripkit::drivers::CommandSender;
use weiss_gripkit::xmlrpc::Value;
use weiss_gripkit::{FaultCode, RpcError};

#[tokio::test]
async fn test_grip_and_release_params() {
    let endpoint = Arc::new(MockEndpoint::new(|_, _| Ok(SetGripperResult::Accepted.to_value())));
    let sender = CommandSender::new(client(&endpoint, Duration::from_secs(1)));

    sender.grip().await;
    sender.release().await;

    assert_eq!(
        endpoint.calls(),
        vec![
            (SET_GRIPPER.to_string(), vec![Value::Bool(true)]),
            (SET_GRIPPER.to_string(), vec![Value::Bool(false)]),
        ]
    );
}

#[tokio::test]
async fn test_rejections_are_swallowed() {
    for reply in [
        SetGripperResult::NotActivated.to_value(),
        SetGripperResult::Failed.to_value(),
        Value::from(42),
        Value::from("odd"),
    ] {
        let endpoint = Arc::new(MockEndpoint::new(move |_, _| Ok(reply.clone())));
        let sender = CommandSender::new(client(&endpoint, Duration::from_secs(1)));

        sender.send_grip(true).await;
        assert_eq!(endpoint.call_count(), 1);
    }
}

#[tokio::test]
async fn test_transport_fault_is_swallowed() {
    let endpoint = Arc::new(MockEndpoint::new(|_, _| {
        Err(RpcError::FailedToSend("connection refused".to_string()))
    }));
    let sender = CommandSender::new(client(&endpoint, Duration::from_secs(1)));

    sender.send_grip(false).await;

    assert_eq!(endpoint.call_count(), 1, "Call is attempted once and not retried");
}

#[tokio::test]
async fn test_remote_fault_is_swallowed() {
    let endpoint = Arc::new(MockEndpoint::new(|_, _| Err(FaultCode::ApplicationError.fault("busy"))));
    let sender = CommandSender::new(client(&endpoint, Duration::from_secs(1)));

    sender.send_grip(true).await;
    sender.send_grip(false).await;

    assert_eq!(endpoint.call_count(), 2, "Each request is attempted exactly once");
    assert!(endpoint.calls().iter().all(|(method, _)| method == SET_GRIPPER));
}

#[tokio::test]
async fn test_timeout_bounds_the_wait() {
    let endpoint = Arc::new(
        MockEndpoint::new(|_, _| Ok(SetGripperResult::Accepted.to_value()))
            .with_delay(Duration::from_secs(2)),
    );
    let sender = CommandSender::new(client(&endpoint, Duration::from_millis(50)));

    let started = Instant::now();
    sender.grip().await;

    assert!(started.elapsed() < Duration::from_secs(1), "took {:?}", started.elapsed());
}

#[test]
fn test_result_codes() {
    assert_eq!(SetGripperResult::from_reply(&Value::from(1)), Some(SetGripperResult::Accepted));
    assert_eq!(SetGripperResult::from_reply(&Value::from(0)), Some(SetGripperResult::NotActivated));
    assert_eq!(SetGripperResult::from_reply(&Value::from(-1)), Some(SetGripperResult::Failed));
    assert_eq!(SetGripperResult::from_reply(&Value::from(2)), None);
    assert_eq!(SetGripperResult::from_reply(&Value::Bool(true)), None);
    assert_eq!(SetGripperResult::from_reply(&Value::Int(i64::MAX)), None);
}
