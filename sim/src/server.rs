use std::error::Error;
use std::time::{Duration, Instant};

use axum::extract::State;
use axum::http::{header, Uri};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::time::sleep;
use tracing::{debug, info};
use weiss_gripkit::commands::{GET_STATUS, SET_GRIPPER};
use weiss_gripkit::xmlrpc::{self, Value};
use weiss_gripkit::{FaultCode, RpcError};

use crate::device::{GripperDevice, SharedDevice};

/// XML-RPC on `POST` to any path. Other methods get `405`.
pub fn router(device: SharedDevice) -> Router {
    Router::new()
        .route("/", post(rpc))
        .route("/*path", post(rpc))
        .with_state(device)
}

/// Serves [`router`] until the listener fails.
pub async fn serve(listener: TcpListener, device: SharedDevice) -> Result<(), Box<dyn Error + Send + Sync>> {
    info!("Simulator listening on {}", listener.local_addr()?);
    axum::serve(listener, router(device)).await?;
    Ok(())
}

async fn rpc(State(device): State<SharedDevice>, uri: Uri, body: String) -> impl IntoResponse {
    debug!("POST {}", uri.path());
    let xml = handle_request(&body, &device).await;
    ([(header::CONTENT_TYPE, "text/xml")], xml)
}

/// Answers one `<methodCall>` document with a `<methodResponse>` document.
pub async fn handle_request(xml: &str, device: &SharedDevice) -> String {
    let (method, params) = match xmlrpc::decode_call(xml) {
        Ok(call) => call,
        Err(e) => return xmlrpc::encode_fault(FaultCode::ParseError.code(), &e.to_string()),
    };

    let delay = device.lock().await.response_delay();
    if !delay.is_zero() {
        sleep(delay).await;
    }

    let result = {
        let mut device = device.lock().await;
        dispatch(&method, &params, &mut device, Instant::now())
    };
    match result {
        Ok(value) => xmlrpc::encode_response(&value),
        Err(RpcError::Fault { code, description }) => {
            debug!("{} -> fault {}", method, code);
            xmlrpc::encode_fault(code, &description)
        }
        Err(e) => xmlrpc::encode_fault(FaultCode::InternalError.code(), &e.to_string()),
    }
}

/// Runs one method against the device model.
///
/// Besides the two device methods, `sim.*` methods change the simulated
/// conditions so clients can be exercised against them.
pub fn dispatch(method: &str, params: &[Value], device: &mut GripperDevice, now: Instant) -> Result<Value, RpcError> {
    match method {
        GET_STATUS => {
            expect_params(method, params, 0)?;
            Ok(device.status_reply(now).to_value())
        }
        SET_GRIPPER => {
            let close = bool_param(method, params)?;
            let result = device.set_gripper(close, now);
            debug!("setGripper({}) -> {:?}", close, result);
            Ok(result.to_value())
        }
        "sim.activate" => {
            expect_params(method, params, 0)?;
            device.activate();
            Ok(Value::Bool(true))
        }
        "sim.deactivate" => {
            expect_params(method, params, 0)?;
            device.deactivate();
            Ok(Value::Bool(true))
        }
        "sim.mount" => {
            expect_params(method, params, 0)?;
            device.set_mounted(true);
            Ok(Value::Bool(true))
        }
        "sim.unmount" => {
            expect_params(method, params, 0)?;
            device.set_mounted(false);
            Ok(Value::Bool(true))
        }
        "sim.setPartPresent" => {
            device.set_part_present(bool_param(method, params)?);
            Ok(Value::Bool(true))
        }
        "sim.setStatusReadable" => {
            device.set_status_readable(bool_param(method, params)?);
            Ok(Value::Bool(true))
        }
        "sim.setResponseDelay" => {
            expect_params(method, params, 1)?;
            let ms = params[0]
                .as_i64()
                .and_then(|ms| u64::try_from(ms).ok())
                .ok_or_else(|| FaultCode::InvalidParams.fault(format!("{} expects a non-negative int", method)))?;
            device.set_response_delay(Duration::from_millis(ms));
            Ok(Value::Bool(true))
        }
        other => Err(FaultCode::MethodNotFound.fault(format!("method not found: {}", other))),
    }
}

fn expect_params(method: &str, params: &[Value], count: usize) -> Result<(), RpcError> {
    if params.len() != count {
        return Err(FaultCode::InvalidParams.fault(format!(
            "{} takes {} parameter(s), got {}",
            method,
            count,
            params.len()
        )));
    }
    Ok(())
}

fn bool_param(method: &str, params: &[Value]) -> Result<bool, RpcError> {
    expect_params(method, params, 1)?;
    params[0]
        .as_bool()
        .ok_or_else(|| FaultCode::InvalidParams.fault(format!("{} expects a boolean", method)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_method_is_fault() {
        let mut device = GripperDevice::default();
        let err = dispatch("getStatsu", &[], &mut device, Instant::now()).unwrap_err();

        assert_eq!(err.fault_code(), Some(FaultCode::MethodNotFound));
    }

    #[test]
    fn set_gripper_needs_one_bool() {
        let mut device = GripperDevice::default();
        let now = Instant::now();

        for params in [vec![], vec![Value::from("yes")], vec![Value::Bool(true), Value::Bool(false)]] {
            let err = dispatch(SET_GRIPPER, &params, &mut device, now).unwrap_err();
            assert_eq!(err.fault_code(), Some(FaultCode::InvalidParams), "{:?}", params);
        }
        assert!(dispatch(SET_GRIPPER, &[Value::from(1)], &mut device, now).is_ok());
    }

    #[test]
    fn negative_delay_is_rejected() {
        let mut device = GripperDevice::default();
        let err = dispatch("sim.setResponseDelay", &[Value::from(-5)], &mut device, Instant::now()).unwrap_err();

        assert_eq!(err.fault_code(), Some(FaultCode::InvalidParams));
    }
}
