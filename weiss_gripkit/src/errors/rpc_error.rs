use std::error::Error;
use std::fmt;
use std::time::Duration;
use int_enum::IntEnum;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum RpcError {
    /// The call did not complete within the per-call timeout.
    Timeout(Duration),
    /// The endpoint answered with an XML-RPC `<fault>`.
    Fault { code: i32, description: String },
    /// The reply was not valid XML-RPC or lacked an expected member.
    MalformedReply(String),
    FailedToSend(String),
    FailedToReceive(String),
    Disconnected(),
    Configuration(String),
}

impl RpcError {
    /// Standard fault code, when the remote used one of the well-known values.
    pub fn fault_code(&self) -> Option<FaultCode> {
        match *self {
            RpcError::Fault { code, .. } => FaultCode::try_from(code).ok(),
            _ => None,
        }
    }
}

impl Error for RpcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        None
    }
}

impl fmt::Display for RpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            RpcError::Timeout(ref limit) => write!(f, "call timed out after {:?}", limit),
            RpcError::Fault { code, ref description } => match FaultCode::try_from(code) {
                Ok(known) => write!(f, "remote fault {} ({}): {}", code, known.message(), description),
                Err(_) => write!(f, "remote fault {}: {}", code, description),
            },
            RpcError::MalformedReply(ref msg) => write!(f, "malformed reply: {}", msg),
            RpcError::FailedToSend(ref msg) => write!(f, "SendError: {}", msg),
            RpcError::FailedToReceive(ref msg) => write!(f, "ReceiveError: {}", msg),
            RpcError::Disconnected() => write!(f, "endpoint closed the connection"),
            RpcError::Configuration(ref msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

/// Interoperability fault codes shared by most XML-RPC servers.
#[repr(i32)]
#[derive(Debug, Serialize, Deserialize, IntEnum, Clone, Copy, PartialEq, Eq)]
pub enum FaultCode {
    ParseError = -32700,
    InvalidRequest = -32600,
    MethodNotFound = -32601,
    InvalidParams = -32602,
    InternalError = -32603,
    ApplicationError = -32500,
}

impl FaultCode {
    pub fn message(&self) -> &str {
        match self {
            FaultCode::ParseError => "Parse error, not well formed.",
            FaultCode::InvalidRequest => "Invalid XML-RPC request.",
            FaultCode::MethodNotFound => "Requested method not found.",
            FaultCode::InvalidParams => "Invalid method parameters.",
            FaultCode::InternalError => "Internal XML-RPC error.",
            FaultCode::ApplicationError => "Application error.",
        }
    }

    pub fn code(self) -> i32 {
        i32::from(self)
    }

    /// [`RpcError::Fault`] carrying this code.
    pub fn fault<S: Into<String>>(self, description: S) -> RpcError {
        RpcError::Fault {
            code: self.code(),
            description: description.into(),
        }
    }
}
