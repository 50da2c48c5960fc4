mod rpc_error;
pub use rpc_error::*;
