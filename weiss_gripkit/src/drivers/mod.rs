mod driver_config;
pub use driver_config::*;

mod endpoint;
pub use endpoint::*;

mod rpc_client;
pub use rpc_client::*;

mod poller;
pub use poller::*;

mod command_sender;
pub use command_sender::*;
