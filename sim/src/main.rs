use std::error::Error;

use sim::{serve, SimConfig};
use tokio::net::TcpListener;
use tracing::info;

/// Usage: `sim [config.json]`. Without a file, `GRIPKIT_SIM_PORT` and
/// `GRIPKIT_SIM_TRAVEL_MS` override the defaults.
#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    tracing_subscriber::fmt::init();

    let config = match std::env::args().nth(1) {
        Some(path) => SimConfig::from_json_file(path)?,
        None => SimConfig::from_env(),
    };
    info!("Starting gripper simulator: {:?}", config);

    let listener = TcpListener::bind(("0.0.0.0", config.port)).await?;
    serve(listener, config.device().shared()).await
}
