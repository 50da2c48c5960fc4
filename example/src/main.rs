// One-shot GripKit client
// Run with: cargo run -p example -- <status|grip|release|watch>
// Against the simulator: cargo run -p sim

use std::error::Error;

use serde::Serialize;
use tokio::sync::watch;
use tracing::info;
use weiss_gripkit::drivers::{CommandSender, GripkitConfig, RpcClient, StatusPoller};
use weiss_gripkit::panel::GripperPanel;
use weiss_gripkit::DeviceSnapshot;

#[derive(Serialize)]
struct StatusOutput<'a> {
    endpoint: &'a str,
    #[serde(flatten)]
    snapshot: DeviceSnapshot,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt::init();

    let command = std::env::args().nth(1).unwrap_or_else(|| "status".to_string());
    let config = GripkitConfig::from_env();
    if let Err(e) = config.validate() {
        return Err(format!("Configuration error: {}", e).into());
    }
    let endpoint = config.connection_url();
    info!("Using endpoint {}", endpoint);

    match command.as_str() {
        "status" => {
            let client = RpcClient::from_config(&config)?;
            let snapshot = StatusPoller::new(client, config.poll_interval()).poll_once().await;
            let output = StatusOutput {
                endpoint: &endpoint,
                snapshot,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        "grip" | "release" => {
            let sender = CommandSender::new(RpcClient::from_config(&config)?);
            sender.send_grip(command == "grip").await;
            println!("Sent {} to {}", command, endpoint);
        }
        "watch" => watch_panel(&config).await?,
        other => {
            eprintln!("Unknown command `{}`. Use status, grip, release or watch.", other);
            std::process::exit(2);
        }
    }

    Ok(())
}

/// Prints every panel state change until Ctrl-C.
async fn watch_panel(config: &GripkitConfig) -> Result<(), Box<dyn Error>> {
    let panel = GripperPanel::start(config)?;
    let mut updates: watch::Receiver<_> = panel.subscribe();
    println!("{}", serde_json::to_string(&panel.current_state())?);

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *updates.borrow_and_update();
                println!("{}", serde_json::to_string(&state)?);
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    panel.shutdown().await;
    Ok(())
}
