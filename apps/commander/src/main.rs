//! adbherd — discover ADB endpoints and broadcast commands to the fleet.

mod adapters;
mod app;
mod config;
mod log;
mod tui;
mod ui;

use std::io;
use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use adbherd_adb::AdbClient;
use adbherd_fleet::FleetManager;

use adapters::{AdbEndpoint, ShodanDiscovery};
use config::CommanderConfig;
use tui::Commander;

#[tokio::main]
async fn main() -> io::Result<()> {
    // The TUI owns stdout; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,adbherd=debug")),
        )
        .with_writer(io::stderr)
        .init();

    let cfg = CommanderConfig::load();

    let provider = Arc::new(ShodanDiscovery::new(&cfg.shodan_api_key));
    let client = Arc::new(AdbEndpoint::new(AdbClient::new(cfg.adb_config())));
    let manager = Arc::new(FleetManager::new(provider, client, cfg.query.clone()));

    let mut commander = Commander::new(manager)?;
    let result = commander.run().await;
    commander.restore()?;
    result
}
