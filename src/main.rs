//! dockhand - a keyboard-driven terminal UI for Docker
//!
//! Connects to the local daemon, opens the group store and hands both to
//! the TUI.

use anyhow::{Context, Result};
use clap::Parser;
use dockhand::cli::{self, Args, Command};
use dockhand::config::{ConfigLoader, paths};
use dockhand::docker::{DockerClient, ResourceClient, Timeouts};
use dockhand::groups::GroupStore;
use dockhand::tui::{self, Theme};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(Command::Config { subcommand }) = args.command {
        return cli::handle_config_command(subcommand);
    }

    // Print the log location before the TUI takes over the terminal
    if let Some(log_path) = cli::init_logging(args.debug)? {
        eprintln!(
            "Debug logging enabled. Logs written to: {}",
            log_path.display()
        );
    }

    let config = ConfigLoader::load().context("Failed to load configuration")?;
    tracing::debug!(
        refresh_ms = config.refresh_interval_ms,
        log_buffer = config.logger.buffer,
        "configuration loaded"
    );

    let client = DockerClient::connect(Timeouts::from(&config.timeouts))
        .context("Failed to connect to the Docker daemon")?;
    client
        .ping()
        .await
        .context("Docker daemon is not reachable; is it running?")?;
    tracing::info!("connected to Docker daemon");

    let groups_path = paths::groups_path();
    let store = GroupStore::open(&groups_path)
        .with_context(|| format!("Failed to open group store {}", groups_path.display()))?;

    tui::run_tui(Arc::new(client), Arc::new(store), config, Theme::default()).await
}
