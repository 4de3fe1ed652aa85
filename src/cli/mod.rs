//! CLI command handling module
//!
//! Handles argument parsing, the `config` subcommands and debug logging.

mod config;
mod logging;

pub use config::{ConfigSubcommand, handle_config_command};
pub use logging::init_logging;

use clap::{Parser, Subcommand};

/// dockhand - a keyboard-driven terminal UI for Docker
#[derive(Parser, Debug)]
#[command(name = "dockhand", version)]
#[command(about = "A keyboard-driven terminal UI for managing Docker resources", long_about = None)]
pub struct Args {
    /// Enable debug logging
    #[arg(long, short = 'd')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Configuration management
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}
