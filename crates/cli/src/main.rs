//! Herald CLI
//!
//! Runs workflow activities locally against a simulated message store.

mod commands;
mod config;
mod telemetry;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::debug;

use crate::config::HeraldConfig;

/// Herald CLI: run workflow activities locally.
#[derive(Parser, Debug)]
#[command(name = "herald", version, about)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(
        long,
        env = "HERALD_CONFIG",
        default_value = "herald.toml",
        global = true
    )]
    config: PathBuf,

    /// Output format.
    #[arg(long, default_value = "text", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run a send-message activity against the simulated message store.
    Send(commands::send::SendArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = HeraldConfig::load(&cli.config)?;
    telemetry::init(&config.logging);
    debug!(path = %cli.config.display(), "configuration loaded");

    match cli.command {
        Command::Send(args) => commands::send::run(&config, &args, &cli.format).await,
    }
}
