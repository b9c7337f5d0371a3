//! Lazarus operator CLI.
//!
//! - `lazarus setup` - generate shares, gate credential and verification hash
//! - `lazarus serve` - run the recovery endpoint
//! - `lazarus check` - validate configuration and deployed state

#![forbid(unsafe_code)]

mod check;
mod config;
mod serve;
mod setup;
mod signal;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::LazarusConfig;

/// Break-glass recovery for remote hosts.
#[derive(Parser)]
#[command(name = "lazarus")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file (default: /etc/lazarus/lazarus.toml if present).
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Emit JSON log lines on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate recovery material. Runs once per deployment.
    ///
    /// Prints the master secret, the shares and the administrator credential
    /// to stdout exactly once, installs the gate authorization and writes the
    /// verification hash.
    Setup(setup::SetupArgs),

    /// Serve the recovery endpoint until interrupted.
    Serve(serve::ServeArgs),

    /// Validate configuration and deployed state.
    Check(check::CheckArgs),
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = LazarusConfig::load(cli.config.as_deref())?;
    if cli.json_logs {
        config.logging.json = true;
    }
    // Logs go to stderr so stdout carries only the one-time disclosure.
    lazarus_server::init_logging(&config.logging)?;

    match cli.command {
        Commands::Setup(args) => setup::run(config, &args),
        Commands::Serve(args) => serve::run(config, &args),
        Commands::Check(args) => check::run(&config, &args),
    }
}
