//! `lazarus serve` command implementation.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;
use lazarus_gate::CommandGate;
use lazarus_recovery::{CommandRemediation, RecoveryValidator, SecretStore};
use lazarus_server::{AppState, bind, serve};
use tracing::info;

use crate::config::LazarusConfig;
use crate::signal::shutdown_signal;

/// Arguments for the `lazarus serve` command.
#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override `server.listen`.
    #[arg(long)]
    pub listen: Option<SocketAddr>,

    /// Override `recovery.hash_file`.
    #[arg(long)]
    pub hash_file: Option<PathBuf>,
}

/// Run the serve command.
pub fn run(mut config: LazarusConfig, args: &ServeArgs) -> Result<()> {
    if let Some(listen) = args.listen {
        config.server.listen = listen;
    }
    if let Some(path) = &args.hash_file {
        config.recovery.hash_file.clone_from(path);
    }
    config.validate()?;

    let hash = SecretStore::new(&config.recovery.hash_file)
        .load()
        .context("loading verification hash; run `lazarus setup` first")?;

    let validator = RecoveryValidator::new(
        config.recovery.clone(),
        hash,
        Arc::new(CommandGate::from_config(&config.gate)),
        Arc::new(CommandRemediation::from_config(&config.remediation)),
    )?;
    let state = AppState::new(Arc::new(validator));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;

    runtime.block_on(async move {
        let listener = bind(config.server.listen).await?;
        serve(listener, state, &config.server, shutdown_signal()).await?;
        info!("recovery endpoint stopped");
        Ok::<(), anyhow::Error>(())
    })
}
