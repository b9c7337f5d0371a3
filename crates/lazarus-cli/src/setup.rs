//! `lazarus setup` command implementation.
//!
//! Signal handlers are installed before any material is generated, so an
//! interrupt at the confirmation prompt still shreds the staged credential.

use std::future::Future;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::Args;
use lazarus_recovery::{SecretStore, ShareGenerator};
use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::config::LazarusConfig;
use crate::signal::interrupted;

/// Arguments for the `lazarus setup` command.
#[derive(Args, Debug)]
pub struct SetupArgs {
    /// Override `recovery.hash_file`.
    #[arg(long)]
    pub hash_file: Option<PathBuf>,

    /// Do not wait for confirmation before shredding the staged credential.
    #[arg(long, short = 'y', default_value_t = false)]
    pub yes: bool,
}

enum Confirmation {
    Confirmed,
    Interrupted,
}

/// Run the setup command.
pub fn run(mut config: LazarusConfig, args: &SetupArgs) -> Result<()> {
    if let Some(path) = &args.hash_file {
        config.recovery.hash_file.clone_from(path);
    }
    config.validate()?;

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?;
    let interrupt = runtime
        .block_on(async { interrupted() })
        .context("installing signal handlers")?;

    let recovery = &config.recovery;
    let generator = ShareGenerator::new(
        SecretStore::new(&recovery.hash_file),
        config.gate.clone(),
        config.setup.clone(),
    )
    .with_listen_addr(config.server.listen);

    let material = generator
        .generate(recovery.total_shares, recovery.threshold)
        .context("setup failed")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let disclosed = material.disclose(&mut out)?;

    if let Some(staging) = disclosed.staging_path() {
        writeln!(out)?;
        writeln!(
            out,
            "The credential file {} is removed when setup exits.",
            staging.display()
        )?;
    }

    let confirmation = if args.yes {
        Confirmation::Confirmed
    } else {
        write!(out, "Press Enter once the shares and credential are recorded: ")?;
        out.flush()?;
        runtime.block_on(confirm(interrupt))
    };

    disclosed.finish().context("shredding staged credential")?;

    if let Confirmation::Interrupted = confirmation {
        warn!("setup interrupted at confirmation; staged credential shredded");
        writeln!(out)?;
        bail!("setup interrupted; the staged credential was removed");
    }

    info!(hash = %recovery.hash_file.display(), "setup complete");
    writeln!(out, "Setup complete.")?;
    Ok(())
}

/// Wait for a line on stdin or a termination signal, whichever comes first.
///
/// End of input counts as confirmation. On interrupt the reader thread is
/// left blocked and dies with the process.
async fn confirm(interrupt: impl Future<Output = ()>) -> Confirmation {
    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        let mut line = String::new();
        let _ = tx.send(io::stdin().lock().read_line(&mut line));
    });

    tokio::select! {
        () = interrupt => Confirmation::Interrupted,
        _ = rx => Confirmation::Confirmed,
    }
}
