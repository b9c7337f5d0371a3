//! `lazarus check` command implementation.
//!
//! Verifies that a deployment can serve: configuration is valid, the hash
//! file loads with owner-only permissions, and the gate authorization record
//! is installed.

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::Args;
use lazarus_gate::auth_record_path;
use lazarus_recovery::SecretStore;

use crate::config::LazarusConfig;

/// Arguments for the `lazarus check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Override `recovery.hash_file`.
    #[arg(long)]
    pub hash_file: Option<PathBuf>,
}

/// Run the check command.
pub fn run(config: &LazarusConfig, args: &CheckArgs) -> Result<()> {
    config.validate()?;
    println!(
        "config: ok ({} of {} shares, {} attempts)",
        config.recovery.threshold, config.recovery.total_shares, config.recovery.max_attempts
    );

    let hash_file = args
        .hash_file
        .clone()
        .unwrap_or_else(|| config.recovery.hash_file.clone());

    let mut failures = 0;
    match SecretStore::new(&hash_file).load() {
        Ok(_) => println!("hash: ok ({})", hash_file.display()),
        Err(e) => {
            println!("hash: FAILED ({e})");
            failures += 1;
        }
    }

    let record = auth_record_path(&config.gate.hidden_service_dir, &config.gate.client_name)?;
    if record.is_file() {
        println!("gate: ok ({})", record.display());
    } else {
        println!("gate: FAILED (no authorization record at {})", record.display());
        failures += 1;
    }

    if failures > 0 {
        bail!("{failures} check(s) failed");
    }
    Ok(())
}
