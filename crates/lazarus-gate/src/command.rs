//! External commands run by the gate and by remediation.
//!
//! Commands are executed directly (no shell), with stdin closed and stdout
//! discarded. Stderr is captured so a failure can be logged locally.

use std::fmt;
use std::process::Stdio;

use serde::{Deserialize, Serialize};
use tokio::process::Command;

/// Maximum number of stderr bytes kept for a failure log line.
const STDERR_LOG_LIMIT: usize = 512;

/// A program plus its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShellCommand {
    /// Program to execute, resolved through `PATH`.
    pub program: String,

    /// Arguments passed verbatim.
    #[serde(default)]
    pub args: Vec<String>,
}

/// How a command ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Exited with status 0.
    Success,
    /// Exited non-zero or was killed by a signal (`None`).
    Failed {
        /// Exit code, if any.
        code: Option<i32>,
        /// Leading part of stderr, lossily decoded.
        stderr: String,
    },
}

impl CommandOutcome {
    /// Whether the command succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success)
    }
}

impl ShellCommand {
    /// Build a command from a program and arguments.
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Run to completion.
    ///
    /// # Errors
    /// Returns an IO error if the program cannot be spawned.
    pub async fn run(&self) -> std::io::Result<CommandOutcome> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            return Ok(CommandOutcome::Success);
        }

        let end = output.stderr.len().min(STDERR_LOG_LIMIT);
        Ok(CommandOutcome::Failed {
            code: output.status.code(),
            stderr: String::from_utf8_lossy(&output.stderr[..end]).trim().to_string(),
        })
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}
