//! Pass-through invocation of the delegated tool.

use std::ffi::OsString;

use tracing::debug;

use crate::config::{Config, PYTHON_DOWNLOAD_URL};
use crate::delegate::McpCli;
use crate::error::Error;
use crate::launcher::IoPolicy;

/// Forward `args` to `mcp-cli` and return the exit code to relay.
pub async fn run(config: &Config, args: Vec<OsString>) -> Result<i32, Error> {
    let cli = McpCli::from_config(config.python.clone());

    // Must be registered before the child starts, or an early Ctrl+C
    // kills us instead of just the child.
    ignore_interrupts()?;

    let result = cli.run(args.as_slice(), IoPolicy::Inherit).await?;
    debug!(status = %result.status, "mcp-cli exited");

    Ok(result.status.process_exit_code())
}

/// Message printed to stderr when mcp-cli could not be run.
pub fn diagnostic(error: &Error) -> String {
    let mut message = format!("Error executing mcp-cli: {error}");
    if matches!(error, Error::NotFound { .. }) {
        message.push_str("\nPython not found. Please install Python 3.11+ to use mcp-cli.");
        message.push_str(&format!("\nVisit: {PYTHON_DOWNLOAD_URL}"));
    }
    message
}

/// The child shares our terminal and handles Ctrl+C itself; stay alive so
/// its exit status can be relayed.
#[cfg(unix)]
fn ignore_interrupts() -> Result<(), Error> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupts = signal(SignalKind::interrupt())?;
    tokio::spawn(async move {
        while interrupts.recv().await.is_some() {
            debug!("Interrupt received, waiting for child to exit");
        }
    });
    Ok(())
}

#[cfg(windows)]
fn ignore_interrupts() -> Result<(), Error> {
    let mut interrupts = tokio::signal::windows::ctrl_c()?;
    tokio::spawn(async move {
        while interrupts.recv().await.is_some() {
            debug!("Interrupt received, waiting for child to exit");
        }
    });
    Ok(())
}
