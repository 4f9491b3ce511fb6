//! Error types for the mcp-cli launcher.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::installer::AggregateFailure;

/// Launcher error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error(
        "None of the candidate executables were found in PATH (tried: {})",
        .candidates.join(", ")
    )]
    NotFound { candidates: Vec<String> },

    #[error("Failed to spawn {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0}")]
    Install(AggregateFailure),

    #[error("Process cancelled")]
    Cancelled,

    #[error("Process timed out after {0:?}")]
    TimedOut(Duration),
}
