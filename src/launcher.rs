//! Delegated process launcher.
//!
//! Spawns one child per call and resolves once with its final
//! [`ExecutionResult`], or fails once with [`Error::Spawn`]. A nonzero exit
//! is a normal result; interpreting it is the caller's job.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::Error;

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoPolicy {
    /// Connect the child directly to the parent's streams.
    Inherit,
    /// Buffer stdout and stderr; stdin is closed unless requested.
    Capture,
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitStatus {
    /// Normal exit with a code.
    Exited(i32),
    /// Terminated by a signal (Unix only).
    Signaled(i32),
}

impl ExitStatus {
    /// Exit code, absent when the child was signaled.
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Exited(code) => Some(*code),
            Self::Signaled(_) => None,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Exited(0))
    }

    /// Code for the parent to exit with. Signals map to `128 + signal`.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::Exited(code) => *code,
            Self::Signaled(signal) => 128 + signal,
        }
    }
}

impl std::fmt::Display for ExitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exited(code) => write!(f, "exit code {code}"),
            Self::Signaled(signal) => write!(f, "signal {signal}"),
        }
    }
}

impl From<std::process::ExitStatus> for ExitStatus {
    fn from(status: std::process::ExitStatus) -> Self {
        match status.code() {
            Some(code) => Self::Exited(code),
            None => Self::Signaled(signal_number(&status)),
        }
    }
}

#[cfg(unix)]
fn signal_number(status: &std::process::ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().unwrap_or(0)
}

#[cfg(not(unix))]
fn signal_number(_status: &std::process::ExitStatus) -> i32 {
    0
}

/// A single child invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionRequest {
    pub program: PathBuf,
    /// Full argv after the program: prefix followed by caller arguments.
    pub args: Vec<OsString>,
    pub io: IoPolicy,
    /// Forward the parent's stdin under [`IoPolicy::Capture`].
    pub forward_stdin: bool,
}

impl ExecutionRequest {
    pub fn new<P, A>(program: impl Into<PathBuf>, prefix: &[P], args: &[A], io: IoPolicy) -> Self
    where
        P: AsRef<OsStr>,
        A: AsRef<OsStr>,
    {
        let args = prefix
            .iter()
            .map(|a| a.as_ref().to_os_string())
            .chain(args.iter().map(|a| a.as_ref().to_os_string()))
            .collect();
        Self {
            program: program.into(),
            args,
            io,
            forward_stdin: false,
        }
    }

    #[must_use]
    pub fn with_stdin(mut self) -> Self {
        self.forward_stdin = true;
        self
    }
}

/// Final state of a completed child.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub status: ExitStatus,
    /// Captured stdout, verbatim. Empty under [`IoPolicy::Inherit`].
    pub stdout: Vec<u8>,
    /// Captured stderr, verbatim. Empty under [`IoPolicy::Inherit`].
    pub stderr: Vec<u8>,
}

impl ExecutionResult {
    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).into_owned()
    }
}

/// Runs an [`ExecutionRequest`] to completion.
///
/// Implementations must kill the child and return [`Error::Cancelled`] when
/// `cancel` fires, and must kill the child if the returned future is dropped.
#[async_trait]
pub trait ProcessSpawner: Send + Sync {
    async fn run(
        &self,
        request: &ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<ExecutionResult, Error>;
}

/// Spawns real processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSpawner;

#[async_trait]
impl ProcessSpawner for TokioSpawner {
    async fn run(
        &self,
        request: &ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<ExecutionResult, Error> {
        let mut cmd = Command::new(&request.program);
        cmd.args(&request.args).kill_on_drop(true);

        match request.io {
            IoPolicy::Inherit => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            IoPolicy::Capture => {
                let stdin = if request.forward_stdin {
                    Stdio::inherit()
                } else {
                    Stdio::null()
                };
                cmd.stdin(stdin)
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
        }

        debug!("Executing: {:?}", cmd);

        let child = cmd.spawn().map_err(|source| Error::Spawn {
            program: request.program.clone(),
            source,
        })?;
        let pid = child.id();

        // Dropping the wait future drops the child, which kills it.
        let output = tokio::select! {
            output = child.wait_with_output() => output?,
            _ = cancel.cancelled() => {
                warn!(pid, program = %request.program.display(), "Cancelling child process");
                return Err(Error::Cancelled);
            }
        };

        let status = ExitStatus::from(output.status);
        debug!(pid, %status, "Child process exited");

        Ok(ExecutionResult {
            status,
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Launches delegated processes.
pub struct Launcher<S = TokioSpawner> {
    spawner: S,
}

impl Default for Launcher<TokioSpawner> {
    fn default() -> Self {
        Self::new(TokioSpawner)
    }
}

impl<S: ProcessSpawner> Launcher<S> {
    pub fn new(spawner: S) -> Self {
        Self { spawner }
    }

    /// Run `executable prefix... args...` and wait for it to exit.
    pub async fn launch<P, A>(
        &self,
        executable: &Path,
        prefix: &[P],
        args: &[A],
        io: IoPolicy,
    ) -> Result<ExecutionResult, Error>
    where
        P: AsRef<OsStr>,
        A: AsRef<OsStr>,
    {
        self.execute(&ExecutionRequest::new(executable, prefix, args, io))
            .await
    }

    /// Run a prepared request with no time bound.
    pub async fn execute(&self, request: &ExecutionRequest) -> Result<ExecutionResult, Error> {
        self.spawner.run(request, CancellationToken::new()).await
    }

    /// Run a request, killing the child when `cancel` fires.
    pub async fn launch_cancellable(
        &self,
        request: &ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<ExecutionResult, Error> {
        self.spawner.run(request, cancel).await
    }

    /// Run a request, killing the child if it outlives `limit`.
    pub async fn launch_with_timeout(
        &self,
        request: &ExecutionRequest,
        limit: Duration,
    ) -> Result<ExecutionResult, Error> {
        let cancel = CancellationToken::new();
        match tokio::time::timeout(limit, self.spawner.run(request, cancel.clone())).await {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                warn!(program = %request.program.display(), ?limit, "Child process timed out");
                Err(Error::TimedOut(limit))
            }
        }
    }
}
