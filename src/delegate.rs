//! The delegated `mcp-cli` tool, invoked as `<python> -m <module> <args...>`.

use std::ffi::OsStr;

use tracing::debug;

use crate::config::PythonConfig;
use crate::error::Error;
use crate::launcher::{
    ExecutionRequest, ExecutionResult, IoPolicy, Launcher, ProcessSpawner, TokioSpawner,
};
use crate::resolver::{PathLookup, ResolvedExecutable, Resolver, WhichLookup};

/// Resolves an interpreter and forwards invocations to the tool's module.
pub struct McpCli<L = WhichLookup, S = TokioSpawner> {
    resolver: Resolver<L>,
    launcher: Launcher<S>,
    python: PythonConfig,
}

impl McpCli<WhichLookup, TokioSpawner> {
    /// Use the process `PATH` and real child processes.
    pub fn from_config(python: PythonConfig) -> Self {
        Self::new(Resolver::default(), Launcher::default(), python)
    }
}

impl<L: PathLookup, S: ProcessSpawner> McpCli<L, S> {
    pub fn new(resolver: Resolver<L>, launcher: Launcher<S>, python: PythonConfig) -> Self {
        Self {
            resolver,
            launcher,
            python,
        }
    }

    /// Find the interpreter. Re-resolved on every call.
    pub fn interpreter(&self) -> Result<ResolvedExecutable, Error> {
        self.resolver.resolve(self.python.candidates.as_slice())
    }

    /// Build the request for `args` without running it.
    pub fn request<A: AsRef<OsStr>>(
        &self,
        args: &[A],
        io: IoPolicy,
    ) -> Result<ExecutionRequest, Error> {
        let interpreter = self.interpreter()?;
        Ok(ExecutionRequest::new(
            interpreter.path,
            self.python.module_prefix().as_slice(),
            args,
            io,
        ))
    }

    /// Run the tool once with `args` forwarded verbatim.
    pub async fn run<A: AsRef<OsStr>>(
        &self,
        args: &[A],
        io: IoPolicy,
    ) -> Result<ExecutionResult, Error> {
        let request = self.request(args, io)?;
        self.launcher.execute(&request).await
    }

    /// Whether `--version` succeeds. Lookup and spawn failures count as absent.
    pub async fn is_installed(&self) -> bool {
        match self.run(&["--version"], IoPolicy::Capture).await {
            Ok(result) => result.status.success(),
            Err(e) => {
                debug!(error = %e, "Installation check failed");
                false
            }
        }
    }

    /// Version string reported by the tool, trimmed.
    pub async fn version(&self) -> Result<Option<String>, Error> {
        let result = self.run(&["--version"], IoPolicy::Capture).await?;
        if !result.status.success() {
            return Ok(None);
        }
        Ok(Some(result.stdout_lossy().trim().to_string()))
    }
}
