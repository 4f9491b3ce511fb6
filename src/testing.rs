//! Test doubles for the lookup and spawner seams.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::Error;
use crate::launcher::{ExecutionRequest, ExecutionResult, ExitStatus, ProcessSpawner};
use crate::resolver::PathLookup;

/// In-memory lookup that records every lookup.
#[derive(Default)]
pub(crate) struct FakeLookup {
    entries: HashMap<String, PathBuf>,
    queried: Arc<Mutex<Vec<String>>>,
}

impl FakeLookup {
    /// Each name resolves to `/usr/bin/<name>`.
    pub(crate) fn with(names: &[&str]) -> Self {
        let entries = names
            .iter()
            .map(|n| (n.to_string(), PathBuf::from(format!("/usr/bin/{n}"))))
            .collect();
        Self {
            entries,
            queried: Arc::default(),
        }
    }

    pub(crate) fn queries(&self) -> Arc<Mutex<Vec<String>>> {
        self.queried.clone()
    }
}

impl PathLookup for FakeLookup {
    fn lookup(&self, name: &str) -> Option<PathBuf> {
        self.queried.lock().unwrap().push(name.to_string());
        self.entries.get(name).cloned()
    }
}

type Respond = dyn Fn(&ExecutionRequest) -> Result<ExecutionResult, Error> + Send + Sync;

enum Behavior {
    Respond(Box<Respond>),
    Hang,
}

/// Spawner that records requests instead of creating processes.
pub(crate) struct RecordingSpawner {
    calls: Arc<Mutex<Vec<ExecutionRequest>>>,
    behavior: Behavior,
}

impl RecordingSpawner {
    pub(crate) fn with<F>(respond: F) -> Self
    where
        F: Fn(&ExecutionRequest) -> Result<ExecutionResult, Error> + Send + Sync + 'static,
    {
        Self {
            calls: Arc::default(),
            behavior: Behavior::Respond(Box::new(respond)),
        }
    }

    /// Every request exits with `code` and no output.
    pub(crate) fn exiting(code: i32) -> Self {
        Self::with(move |_| Ok(exited(code, "")))
    }

    /// Every request runs until cancelled.
    pub(crate) fn hanging() -> Self {
        Self {
            calls: Arc::default(),
            behavior: Behavior::Hang,
        }
    }

    pub(crate) fn calls(&self) -> Arc<Mutex<Vec<ExecutionRequest>>> {
        self.calls.clone()
    }
}

/// A result with the given exit code and stdout.
pub(crate) fn exited(code: i32, stdout: &str) -> ExecutionResult {
    ExecutionResult {
        status: ExitStatus::Exited(code),
        stdout: stdout.as_bytes().to_vec(),
        stderr: Vec::new(),
    }
}

/// A spawn failure for `request`.
pub(crate) fn spawn_error(request: &ExecutionRequest) -> Error {
    Error::Spawn {
        program: request.program.clone(),
        source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
    }
}

#[async_trait]
impl ProcessSpawner for RecordingSpawner {
    async fn run(
        &self,
        request: &ExecutionRequest,
        cancel: CancellationToken,
    ) -> Result<ExecutionResult, Error> {
        self.calls.lock().unwrap().push(request.clone());
        match &self.behavior {
            Behavior::Respond(respond) => respond(request),
            Behavior::Hang => {
                cancel.cancelled().await;
                Err(Error::Cancelled)
            }
        }
    }
}
