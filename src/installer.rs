//! Installation of the delegated tool through an ordered strategy list.
//!
//! Strategies are tried in priority order with early exit on the first
//! success. A failed strategy that has a successor is reported as a
//! fallback event; only exhaustion of the whole list is surfaced as an error.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::InstallConfig;
use crate::error::Error;
use crate::launcher::{ExitStatus, IoPolicy, Launcher, ProcessSpawner};
use crate::resolver::{PathLookup, ResolvedExecutable, Resolver};

/// One way to obtain the delegated tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallStrategy {
    pub name: String,
    /// Executables that can run this strategy, most preferred first.
    pub candidates: Vec<String>,
    /// Command template; `{package}` and `{source}` are substituted.
    pub args: Vec<String>,
}

impl InstallStrategy {
    pub fn new<C, A>(
        name: impl Into<String>,
        candidates: impl IntoIterator<Item = C>,
        args: impl IntoIterator<Item = A>,
    ) -> Self
    where
        C: Into<String>,
        A: Into<String>,
    {
        Self {
            name: name.into(),
            candidates: candidates.into_iter().map(Into::into).collect(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Substitute placeholders in the command template.
    pub fn render_args(&self, package: &str, source: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace("{package}", package).replace("{source}", source))
            .collect()
    }
}

/// Why a single strategy failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureReason {
    NotFound { candidates: Vec<String> },
    Spawn { message: String },
    /// Started, but waiting on it failed.
    Aborted { message: String },
    NonzeroExit { status: ExitStatus },
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound { candidates } => {
                write!(f, "not found (tried: {})", candidates.join(", "))
            }
            Self::Spawn { message } => write!(f, "failed to start: {message}"),
            Self::Aborted { message } => write!(f, "failed while running: {message}"),
            Self::NonzeroExit { status } => write!(f, "installer exited with {status}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyFailure {
    pub strategy: String,
    pub reason: FailureReason,
}

/// Every strategy was tried and none succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateFailure {
    pub attempts: Vec<StrategyFailure>,
    /// Manual install command for the user.
    pub remediation: String,
}

impl fmt::Display for AggregateFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Installation failed:")?;
        for attempt in &self.attempts {
            writeln!(f, "  {}: {}", attempt.strategy, attempt.reason)?;
        }
        writeln!(f, "Please install manually:")?;
        write!(f, "  {}", self.remediation)
    }
}

/// Successful installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallReport {
    pub strategy: String,
    pub executable: ResolvedExecutable,
    /// Strategies that failed before the successful one.
    pub skipped: Vec<StrategyFailure>,
}

/// Progress notifications emitted during [`Installer::install`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallEvent {
    Attempting {
        strategy: String,
        executable: ResolvedExecutable,
    },
    Fallback {
        failure: StrategyFailure,
        next: String,
    },
    Installed {
        strategy: String,
    },
}

/// Runs install strategies in order until one succeeds.
pub struct Installer<L, S> {
    resolver: Resolver<L>,
    launcher: Launcher<S>,
    config: InstallConfig,
}

impl<L: PathLookup, S: ProcessSpawner> Installer<L, S> {
    pub fn new(resolver: Resolver<L>, launcher: Launcher<S>, config: InstallConfig) -> Self {
        Self {
            resolver,
            launcher,
            config,
        }
    }

    /// Install the tool, reporting progress through `on_event`.
    pub async fn install<F>(&self, mut on_event: F) -> Result<InstallReport, Error>
    where
        F: FnMut(InstallEvent),
    {
        let mut failures = Vec::new();
        let strategies = &self.config.strategies;

        for (index, strategy) in strategies.iter().enumerate() {
            match self.attempt(strategy, &mut on_event).await {
                Ok(executable) => {
                    info!(strategy = %strategy.name, "Installation succeeded");
                    on_event(InstallEvent::Installed {
                        strategy: strategy.name.clone(),
                    });
                    return Ok(InstallReport {
                        strategy: strategy.name.clone(),
                        executable,
                        skipped: failures,
                    });
                }
                Err(reason) => {
                    let failure = StrategyFailure {
                        strategy: strategy.name.clone(),
                        reason,
                    };
                    if let Some(next) = strategies.get(index + 1) {
                        // The caller reports fallbacks through `on_event`.
                        info!(
                            strategy = %failure.strategy,
                            reason = %failure.reason,
                            next = %next.name,
                            "Install strategy failed, falling back"
                        );
                        on_event(InstallEvent::Fallback {
                            failure: failure.clone(),
                            next: next.name.clone(),
                        });
                    }
                    failures.push(failure);
                }
            }
        }

        // The manual command needs the interpreter the last strategy looked for.
        let interpreter_missing = matches!(
            failures.last(),
            Some(StrategyFailure {
                reason: FailureReason::NotFound { .. },
                ..
            })
        );

        Err(Error::Install(AggregateFailure {
            attempts: failures,
            remediation: self.config.remediation(interpreter_missing),
        }))
    }

    async fn attempt<F>(
        &self,
        strategy: &InstallStrategy,
        on_event: &mut F,
    ) -> Result<ResolvedExecutable, FailureReason>
    where
        F: FnMut(InstallEvent),
    {
        let executable = self
            .resolver
            .resolve(strategy.candidates.as_slice())
            .map_err(|_| FailureReason::NotFound {
                candidates: strategy.candidates.clone(),
            })?;

        on_event(InstallEvent::Attempting {
            strategy: strategy.name.clone(),
            executable: executable.clone(),
        });

        let args = strategy.render_args(&self.config.package, &self.config.source);
        let result = self
            .launcher
            .launch(&executable.path, &[] as &[&str], args.as_slice(), IoPolicy::Inherit)
            .await
            .map_err(|e| match e {
                Error::Spawn { .. } => FailureReason::Spawn {
                    message: e.to_string(),
                },
                other => FailureReason::Aborted {
                    message: other.to_string(),
                },
            })?;

        if result.status.success() {
            Ok(executable)
        } else {
            Err(FailureReason::NonzeroExit {
                status: result.status,
            })
        }
    }
}
