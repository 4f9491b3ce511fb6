//! Installation and installation check commands.

use crate::config::Config;
use crate::delegate::McpCli;
use crate::error::Error;
use crate::installer::{InstallEvent, Installer};
use crate::launcher::{Launcher, ProcessSpawner, TokioSpawner};
use crate::resolver::{PathLookup, Resolver, WhichLookup};

/// Install mcp-cli using the configured strategies.
pub async fn run(config: &Config) -> Result<(), Error> {
    let package = config.install.package.clone();
    println!("Installing {package} Python package...");

    let installer = Installer::new(
        Resolver::new(WhichLookup::new()),
        Launcher::new(TokioSpawner),
        config.install.clone(),
    );
    installer
        .install(|event| println!("{}", describe(&package, &event)))
        .await?;

    Ok(())
}

/// Report whether mcp-cli is installed. Returns `true` when it is.
pub async fn check(config: &Config) -> bool {
    let cli = McpCli::from_config(config.python.clone());
    let (installed, lines) = status(&cli, &config.install.package).await;
    for line in lines {
        println!("{line}");
    }
    installed
}

/// Runs `--version` once; any failure counts as not installed.
async fn status<L: PathLookup, S: ProcessSpawner>(
    cli: &McpCli<L, S>,
    package: &str,
) -> (bool, Vec<String>) {
    match cli.version().await {
        Ok(Some(version)) if !version.is_empty() => {
            (true, vec![format!("{package} is installed ({version})")])
        }
        Ok(Some(_)) => (true, vec![format!("{package} is installed")]),
        Ok(None) | Err(_) => (
            false,
            vec![
                format!("{package} is not installed"),
                "  Run: mcp-cli-install".to_string(),
            ],
        ),
    }
}

/// Progress line for an install event.
fn describe(package: &str, event: &InstallEvent) -> String {
    match event {
        InstallEvent::Attempting {
            strategy,
            executable,
        } => format!(
            "Found {} at {}, installing with {strategy}...",
            executable.name,
            executable.path.display()
        ),
        InstallEvent::Fallback { failure, next } => format!(
            "{}: {}, trying {next}...",
            failure.strategy, failure.reason
        ),
        InstallEvent::Installed { strategy } => {
            format!("{package} installed successfully with {strategy}!")
        }
    }
}
