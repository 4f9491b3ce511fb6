//! mcp-cli-install - installs the Python `mcp-cli` tool.

use std::path::PathBuf;

use clap::Parser;

use mcp_cli_launcher::config::Config;
use mcp_cli_launcher::{cli, logging, Error};

#[derive(Parser)]
#[command(name = "mcp-cli-install")]
#[command(about = "Install the mcp-cli Python tool with uv, falling back to pip")]
#[command(version)]
struct Cli {
    /// Only check whether mcp-cli is installed
    #[arg(long)]
    check: bool,

    /// Config file (defaults to ~/.mcp-cli/launcher.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    logging::init();

    let args = Cli::parse();

    let code = match run(args).await {
        Ok(code) => code,
        Err(Error::Install(failure)) => {
            eprintln!("{failure}");
            1
        }
        Err(e) => {
            eprintln!("Installation failed: {e}");
            1
        }
    };

    std::process::exit(code);
}

async fn run(args: Cli) -> Result<i32, Error> {
    let config = match &args.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };

    if args.check {
        let installed = cli::install::check(&config).await;
        return Ok(if installed { 0 } else { 1 });
    }

    cli::install::run(&config).await?;
    Ok(0)
}
