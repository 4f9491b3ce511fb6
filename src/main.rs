//! mcp-cli - forwards every argument to the Python `mcp-cli` tool.

use std::ffi::OsString;

use mcp_cli_launcher::config::Config;
use mcp_cli_launcher::{cli, logging, Error};

#[tokio::main]
async fn main() {
    logging::init();

    // Forwarded verbatim, so no argument parsing here.
    let args: Vec<OsString> = std::env::args_os().skip(1).collect();

    let code = match run(args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", cli::forward::diagnostic(&e));
            1
        }
    };

    std::process::exit(code);
}

async fn run(args: Vec<OsString>) -> Result<i32, Error> {
    let config = Config::load()?;
    cli::forward::run(&config, args).await
}
