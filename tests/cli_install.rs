//! The `mcp-cli-install` binary against fake package managers on a private
//! `PATH`.
//!
//! One test: writing an executable while another thread forks can fail the
//! exec with ETXTBSY.

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use std::process::{Command, Output};

fn write_executable(path: &Path, body: &str) {
    fs::write(path, body).unwrap();
    fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
}

fn mcp_cli_install(bin: &Path, home: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mcp-cli-install"))
        .args(args)
        .env_clear()
        .env("PATH", bin)
        .env("HOME", home)
        .output()
        .unwrap()
}

#[test]
fn test_install_and_check() {
    let bin = tempfile::tempdir().unwrap();
    let home = tempfile::tempdir().unwrap();

    // Nothing on PATH: both strategies fail and Python comes first
    let output = mcp_cli_install(bin.path(), home.path(), &[]);
    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Installing mcp-cli Python package..."));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Installation failed:"));
    assert!(stderr.contains("uv: not found (tried: uv)"));
    assert!(stderr.contains("pip: not found (tried: python3, python, py)"));
    assert!(stderr.contains("Please install manually:"));
    assert!(stderr.contains("Install Python 3.11+ (https://www.python.org/downloads/)"));

    let output = mcp_cli_install(bin.path(), home.path(), &["--check"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stdout).contains("mcp-cli is not installed"));

    write_executable(&bin.path().join("uv"), "#!/bin/sh\nexit 0\n");
    let output = mcp_cli_install(bin.path(), home.path(), &[]);
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout)
        .contains("mcp-cli installed successfully with uv!"));

    // Logs each run so the check can be shown to start the tool once
    let log = home.path().join("runs");
    write_executable(
        &bin.path().join("python3"),
        &format!(
            "#!/bin/sh\necho \"$@\" >> '{}'\necho 'mcp-cli 0.3.1'\n",
            log.display()
        ),
    );
    let output = mcp_cli_install(bin.path(), home.path(), &["--check"]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "mcp-cli is installed (mcp-cli 0.3.1)\n"
    );
    assert_eq!(fs::read_to_string(&log).unwrap(), "-m mcp_cli --version\n");
}
