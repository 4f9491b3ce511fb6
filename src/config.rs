//! Configuration for the mcp-cli launcher.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::installer::InstallStrategy;

/// Launcher configuration.
///
/// Constructed once per process and shared immutably with the resolver,
/// launcher and installer.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub python: PythonConfig,

    #[serde(default)]
    pub install: InstallConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PythonConfig {
    /// Interpreter names, most preferred first.
    #[serde(default = "default_python_candidates")]
    pub candidates: Vec<String>,

    /// Module passed to `python -m`.
    #[serde(default = "default_module")]
    pub module: String,
}

impl Default for PythonConfig {
    fn default() -> Self {
        Self {
            candidates: default_python_candidates(),
            module: default_module(),
        }
    }
}

impl PythonConfig {
    /// Fixed arguments placed before the forwarded ones.
    pub fn module_prefix(&self) -> Vec<String> {
        vec!["-m".to_string(), self.module.clone()]
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InstallConfig {
    /// Package name substituted for `{package}`.
    #[serde(default = "default_package")]
    pub package: String,

    /// Install source substituted for `{source}`.
    #[serde(default = "default_source")]
    pub source: String,

    /// Strategies in priority order.
    #[serde(default = "default_strategies")]
    pub strategies: Vec<InstallStrategy>,
}

impl Default for InstallConfig {
    fn default() -> Self {
        Self {
            package: default_package(),
            source: default_source(),
            strategies: default_strategies(),
        }
    }
}

impl InstallConfig {
    /// Manual install instructions shown when every strategy fails.
    ///
    /// `interpreter_missing` adds a Python install step, since the manual
    /// command needs one.
    pub fn remediation(&self, interpreter_missing: bool) -> String {
        let command = format!("pip install {}", self.source);
        if interpreter_missing {
            format!("Install Python 3.11+ ({PYTHON_DOWNLOAD_URL}), then run: {command}")
        } else {
            command
        }
    }
}

/// Where to get an interpreter when none is on `PATH`.
pub const PYTHON_DOWNLOAD_URL: &str = "https://www.python.org/downloads/";

fn default_python_candidates() -> Vec<String> {
    vec!["python3".to_string(), "python".to_string(), "py".to_string()]
}

fn default_module() -> String {
    "mcp_cli".to_string()
}

fn default_package() -> String {
    "mcp-cli".to_string()
}

fn default_source() -> String {
    "git+https://github.com/rohitsoni007/mcp-kit".to_string()
}

fn default_strategies() -> Vec<InstallStrategy> {
    vec![
        InstallStrategy::new(
            "uv",
            ["uv"],
            ["tool", "install", "{package}", "--from", "{source}"],
        ),
        InstallStrategy::new(
            "pip",
            default_python_candidates(),
            ["-m", "pip", "install", "{source}"],
        ),
    ]
}

impl Config {
    /// Load config from ~/.mcp-cli/launcher.toml
    pub fn load() -> Result<Self, Error> {
        Self::load_from(&Self::path())
    }

    /// Load config from an explicit path, falling back to defaults when absent.
    pub fn load_from(path: &Path) -> Result<Self, Error> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Path to the launcher directory (~/.mcp-cli/)
    pub fn global_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".mcp-cli")
    }

    /// Path to config file
    pub fn path() -> PathBuf {
        Self::global_dir().join("launcher.toml")
    }
}
