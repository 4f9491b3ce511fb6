//! Command handlers for the `mcp-cli` and `mcp-cli-install` binaries.

pub mod forward;
pub mod install;
