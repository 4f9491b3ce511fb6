//! mcp-cli launcher library.
//!
//! Locates a Python interpreter, installs the `mcp-cli` tool through a
//! package manager, and forwards invocations to it as a child process.

pub mod cli;
pub mod config;
pub mod delegate;
pub mod error;
pub mod installer;
pub mod launcher;
pub mod logging;
pub mod resolver;

#[cfg(test)]
pub(crate) mod testing;

pub use error::Error;
