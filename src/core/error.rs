//! Error types for server startup.
//!
//! Domain failures stay in their own types (`RepomixError`, `ToolError`,
//! `TransportError`, `PathSecurityError`); this one covers loading the
//! configuration.

use thiserror::Error;

/// A specialized Result type for MCP server operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while preparing the server.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration-related errors.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
