//! Tool-specific error types.

use thiserror::Error;

/// Errors raised before a tool gets to run.
///
/// Failures of the tool itself are reported inside the tool result, not here.
#[derive(Debug, Error)]
pub enum ToolError {
    /// The requested tool was not found.
    #[error("Tool not found: {0}")]
    NotFound(String),

    /// Invalid arguments were provided to the tool.
    #[error("Invalid arguments: {0}")]
    InvalidArguments(String),
}

impl ToolError {
    /// Create a new "not found" error.
    pub fn not_found(name: impl Into<String>) -> Self {
        Self::NotFound(name.into())
    }

    /// Create a new "invalid arguments" error.
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Self::InvalidArguments(msg.into())
    }
}
