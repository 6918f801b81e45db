//! Helpers shared by the codebase tools.

use rmcp::model::{CallToolResult, Content};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::config::Config;
use crate::core::security::{PathSecurityError, validate_output_path, validate_path};

/// Default file name for `saveCodebase`.
pub const DEFAULT_OUTPUT_FILE: &str = "repomix-output.txt";

pub fn default_output_file() -> String {
    DEFAULT_OUTPUT_FILE.to_string()
}

/// Create an error result with a formatted message.
pub fn error_result(message: &str) -> CallToolResult {
    warn!("{}", message);
    CallToolResult::error(vec![Content::text(message.to_string())])
}

/// Resolve the directory Repomix runs in.
///
/// Falls back to the server's current directory. The result is canonical,
/// confined to the configured root (if any) and guaranteed to be a directory.
pub fn resolve_working_dir(requested: Option<&str>, config: &Config) -> Result<PathBuf, String> {
    let dir = match requested.filter(|d| !d.trim().is_empty()) {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()
            .map_err(|e| format!("Cannot determine current directory: {}", e))?,
    };

    let path = validate_path(&dir, config).map_err(|e| match e {
        PathSecurityError::PathNotFound { path } => {
            format!("Working directory does not exist: {}", path.display())
        }
        other => format!("Path security validation failed: {}", other),
    })?;

    if !path.is_dir() {
        return Err(format!("Working directory is not a directory: {}", dir.display()));
    }

    Ok(path)
}

/// Check that a save destination is acceptable under the security policy.
pub fn check_output_path(path: &Path, config: &Config) -> Result<(), String> {
    validate_output_path(path, config)
        .map(|_| ())
        .map_err(|e| format!("Path security validation failed: {}", e))
}

/// Render a tool result the way the HTTP transport returns it.
#[cfg(feature = "http")]
pub fn to_http_value(result: &CallToolResult) -> serde_json::Value {
    serde_json::json!({
        "content": result.content,
        "isError": result.is_error.unwrap_or(false)
    })
}
