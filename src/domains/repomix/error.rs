//! Repomix execution error types.

use std::path::PathBuf;
use thiserror::Error;

/// Failures that can occur while running Repomix and collecting its output.
///
/// Every variant renders into a human-readable message that is returned to
/// the client inside the tool result; none of them is fatal to the server.
#[derive(Debug, Error)]
pub enum RepomixError {
    /// The executable could not be launched (not installed, not in PATH, ...).
    #[error("failed to launch '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The process ran but exited unsuccessfully.
    #[error("Command failed ({}){}", exit_label(.code), stderr_suffix(.stderr))]
    Exited { code: Option<i32>, stderr: String },

    /// Standard output grew beyond the configured capture limit.
    #[error("output too large: Repomix produced more than {limit} bytes on stdout")]
    OutputTooLarge { limit: usize },

    /// The process exited successfully but the expected file does not exist.
    #[error("Failed to save codebase to {}. File was not created.", .path.display())]
    ArtifactMissing { path: PathBuf },

    /// The process did not finish within the configured time limit.
    #[error("Repomix did not finish within {seconds} seconds and was terminated")]
    Timeout { seconds: u64 },

    /// I/O failure while talking to the child process or inspecting the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RepomixError {
    /// Create an exit error from a status code and captured stderr.
    pub fn exited(code: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::Exited {
            code,
            stderr: stderr.into(),
        }
    }

    /// Whether this failure means the artifact was missing after a clean run.
    pub fn is_artifact_missing(&self) -> bool {
        matches!(self, Self::ArtifactMissing { .. })
    }
}

fn exit_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let stderr = stderr.trim();
    if stderr.is_empty() {
        String::new()
    } else {
        format!(": {}", stderr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exited_includes_stderr() {
        let err = RepomixError::exited(Some(2), "boom\n");
        assert_eq!(err.to_string(), "Command failed (exit code 2): boom");
    }

    #[test]
    fn test_exited_without_stderr_or_code() {
        let err = RepomixError::exited(None, "   ");
        assert_eq!(err.to_string(), "Command failed (terminated by signal)");
    }

    #[test]
    fn test_artifact_missing_message() {
        let err = RepomixError::ArtifactMissing {
            path: PathBuf::from("/proj/out.txt"),
        };
        assert!(err.is_artifact_missing());
        assert_eq!(
            err.to_string(),
            "Failed to save codebase to /proj/out.txt. File was not created."
        );
    }

    #[test]
    fn test_spawn_error_names_program() {
        let err = RepomixError::Spawn {
            program: "npx".to_string(),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "No such file or directory"),
        };
        let message = err.to_string();
        assert!(message.contains("'npx'"));
        assert!(message.contains("No such file or directory"));
    }
}
