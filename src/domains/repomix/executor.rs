//! Execution and result normalization.
//!
//! The executor runs a [`CommandSpec`] through a [`CommandRunner`] and folds
//! every possible result (payload, saved file, or failure) into an
//! [`ExecutionOutcome`], which in turn renders into a single-text-block
//! `CallToolResult`. Nothing escapes as a panic or protocol error.

use rmcp::model::{CallToolResult, Content};
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument, warn};

use super::command::{CommandSpec, Destination};
use super::error::RepomixError;
use super::runner::{CapturedOutput, CommandRunner, ProcessRunner};
use crate::core::config::RepomixConfig;

const BYTES_PER_MIB: f64 = 1024.0 * 1024.0;

/// Normalized result of one Repomix run.
#[derive(Debug)]
pub enum ExecutionOutcome {
    /// Output captured from stdout.
    Success { text: String },

    /// Output written to a file that was verified to exist.
    Saved { path: PathBuf, size_bytes: u64 },

    /// Anything that went wrong.
    Failure(RepomixError),
}

impl ExecutionOutcome {
    /// Render the outcome as a tool result.
    ///
    /// `context` prefixes failure messages (e.g. "Error retrieving codebase").
    /// A missing artifact is reported on its own terms, without the prefix.
    pub fn into_call_result(self, context: &str) -> CallToolResult {
        match self {
            Self::Success { text } => CallToolResult::success(vec![Content::text(text)]),
            Self::Saved { path, size_bytes } => CallToolResult::success(vec![Content::text(
                format!(
                    "Codebase saved successfully to {} ({} MB)",
                    path.display(),
                    format_mib(size_bytes)
                ),
            )]),
            Self::Failure(err) if err.is_artifact_missing() => {
                CallToolResult::error(vec![Content::text(err.to_string())])
            }
            Self::Failure(err) => {
                CallToolResult::error(vec![Content::text(format!("{}: {}", context, err))])
            }
        }
    }
}

/// Size in mebibytes with two decimals.
pub fn format_mib(bytes: u64) -> String {
    format!("{:.2}", bytes as f64 / BYTES_PER_MIB)
}

/// Runs Repomix commands and normalizes their results.
pub struct RepomixExecutor<R = ProcessRunner> {
    runner: R,
}

impl RepomixExecutor<ProcessRunner> {
    /// Executor backed by real child processes.
    pub fn from_config(config: &RepomixConfig) -> Self {
        Self::new(ProcessRunner::from_config(config))
    }
}

impl<R: CommandRunner> RepomixExecutor<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Run `spec` and normalize the result.
    #[instrument(skip_all, fields(program = %spec.program))]
    pub async fn execute(&self, spec: &CommandSpec) -> ExecutionOutcome {
        info!("Running command: {}", spec.command_line());

        match self.runner.run(spec).await {
            Ok(captured) => normalize(spec, captured).await,
            Err(e) => {
                error!("Error running Repomix: {}", e);
                ExecutionOutcome::Failure(e)
            }
        }
    }
}

/// Map a finished process onto an [`ExecutionOutcome`].
async fn normalize(spec: &CommandSpec, captured: CapturedOutput) -> ExecutionOutcome {
    if !captured.success {
        warn!(
            "Repomix exited with {:?}: {}",
            captured.code,
            captured.stderr.trim()
        );
        return ExecutionOutcome::Failure(RepomixError::exited(captured.code, captured.stderr));
    }

    if !captured.stderr.trim().is_empty() {
        info!("Repomix diagnostics: {}", captured.stderr.trim());
    }

    match &spec.destination {
        Destination::Stdout => ExecutionOutcome::Success {
            text: String::from_utf8_lossy(&captured.stdout).into_owned(),
        },
        Destination::File(path) => verify_artifact(path).await,
    }
}

/// Confirm the output file exists after a successful run.
async fn verify_artifact(path: &Path) -> ExecutionOutcome {
    match tokio::fs::metadata(path).await {
        Ok(metadata) if metadata.is_file() => {
            info!("Codebase saved to {} ({} bytes)", path.display(), metadata.len());
            ExecutionOutcome::Saved {
                path: path.to_path_buf(),
                size_bytes: metadata.len(),
            }
        }
        Ok(_) => {
            warn!("Output path exists but is not a file: {}", path.display());
            ExecutionOutcome::Failure(RepomixError::ArtifactMissing { path: path.to_path_buf() })
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            warn!("Repomix exited cleanly but {} was not created", path.display());
            ExecutionOutcome::Failure(RepomixError::ArtifactMissing { path: path.to_path_buf() })
        }
        Err(e) => ExecutionOutcome::Failure(RepomixError::Io(e)),
    }
}
