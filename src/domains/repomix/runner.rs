//! Child process execution.
//!
//! [`CommandRunner`] is the seam between the executor and the operating
//! system. [`ProcessRunner`] spawns the program directly (no shell), captures
//! stdout up to a hard limit and keeps a bounded tail of stderr for
//! diagnostics.

use async_trait::async_trait;
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, ChildStdout, Command};
use tokio::time;
use tracing::{debug, warn};

use super::command::CommandSpec;
use super::error::RepomixError;
use crate::core::config::RepomixConfig;

/// Stderr is diagnostic only; keep at most this much of it.
const MAX_STDERR_BYTES: usize = 64 * 1024;

const READ_CHUNK: usize = 8192;

/// Raw result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Whether the process exited with status zero.
    pub success: bool,

    /// Exit code, if the process was not terminated by a signal.
    pub code: Option<i32>,

    /// Captured standard output.
    pub stdout: Vec<u8>,

    /// Captured standard error (possibly truncated).
    pub stderr: String,
}

/// Runs a [`CommandSpec`] to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Execute the command and collect its output.
    ///
    /// A non-zero exit is not an error at this level; it is reported through
    /// [`CapturedOutput::success`]. Errors cover launch failures, capture
    /// overflow, timeouts and I/O problems.
    async fn run(&self, spec: &CommandSpec) -> Result<CapturedOutput, RepomixError>;
}

/// Runs commands as real child processes with `tokio::process`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    max_output_bytes: usize,
    timeout: Option<Duration>,
}

impl ProcessRunner {
    pub fn new(max_output_bytes: usize, timeout: Option<Duration>) -> Self {
        Self {
            max_output_bytes,
            timeout,
        }
    }

    pub fn from_config(config: &RepomixConfig) -> Self {
        Self::new(config.max_output_bytes, config.timeout())
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, spec: &CommandSpec) -> Result<CapturedOutput, RepomixError> {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if let Some(dir) = &spec.working_dir {
            command.current_dir(dir);
        }

        // Own process group, so launchers like `npx` can be stopped together
        // with the Repomix process they start.
        #[cfg(unix)]
        command.process_group(0);

        let mut child = command.spawn().map_err(|source| RepomixError::Spawn {
            program: spec.program.clone(),
            source,
        })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("failed to capture stderr"))?;

        let stderr_task = tokio::spawn(read_lossy(stderr, MAX_STDERR_BYTES));

        let collected = match self.timeout {
            Some(limit) => {
                let attempt =
                    time::timeout(limit, collect(&mut child, stdout, self.max_output_bytes)).await;
                match attempt {
                    Ok(result) => result,
                    Err(_) => {
                        warn!("Repomix exceeded {:?}, killing process", limit);
                        terminate(&mut child).await;
                        return Err(RepomixError::Timeout {
                            seconds: limit.as_secs(),
                        });
                    }
                }
            }
            None => collect(&mut child, stdout, self.max_output_bytes).await,
        };

        let (stdout, status) = collected?;
        let stderr = stderr_task.await.unwrap_or_default();

        debug!(
            "Process finished with {:?}, {} bytes on stdout, {} bytes on stderr",
            status.code(),
            stdout.len(),
            stderr.len()
        );

        Ok(CapturedOutput {
            success: status.success(),
            code: status.code(),
            stdout,
            stderr,
        })
    }
}

/// Read stdout to the end and wait for the process.
///
/// When stdout exceeds `max_bytes` the child is killed and
/// [`RepomixError::OutputTooLarge`] is returned instead of a truncated payload.
async fn collect(
    child: &mut Child,
    stdout: ChildStdout,
    max_bytes: usize,
) -> Result<(Vec<u8>, std::process::ExitStatus), RepomixError> {
    let Some(bytes) = read_bounded(stdout, max_bytes).await? else {
        warn!("Repomix output exceeded {} bytes, killing process", max_bytes);
        terminate(child).await;
        return Err(RepomixError::OutputTooLarge { limit: max_bytes });
    };

    let status = child.wait().await?;
    Ok((bytes, status))
}

/// Kill the child's whole process group, then the child itself.
async fn terminate(child: &mut Child) {
    #[cfg(unix)]
    if let Some(pid) = child.id().and_then(|pid| libc::pid_t::try_from(pid).ok()) {
        // The child leads its group (`process_group(0)`), so its pid is the pgid.
        let rc = unsafe { libc::killpg(pid, libc::SIGKILL) };
        if rc != 0 {
            debug!(
                "killpg({}) failed: {}",
                pid,
                std::io::Error::last_os_error()
            );
        }
    }

    if let Err(e) = child.kill().await {
        warn!("Failed to kill process: {}", e);
    }
}

/// Read everything from `reader`, or `None` once more than `max_bytes` arrive.
async fn read_bounded<R: AsyncRead + Unpin>(
    mut reader: R,
    max_bytes: usize,
) -> std::io::Result<Option<Vec<u8>>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = reader.read(&mut chunk).await?;
        if n == 0 {
            return Ok(Some(buf));
        }
        if buf.len() + n > max_bytes {
            return Ok(None);
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Drain `reader`, keeping at most `max_bytes`, and decode it lossily.
async fn read_lossy<R: AsyncRead + Unpin + Send + 'static>(mut reader: R, max_bytes: usize) -> String {
    let mut buf = Vec::new();
    let mut chunk = [0u8; READ_CHUNK];

    loop {
        let n = match reader.read(&mut chunk).await {
            Ok(0) | Err(_) => break,
            Ok(n) => n,
        };
        let take = max_bytes.saturating_sub(buf.len()).min(n);
        buf.extend_from_slice(&chunk[..take]);
    }

    String::from_utf8_lossy(&buf).into_owned()
}
