//! Command composition.
//!
//! Turns packing options and an invocation mode into a [`CommandSpec`]: the
//! program, an ordered list of discrete argument tokens, and the working
//! directory. Nothing here touches the filesystem or spawns processes, so the
//! same inputs always yield the same command.

use std::path::{Path, PathBuf};

use super::options::PackOptions;
use crate::core::config::RepomixConfig;

/// Destination argument used when Repomix writes to standard output.
pub const STDOUT_DESTINATION: &str = "stdout";

/// How Repomix is invoked for a single tool call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvocationMode {
    /// Pack a local directory and capture the result from stdout.
    Local { working_dir: PathBuf },

    /// Pack a remote repository and capture the result from stdout.
    Remote { repository: String },

    /// Pack a local directory into a file.
    Save {
        working_dir: PathBuf,
        output_file: String,
    },
}

/// Where Repomix writes its output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// A ready-to-run external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub working_dir: Option<PathBuf>,
    pub destination: Destination,
}

impl CommandSpec {
    /// Human-readable command line, for logging only.
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .map(quote_for_display)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Resolved output file for save mode.
    pub fn output_path(&self) -> Option<&Path> {
        match &self.destination {
            Destination::File(path) => Some(path),
            Destination::Stdout => None,
        }
    }
}

/// Resolve `output_file` against `working_dir` unless it is already absolute.
pub fn resolve_output_path(working_dir: &Path, output_file: &str) -> PathBuf {
    let output = Path::new(output_file);
    if output.is_absolute() {
        output.to_path_buf()
    } else {
        working_dir.join(output)
    }
}

/// Build the Repomix command for `mode` with the given options.
pub fn compose(config: &RepomixConfig, mode: &InvocationMode, options: &PackOptions) -> CommandSpec {
    let mut args: Vec<String> = config.args.clone();

    let (working_dir, destination) = match mode {
        InvocationMode::Local { working_dir } => (Some(working_dir.clone()), Destination::Stdout),
        InvocationMode::Remote { repository } => {
            args.push("--remote".to_string());
            args.push(repository.clone());
            (None, Destination::Stdout)
        }
        InvocationMode::Save {
            working_dir,
            output_file,
        } => (
            Some(working_dir.clone()),
            Destination::File(resolve_output_path(working_dir, output_file)),
        ),
    };

    args.push("--output".to_string());
    args.push(match &destination {
        Destination::Stdout => STDOUT_DESTINATION.to_string(),
        Destination::File(path) => path.to_string_lossy().into_owned(),
    });

    if let Some(format) = options.output_format {
        args.push("--style".to_string());
        args.push(format.as_str().to_string());
    }

    args.extend(
        options
            .toggles()
            .iter()
            .filter_map(|toggle| toggle.flag())
            .map(str::to_string),
    );

    if let Some(patterns) = options.include() {
        args.push("--include".to_string());
        args.push(patterns.to_string());
    }

    if let Some(patterns) = options.exclude() {
        args.push("--ignore".to_string());
        args.push(patterns.to_string());
    }

    CommandSpec {
        program: config.program.clone(),
        args,
        working_dir,
        destination,
    }
}

fn quote_for_display(token: &str) -> String {
    if !token.is_empty() && !token.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        token.to_string()
    } else {
        format!("{:?}", token)
    }
}
