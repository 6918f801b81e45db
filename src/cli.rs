//! Command-line interface: `start`, `install` and `version`.

use clap::{Parser, Subcommand};
use tracing::{info, warn};

use crate::core::config::RepomixConfig;
use crate::domains::repomix::{CommandRunner, CommandSpec, Destination, ProcessRunner};

/// Largest `--version` answer we bother reading.
const VERSION_OUTPUT_LIMIT: usize = 4096;

#[derive(Parser, Debug)]
#[command(name = "codebase-mcp")]
#[command(about = "MCP server that packs codebases with Repomix", long_about = None)]
#[command(version)]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Commands {
    /// Start the MCP server
    Start,
    /// Install Repomix globally (npm install -g repomix)
    Install,
    /// Show version information
    Version,
}

impl Cli {
    /// Parse `args`, matching the subcommand case-insensitively (`START` runs `start`).
    pub fn parse_lenient<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString>,
    {
        Self::parse_from(normalize_command(args))
    }

    /// Fallible variant of [`Cli::parse_lenient`].
    pub fn try_parse_lenient<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString>,
    {
        Self::try_parse_from(normalize_command(args))
    }
}

/// Lowercase the first argument after the binary name unless it is a flag.
fn normalize_command<I, T>(args: I) -> Vec<std::ffi::OsString>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString>,
{
    args.into_iter()
        .map(Into::into)
        .enumerate()
        .map(|(index, arg)| {
            let command = arg.to_str().filter(|c| index == 1 && !c.starts_with('-'));
            match command {
                Some(command) => command.to_lowercase().into(),
                None => arg,
            }
        })
        .collect()
}

/// Install Repomix globally with npm, streaming npm's output to the terminal.
pub async fn install_repomix() -> anyhow::Result<()> {
    println!("Installing Repomix globally...");

    let status = tokio::process::Command::new("npm")
        .args(["install", "-g", "repomix"])
        .status()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to install Repomix: could not run npm: {}", e))?;

    if !status.success() {
        anyhow::bail!("Failed to install Repomix: npm exited with {}", status);
    }

    println!("Repomix installed successfully!");
    Ok(())
}

/// Print this server's version and the Repomix version, if Repomix can run.
pub async fn print_versions(config: &RepomixConfig) {
    println!("codebase-mcp version: {}", env!("CARGO_PKG_VERSION"));

    let runner = ProcessRunner::new(VERSION_OUTPUT_LIMIT, config.timeout());
    match repomix_version(&runner, config).await {
        Some(version) => println!("Repomix version: {}", version),
        None => println!("Repomix is not installed or not available in PATH"),
    }
}

/// Ask Repomix for its version. `None` when it cannot be launched or fails.
pub async fn repomix_version<R: CommandRunner>(
    runner: &R,
    config: &RepomixConfig,
) -> Option<String> {
    let mut args = config.args.clone();
    args.push("--version".to_string());
    let spec = CommandSpec {
        program: config.program.clone(),
        args,
        working_dir: None,
        destination: Destination::Stdout,
    };

    info!("Running command: {}", spec.command_line());
    match runner.run(&spec).await {
        Ok(output) if output.success => {
            let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
            (!version.is_empty()).then_some(version)
        }
        Ok(output) => {
            warn!("Repomix --version exited with {:?}", output.code);
            None
        }
        Err(e) => {
            warn!("Repomix --version failed: {}", e);
            None
        }
    }
}
