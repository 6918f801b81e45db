//! Configuration management for the MCP server.
//!
//! This module provides a centralized configuration structure that can be
//! populated from environment variables (optionally via a `.env` file) or
//! defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};

/// Default Repomix capture limit: 50 MiB.
pub const DEFAULT_MAX_OUTPUT_MB: usize = 50;

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// How the Repomix executable is launched and bounded.
    pub repomix: RepomixConfig,

    /// Security and path validation configuration.
    pub security: SecurityConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Repomix invocation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepomixConfig {
    /// Executable to spawn.
    pub program: String,

    /// Arguments placed before any generated flag (e.g. `repomix` for `npx`).
    pub args: Vec<String>,

    /// Maximum number of stdout bytes captured before the run is aborted.
    pub max_output_bytes: usize,

    /// Optional wall-clock limit for a single run. `None` waits indefinitely.
    pub timeout_secs: Option<u64>,
}

/// Configuration for security and path validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    /// Optional root directory. When set, working directories and output
    /// files must resolve inside it.
    pub root_path: Option<PathBuf>,

    /// Whether symlinks may be followed during path validation.
    pub allow_symlinks: bool,
}

impl Default for RepomixConfig {
    fn default() -> Self {
        Self {
            program: "npx".to_string(),
            args: vec!["repomix".to_string()],
            max_output_bytes: DEFAULT_MAX_OUTPUT_MB * 1024 * 1024,
            timeout_secs: None,
        }
    }
}

impl RepomixConfig {
    /// Parse a whitespace-separated command such as `npx repomix`.
    pub fn with_command(mut self, command: &str) -> Result<Self> {
        let mut parts = command.split_whitespace().map(str::to_string);
        let program = parts
            .next()
            .ok_or_else(|| Error::config("MCP_REPOMIX_COMMAND must not be empty"))?;
        self.program = program;
        self.args = parts.collect();
        Ok(self)
    }

    /// The configured timeout, if any.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            root_path: None,
            allow_symlinks: true,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "codebase-mcp".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            repomix: RepomixConfig::default(),
            security: SecurityConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are expected to be prefixed with `MCP_`.
    /// For example: `MCP_SERVER_NAME`, `MCP_LOG_LEVEL`, `MCP_REPOMIX_COMMAND`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env()?;

        if let Ok(command) = std::env::var("MCP_REPOMIX_COMMAND") {
            config.repomix = config.repomix.with_command(&command)?;
        }

        if let Some(mb) = parse_var::<usize>("MCP_REPOMIX_MAX_OUTPUT_MB")? {
            if mb == 0 {
                return Err(Error::config("MCP_REPOMIX_MAX_OUTPUT_MB must be at least 1"));
            }
            config.repomix.max_output_bytes = mb.checked_mul(1024 * 1024).ok_or_else(|| {
                Error::config(format!("MCP_REPOMIX_MAX_OUTPUT_MB is too large: {}", mb))
            })?;
        }

        config.repomix.timeout_secs = parse_var::<u64>("MCP_REPOMIX_TIMEOUT_SECS")?;

        if let Ok(root_path) = std::env::var("MCP_ROOT_PATH") {
            config.security.root_path = Some(PathBuf::from(root_path));
            info!("Path security enabled: root directory set to {:?}", config.security.root_path);
        } else {
            warn!(
                "MCP_ROOT_PATH not set - no path restrictions active. \
                 Any local directory may be packed."
            );
        }

        if let Ok(allow_symlinks) = std::env::var("MCP_ALLOW_SYMLINKS") {
            config.security.allow_symlinks = allow_symlinks.parse().unwrap_or(true);
            info!("Symlinks allowed: {}", config.security.allow_symlinks);
        }

        Ok(config)
    }
}

/// Read and parse an optional environment variable.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) if raw.trim().is_empty() => Ok(None),
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("{} has an invalid value: '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}

/// Serializes tests that mutate process environment variables.
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repomix_defaults() {
        let config = Config::default();
        assert_eq!(config.repomix.program, "npx");
        assert_eq!(config.repomix.args, vec!["repomix"]);
        assert_eq!(config.repomix.max_output_bytes, 50 * 1024 * 1024);
        assert_eq!(config.repomix.timeout(), None);
    }

    #[test]
    fn test_with_command_splits_program() {
        let repomix = RepomixConfig::default()
            .with_command("  /usr/local/bin/repomix  ")
            .unwrap();
        assert_eq!(repomix.program, "/usr/local/bin/repomix");
        assert!(repomix.args.is_empty());

        let repomix = RepomixConfig::default().with_command("pnpm dlx repomix").unwrap();
        assert_eq!(repomix.program, "pnpm");
        assert_eq!(repomix.args, vec!["dlx", "repomix"]);
    }

    #[test]
    fn test_with_command_rejects_empty() {
        assert!(RepomixConfig::default().with_command("   ").is_err());
    }

    #[test]
    fn test_repomix_from_env() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_REPOMIX_COMMAND", "repomix");
            std::env::set_var("MCP_REPOMIX_MAX_OUTPUT_MB", "2");
            std::env::set_var("MCP_REPOMIX_TIMEOUT_SECS", "30");
        }
        let config = Config::from_env().unwrap();
        assert_eq!(config.repomix.program, "repomix");
        assert_eq!(config.repomix.max_output_bytes, 2 * 1024 * 1024);
        assert_eq!(config.repomix.timeout(), Some(Duration::from_secs(30)));
        unsafe {
            std::env::remove_var("MCP_REPOMIX_COMMAND");
            std::env::remove_var("MCP_REPOMIX_MAX_OUTPUT_MB");
            std::env::remove_var("MCP_REPOMIX_TIMEOUT_SECS");
        }
    }

    #[test]
    fn test_invalid_timeout_is_config_error() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_REPOMIX_TIMEOUT_SECS", "soon");
        }
        let result = Config::from_env();
        unsafe {
            std::env::remove_var("MCP_REPOMIX_TIMEOUT_SECS");
        }
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_zero_output_limit_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_REPOMIX_MAX_OUTPUT_MB", "0");
        }
        let result = Config::from_env();
        unsafe {
            std::env::remove_var("MCP_REPOMIX_MAX_OUTPUT_MB");
        }
        assert!(result.is_err());
    }

    #[test]
    fn test_huge_output_limit_rejected() {
        let _lock = ENV_TEST_LOCK.lock().unwrap();
        unsafe {
            std::env::set_var("MCP_REPOMIX_MAX_OUTPUT_MB", usize::MAX.to_string());
        }
        let result = Config::from_env();
        unsafe {
            std::env::remove_var("MCP_REPOMIX_MAX_OUTPUT_MB");
        }
        assert!(matches!(result, Err(Error::Config(message)) if message.contains("too large")));
    }
}
