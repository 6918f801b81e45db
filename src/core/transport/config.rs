//! Transport configuration types.

use serde::{Deserialize, Serialize};

use crate::core::error::{Error, Result};

/// Transport configuration options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TransportConfig {
    /// Standard input/output transport (default for MCP).
    #[cfg(feature = "stdio")]
    Stdio,

    /// TCP socket transport with line-delimited JSON-RPC.
    #[cfg(feature = "tcp")]
    Tcp(TcpConfig),

    /// HTTP transport with JSON-RPC over POST.
    #[cfg(feature = "http")]
    Http(HttpConfig),
}

/// TCP transport configuration.
#[cfg(feature = "tcp")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TcpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,
}

/// HTTP transport configuration.
#[cfg(feature = "http")]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Port number to listen on.
    pub port: u16,

    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: String,

    /// Path for JSON-RPC endpoint.
    #[serde(default = "default_rpc_path")]
    pub rpc_path: String,

    /// Enable CORS for browser clients.
    #[serde(default = "default_cors")]
    pub enable_cors: bool,
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn default_host() -> String {
    "127.0.0.1".to_string()
}

#[cfg(feature = "http")]
fn default_rpc_path() -> String {
    "/mcp".to_string()
}

#[cfg(feature = "http")]
fn default_cors() -> bool {
    true
}

impl Default for TransportConfig {
    fn default() -> Self {
        #[cfg(feature = "stdio")]
        {
            Self::Stdio
        }

        #[cfg(all(not(feature = "stdio"), feature = "tcp"))]
        {
            Self::Tcp(TcpConfig::default())
        }

        #[cfg(all(not(feature = "stdio"), not(feature = "tcp"), feature = "http"))]
        {
            Self::Http(HttpConfig::default())
        }

        #[cfg(not(any(feature = "stdio", feature = "tcp", feature = "http")))]
        {
            compile_error!("At least one transport feature must be enabled: stdio, tcp, or http");
        }
    }
}

#[cfg(feature = "tcp")]
impl Default for TcpConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: default_host(),
        }
    }
}

#[cfg(feature = "http")]
impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            port: 8080,
            host: default_host(),
            rpc_path: default_rpc_path(),
            enable_cors: default_cors(),
        }
    }
}

impl TransportConfig {
    /// Load transport config from environment variables.
    ///
    /// An unset or empty `MCP_TRANSPORT` selects the default transport. A
    /// transport that is unknown or not compiled in is a configuration error.
    pub fn from_env() -> Result<Self> {
        let transport = std::env::var("MCP_TRANSPORT")
            .unwrap_or_default()
            .trim()
            .to_lowercase();

        match transport.as_str() {
            "" => Ok(Self::default()),
            #[cfg(feature = "stdio")]
            "stdio" => Ok(Self::Stdio),
            #[cfg(feature = "tcp")]
            "tcp" => Ok(Self::Tcp(TcpConfig {
                port: port_var("MCP_TCP_PORT")?.unwrap_or(3000),
                host: std::env::var("MCP_TCP_HOST").unwrap_or_else(|_| default_host()),
            })),
            #[cfg(feature = "http")]
            "http" => Ok(Self::Http(HttpConfig {
                port: port_var("MCP_HTTP_PORT")?.unwrap_or(8080),
                host: std::env::var("MCP_HTTP_HOST").unwrap_or_else(|_| default_host()),
                rpc_path: std::env::var("MCP_HTTP_PATH").unwrap_or_else(|_| default_rpc_path()),
                enable_cors: std::env::var("MCP_HTTP_CORS")
                    .map(|v| v.to_lowercase() != "false" && v != "0")
                    .unwrap_or(true),
            })),
            other => Err(Error::config(format!(
                "MCP_TRANSPORT '{}' is unknown or not enabled in this build",
                other
            ))),
        }
    }

    /// Get a description of this transport for logging.
    pub fn description(&self) -> String {
        match self {
            #[cfg(feature = "stdio")]
            Self::Stdio => "STDIO (standard MCP mode)".to_string(),
            #[cfg(feature = "tcp")]
            Self::Tcp(cfg) => format!("TCP on {}:{}", cfg.host, cfg.port),
            #[cfg(feature = "http")]
            Self::Http(cfg) => format!("HTTP on {}:{}{}", cfg.host, cfg.port, cfg.rpc_path),
        }
    }
}

#[cfg(any(feature = "tcp", feature = "http"))]
fn port_var(name: &str) -> Result<Option<u16>> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("{} is not a valid port: '{}'", name, raw))),
        Err(_) => Ok(None),
    }
}
