//! Transport layer for the MCP server.
//!
//! - **STDIO**: Standard input/output (default for MCP) - feature: `stdio`
//! - **TCP**: Raw TCP socket with JSON-RPC messages - feature: `tcp`
//! - **HTTP**: HTTP server with JSON-RPC over POST requests - feature: `http`

mod config;
mod error;
mod service;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "tcp")]
pub mod tcp;

#[cfg(feature = "stdio")]
pub mod stdio;

pub use config::TransportConfig;
pub use error::{TransportError, TransportResult};
pub use service::TransportService;

#[cfg(feature = "tcp")]
pub use config::TcpConfig;

#[cfg(feature = "http")]
pub use config::HttpConfig;
