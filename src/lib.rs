//! Codebase MCP Server Library
//!
//! An MCP server that turns a codebase into a single AI-friendly document by
//! running [Repomix](https://github.com/yamadashy/repomix).
//!
//! # Architecture
//!
//! - **core**: configuration, error handling, path security, the MCP server
//!   handler and the transports (stdio, tcp, http)
//! - **domains**: business logic
//!   - **repomix**: command composition, process execution and result
//!     normalization
//!   - **tools**: the `getCodebase`, `getRemoteCodebase` and `saveCodebase`
//!     tool definitions
//! - **cli**: the `codebase-mcp` command-line interface
//!
//! # Example
//!
//! ```rust,no_run
//! use codebase_mcp_server::core::{Config, McpServer, TransportService};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let server = McpServer::new(config.clone());
//!     TransportService::new(config.transport).run(server).await?;
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod core;
pub mod domains;

pub use core::{Config, Error, McpServer, Result};
