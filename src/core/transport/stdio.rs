//! STDIO transport implementation.
//!
//! JSON-RPC over stdin/stdout. Logs go to stderr so they never interleave
//! with protocol messages.

use rmcp::ServiceExt;
use tracing::info;

use super::{TransportError, TransportResult};
use crate::core::McpServer;

/// STDIO transport handler.
pub struct StdioTransport;

impl StdioTransport {
    /// Serve a single client on stdin/stdout until it disconnects.
    pub async fn run(server: McpServer) -> TransportResult<()> {
        info!("{} ready on stdin/stdout", server.name());

        let service = server
            .serve(rmcp::transport::stdio())
            .await
            .map_err(|e| TransportError::init(e.to_string()))?;

        service
            .waiting()
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        info!("Client closed stdin, stopping");
        Ok(())
    }
}
