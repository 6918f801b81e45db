//! TCP transport implementation.
//!
//! Each accepted connection gets its own MCP session (line-delimited JSON-RPC).

use rmcp::ServiceExt;
use std::net::SocketAddr;
use tokio::net::{TcpListener, TcpStream};
use tracing::{info, warn};

use super::{TransportError, TransportResult, config::TcpConfig};
use crate::core::McpServer;

/// TCP transport handler.
pub struct TcpTransport {
    config: TcpConfig,
}

impl TcpTransport {
    /// Create a new TCP transport with the given config.
    pub fn new(config: TcpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Accept connections until the process is stopped.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();

        let listener = TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!("{} listening on {} (JSON-RPC over TCP)", server.name(), addr);

        loop {
            match listener.accept().await {
                Ok((stream, peer)) => {
                    if let Err(e) = stream.set_nodelay(true) {
                        warn!("Failed to set TCP_NODELAY for {}: {}", peer, e);
                    }
                    tokio::spawn(Self::serve_client(server.clone(), stream, peer));
                }
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(std::time::Duration::from_millis(100)).await;
                }
            }
        }
    }

    /// Run one MCP session over an accepted socket.
    async fn serve_client(server: McpServer, stream: TcpStream, peer: SocketAddr) {
        let service = match server.serve(stream).await {
            Ok(service) => service,
            Err(e) => {
                warn!("Handshake with {} failed: {}", peer, e);
                return;
            }
        };
        info!("Client {} connected", peer);

        match service.waiting().await {
            Ok(_) => info!("Client {} disconnected", peer),
            Err(e) => warn!("Session with {} ended with error: {}", peer, e),
        }
    }
}
