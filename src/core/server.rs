//! MCP Server implementation and lifecycle management.
//!
//! The server only exposes tools. Tools are defined in
//! `domains/tools/definitions/` and collected into a router in
//! `domains/tools/router.rs`; the HTTP transport dispatches through
//! `ToolRegistry` instead.

use rmcp::{ServerHandler, handler::server::tool::ToolRouter, model::*, tool_handler};
use std::sync::Arc;

use super::config::Config;
use crate::domains::tools::{ToolRegistry, build_tool_router};

const INSTRUCTIONS: &str = "Packs codebases into a single AI-friendly document with Repomix. \
Use getCodebase for a local directory, getRemoteCodebase for a GitHub repository \
(URL or owner/name) and saveCodebase to write the packed output to a file.";

/// The main MCP server handler.
#[derive(Clone)]
pub struct McpServer {
    /// Server configuration.
    config: Arc<Config>,

    /// Tool router for handling tool calls.
    tool_router: ToolRouter<Self>,
}

impl McpServer {
    /// Create a new MCP server with the given configuration.
    pub fn new(config: Config) -> Self {
        let config = Arc::new(config);

        Self {
            tool_router: build_tool_router::<Self>(config.clone()),
            config,
        }
    }

    /// Get the server name.
    pub fn name(&self) -> &str {
        &self.config.server.name
    }

    /// Get the server version.
    pub fn version(&self) -> &str {
        &self.config.server.version
    }

    /// Get the server configuration.
    pub fn config(&self) -> &Arc<Config> {
        &self.config
    }

    /// Usage instructions advertised during initialization.
    pub fn instructions(&self) -> &'static str {
        INSTRUCTIONS
    }

    // ========================================================================
    // HTTP Transport Support Methods
    // ========================================================================

    /// List all available tools in registration order (for HTTP transport).
    pub fn list_tools(&self) -> Vec<serde_json::Value> {
        ToolRegistry::get_all_tools()
            .into_iter()
            .map(|t| {
                serde_json::json!({
                    "name": t.name,
                    "description": t.description,
                    "inputSchema": t.input_schema
                })
            })
            .collect()
    }

    /// Call a tool by name (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, String> {
        let registry = ToolRegistry::new(self.config.clone());
        registry
            .call_tool(name, arguments)
            .await
            .map_err(|e| e.to_string())
    }
}

#[tool_handler]
impl ServerHandler for McpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(INSTRUCTIONS.to_string()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: self.config.server.name.clone(),
                version: self.config.server.version.clone(),
                ..Implementation::from_build_env()
            },
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_identity() {
        let server = McpServer::new(Config::default());
        assert_eq!(server.name(), "codebase-mcp");
        assert_eq!(server.version(), env!("CARGO_PKG_VERSION"));
        assert!(server.instructions().contains("saveCodebase"));
    }

    #[test]
    fn test_list_tools_shape() {
        let server = McpServer::new(Config::default());
        let tools = server.list_tools();
        let names: Vec<_> = tools.iter().map(|t| t["name"].as_str().unwrap()).collect();
        assert_eq!(names, vec!["getCodebase", "getRemoteCodebase", "saveCodebase"]);
        for tool in &tools {
            assert!(tool["inputSchema"].is_object());
        }
    }

    #[test]
    fn test_get_info_only_advertises_tools() {
        let server = McpServer::new(Config::default());
        let info = server.get_info();
        assert!(info.capabilities.tools.is_some());
        assert!(info.capabilities.resources.is_none());
        assert!(info.capabilities.prompts.is_none());
        assert_eq!(info.server_info.name, "codebase-mcp");
    }
}
