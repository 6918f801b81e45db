//! Tool Registry - central listing and HTTP dispatch for all tools.

use std::sync::Arc;
#[cfg(feature = "http")]
use tracing::warn;

use rmcp::model::Tool;

use crate::core::config::Config;
#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

use super::definitions::{GetCodebaseTool, GetRemoteCodebaseTool, SaveCodebaseTool};

// ============================================================================
// Tool Registry
// ============================================================================

/// Tool registry - manages all available tools.
///
/// The STDIO/TCP router and the HTTP transport both list tools from here.
pub struct ToolRegistry {
    #[cfg_attr(not(feature = "http"), allow(dead_code))]
    config: Arc<Config>,
}

impl ToolRegistry {
    /// Create a new tool registry.
    pub fn new(config: Arc<Config>) -> Self {
        Self { config }
    }

    /// Get all tool names.
    pub fn tool_names(&self) -> Vec<&'static str> {
        vec![
            GetCodebaseTool::NAME,
            GetRemoteCodebaseTool::NAME,
            SaveCodebaseTool::NAME,
        ]
    }

    /// Get all tools as Tool models (metadata).
    pub fn get_all_tools() -> Vec<Tool> {
        vec![
            GetCodebaseTool::to_tool(),
            GetRemoteCodebaseTool::to_tool(),
            SaveCodebaseTool::to_tool(),
        ]
    }

    /// Dispatch an HTTP tool call to the appropriate handler.
    #[cfg(feature = "http")]
    pub async fn call_tool(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<serde_json::Value, ToolError> {
        let config = self.config.clone();
        match name {
            GetCodebaseTool::NAME => GetCodebaseTool::http_handler(arguments, config).await,
            GetRemoteCodebaseTool::NAME => {
                GetRemoteCodebaseTool::http_handler(arguments, config).await
            }
            SaveCodebaseTool::NAME => SaveCodebaseTool::http_handler(arguments, config).await,
            _ => {
                warn!("Unknown tool requested: {}", name);
                Err(ToolError::not_found(name))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    #[test]
    fn test_registry_tool_names() {
        let registry = ToolRegistry::new(test_config());
        assert_eq!(
            registry.tool_names(),
            vec!["getCodebase", "getRemoteCodebase", "saveCodebase"]
        );
    }

    #[test]
    fn test_all_tools_have_object_schemas() {
        for tool in ToolRegistry::get_all_tools() {
            assert_eq!(
                tool.input_schema.get("type"),
                Some(&serde_json::json!("object")),
                "{}",
                tool.name
            );
            assert!(tool.description.is_some());
        }
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_unknown() {
        let registry = ToolRegistry::new(test_config());
        let result = registry.call_tool("unknown", serde_json::json!({})).await;
        assert!(matches!(result, Err(ToolError::NotFound(_))));
    }

    #[cfg(feature = "http")]
    #[tokio::test]
    async fn test_registry_call_missing_directory() {
        let registry = ToolRegistry::new(test_config());
        let result = registry
            .call_tool(
                "getCodebase",
                serde_json::json!({ "workingDirectory": "/nonexistent/codebase/12345" }),
            )
            .await
            .unwrap();
        assert_eq!(result["isError"], serde_json::json!(true));
        let text = result["content"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("Error retrieving codebase: "));
    }
}
