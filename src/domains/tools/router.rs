//! Tool Router - builds the rmcp ToolRouter for STDIO/TCP transport.
//!
//! Each tool definition creates its own route; this module only collects them.

use std::sync::Arc;

use rmcp::handler::server::tool::ToolRouter;

use crate::core::config::Config;

use super::definitions::{GetCodebaseTool, GetRemoteCodebaseTool, SaveCodebaseTool};

/// Build the tool router with all registered tools.
pub fn build_tool_router<S>(config: Arc<Config>) -> ToolRouter<S>
where
    S: Send + Sync + 'static,
{
    ToolRouter::new()
        .with_route(GetCodebaseTool::create_route(config.clone()))
        .with_route(GetRemoteCodebaseTool::create_route(config.clone()))
        .with_route(SaveCodebaseTool::create_route(config))
}

#[cfg(test)]
mod tests {
    use super::super::registry::ToolRegistry;
    use super::*;

    struct TestServer {}

    fn test_config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    #[test]
    fn test_build_router() {
        let router: ToolRouter<TestServer> = build_tool_router(test_config());
        let tools = router.list_all();
        assert_eq!(tools.len(), 3);

        let names: Vec<_> = tools.iter().map(|t| t.name.as_ref()).collect();
        assert!(names.contains(&"getCodebase"));
        assert!(names.contains(&"getRemoteCodebase"));
        assert!(names.contains(&"saveCodebase"));
    }

    #[test]
    fn test_registry_matches_router() {
        let config = test_config();
        let registry = ToolRegistry::new(config.clone());
        let registry_names = registry.tool_names();

        let router: ToolRouter<TestServer> = build_tool_router(config);
        let router_tools = router.list_all();
        let router_names: Vec<_> = router_tools.iter().map(|t| t.name.as_ref()).collect();

        assert_eq!(registry_names.len(), router_names.len());
        for name in registry_names {
            assert!(router_names.contains(&name));
        }
    }

    #[test]
    fn test_remote_tool_requires_repository() {
        let router: ToolRouter<TestServer> = build_tool_router(test_config());
        let tool = router
            .list_all()
            .into_iter()
            .find(|t| t.name == "getRemoteCodebase")
            .unwrap();

        let required = tool.input_schema.get("required").unwrap().as_array().unwrap();
        assert!(required.contains(&serde_json::json!("remoteRepository")));
    }
}
