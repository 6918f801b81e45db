//! Local codebase retrieval tool.
//!
//! Packs a local directory with Repomix and returns the result as text.

use futures::FutureExt;
use rmcp::{
    ErrorData as McpError,
    handler::server::tool::{ToolCallContext, ToolRoute, cached_schema_for_type},
    model::{CallToolResult, Tool},
};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, instrument};

#[cfg(feature = "http")]
use crate::domains::tools::ToolError;

use super::common::{error_result, resolve_working_dir};
use crate::core::config::Config;
use crate::domains::repomix::{
    CommandRunner, InvocationMode, PackOptions, RepomixExecutor, compose,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the local codebase tool.
#[derive(Debug, Clone, Default, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetCodebaseParams {
    /// Directory to pack.
    #[serde(default, alias = "cwd")]
    #[schemars(description = "Working directory of the codebase (defaults to the server's current directory)")]
    pub working_directory: Option<String>,

    #[serde(flatten)]
    pub options: PackOptions,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Retrieve a local codebase as a single text document.
pub struct GetCodebaseTool;

impl GetCodebaseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getCodebase";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Retrieve the entire codebase as a single text output using RepoMix";

    const ERROR_CONTEXT: &'static str = "Error retrieving codebase";

    /// Execute the tool logic with real Repomix processes.
    pub async fn execute(params: &GetCodebaseParams, config: &Config) -> CallToolResult {
        let executor = RepomixExecutor::from_config(&config.repomix);
        Self::execute_with(params, config, &executor).await
    }

    /// Execute the tool logic with the given executor.
    #[instrument(skip_all, fields(working_directory = ?params.working_directory))]
    pub async fn execute_with<R: CommandRunner>(
        params: &GetCodebaseParams,
        config: &Config,
        executor: &RepomixExecutor<R>,
    ) -> CallToolResult {
        info!("getCodebase called");

        let working_dir =
            match resolve_working_dir(params.working_directory.as_deref(), config) {
                Ok(dir) => dir,
                Err(message) => {
                    return error_result(&format!("{}: {}", Self::ERROR_CONTEXT, message));
                }
            };

        let spec = compose(
            &config.repomix,
            &InvocationMode::Local { working_dir },
            &params.options,
        );

        executor
            .execute(&spec)
            .await
            .into_call_result(Self::ERROR_CONTEXT)
    }

    /// HTTP handler for this tool (for HTTP transport).
    #[cfg(feature = "http")]
    pub async fn http_handler(
        arguments: serde_json::Value,
        config: Arc<Config>,
    ) -> Result<serde_json::Value, ToolError> {
        let params: GetCodebaseParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let result = Self::execute(&params, &config).await;
        Ok(super::common::to_http_value(&result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetCodebaseParams>(),
            annotations: None,
            output_schema: None,
            icons: None,
            meta: None,
            title: None,
        }
    }

    /// Create a ToolRoute for STDIO/TCP transport.
    pub fn create_route<S>(config: Arc<Config>) -> ToolRoute<S>
    where
        S: Send + Sync + 'static,
    {
        ToolRoute::new_dyn(Self::to_tool(), move |ctx: ToolCallContext<'_, S>| {
            let args = ctx.arguments.clone().unwrap_or_default();
            let config = config.clone();
            async move {
                let params: GetCodebaseParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::repomix::runner::testing::StubRunner;
    use crate::domains::repomix::{Destination, OutputFormat};
    use rmcp::model::RawContent;
    use tempfile::TempDir;

    fn text_of(result: &CallToolResult) -> &str {
        match &result.content[0].raw {
            RawContent::Text(text) => &text.text,
            _ => panic!("Expected text content"),
        }
    }

    #[test]
    fn test_params_from_json() {
        let params: GetCodebaseParams = serde_json::from_value(serde_json::json!({
            "workingDirectory": "/proj",
            "outputFormat": "markdown",
            "removeComments": true,
            "showLineNumbers": false,
            "excludePatterns": "*.lock"
        }))
        .unwrap();

        assert_eq!(params.working_directory.as_deref(), Some("/proj"));
        assert_eq!(params.options.output_format, Some(OutputFormat::Markdown));
        assert_eq!(params.options.remove_comments, Some(true));
        assert_eq!(params.options.show_line_numbers, Some(false));
        assert_eq!(params.options.include_file_summary, None);
        assert_eq!(params.options.exclude_patterns.as_deref(), Some("*.lock"));
    }

    #[test]
    fn test_params_accept_cwd_alias() {
        let params: GetCodebaseParams =
            serde_json::from_value(serde_json::json!({ "cwd": "/proj" })).unwrap();
        assert_eq!(params.working_directory.as_deref(), Some("/proj"));
    }

    #[test]
    fn test_params_reject_bad_types() {
        let result: Result<GetCodebaseParams, _> =
            serde_json::from_value(serde_json::json!({ "removeComments": "yes" }));
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_returns_dump_from_working_directory() {
        let dir = TempDir::new().unwrap();
        let params = GetCodebaseParams {
            working_directory: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let executor = RepomixExecutor::new(StubRunner::exit_ok("<dump>"));

        let result = GetCodebaseTool::execute_with(&params, &Config::default(), &executor).await;
        assert!(!result.is_error.unwrap_or(false));
        assert_eq!(text_of(&result), "<dump>");

        let spec = executor.runner().last_spec().unwrap();
        assert_eq!(spec.working_dir, Some(dir.path().canonicalize().unwrap()));
        assert_eq!(spec.destination, Destination::Stdout);
        assert!(!spec.args.iter().any(|a| a == "--remote"));
    }

    #[tokio::test]
    async fn test_failure_is_prefixed() {
        let dir = TempDir::new().unwrap();
        let params = GetCodebaseParams {
            working_directory: Some(dir.path().to_string_lossy().into_owned()),
            ..Default::default()
        };
        let executor = RepomixExecutor::new(StubRunner::exit_with(1, "boom"));

        let result = GetCodebaseTool::execute_with(&params, &Config::default(), &executor).await;
        assert!(result.is_error.unwrap_or(false));
        let text = text_of(&result);
        assert!(text.starts_with("Error retrieving codebase: "));
        assert!(text.contains("boom"));
    }

    #[tokio::test]
    async fn test_missing_directory_never_spawns() {
        let params = GetCodebaseParams {
            working_directory: Some("/nonexistent/codebase/12345".to_string()),
            ..Default::default()
        };
        let executor = RepomixExecutor::new(StubRunner::exit_ok("<dump>"));

        let result = GetCodebaseTool::execute_with(&params, &Config::default(), &executor).await;
        assert!(result.is_error.unwrap_or(false));
        assert_eq!(executor.runner().calls(), 0);
    }

    #[test]
    fn test_to_tool_metadata() {
        let tool = GetCodebaseTool::to_tool();
        assert_eq!(tool.name, "getCodebase");
        let properties = tool.input_schema.get("properties").unwrap();
        assert!(properties.get("workingDirectory").is_some());
        assert!(properties.get("outputFormat").is_some());
        assert!(properties.get("excludePatterns").is_some());
    }

    #[cfg(feature = "http")]
    #[test]
    fn test_http_handler_rejects_bad_arguments() {
        let config = Arc::new(Config::default());
        let result = tokio_test::block_on(GetCodebaseTool::http_handler(
            serde_json::json!({ "outputFormat": "yaml" }),
            config,
        ));
        assert!(matches!(result, Err(ToolError::InvalidArguments(_))));
    }
}
