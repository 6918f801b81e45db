//! Remote repository retrieval tool.
//!
//! Lets Repomix clone and pack a remote repository (URL or `owner/name`
//! shorthand) and returns the result as text.

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

use super::common::error_result;
use crate::core::config::Config;
use crate::domains::repomix::{
    CommandRunner, InvocationMode, PackOptions, RepomixExecutor, compose,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the remote codebase tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct GetRemoteCodebaseParams {
    /// Repository locator.
    #[serde(alias = "repo")]
    #[schemars(description = "GitHub repository URL or shorthand format (e.g., 'username/repo')")]
    pub remote_repository: String,

    #[serde(flatten)]
    pub options: PackOptions,
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Retrieve a remote repository as a single text document.
pub struct GetRemoteCodebaseTool;

impl GetRemoteCodebaseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "getRemoteCodebase";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str =
        "Retrieve a remote repository's codebase as a single text output using RepoMix";

    const ERROR_CONTEXT: &'static str = "Error retrieving remote codebase";

    /// Execute the tool logic with real Repomix processes.
    pub async fn execute(params: &GetRemoteCodebaseParams, config: &Config) -> CallToolResult {
        let executor = RepomixExecutor::from_config(&config.repomix);
        Self::execute_with(params, config, &executor).await
    }

    /// Execute the tool logic with the given executor.
    #[instrument(skip_all, fields(repository = %params.remote_repository))]
    pub async fn execute_with<R: CommandRunner>(
        params: &GetRemoteCodebaseParams,
        config: &Config,
        executor: &RepomixExecutor<R>,
    ) -> CallToolResult {
        info!("getRemoteCodebase called");

        let repository = match validate_repository(&params.remote_repository) {
            Ok(repository) => repository,
            Err(message) => {
                return error_result(&format!("{}: {}", Self::ERROR_CONTEXT, message));
            }
        };

        let spec = compose(
            &config.repomix,
            &InvocationMode::Remote { repository },
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
        let params: GetRemoteCodebaseParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let result = Self::execute(&params, &config).await;
        Ok(super::common::to_http_value(&result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<GetRemoteCodebaseParams>(),
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
                let params: GetRemoteCodebaseParams =
                    serde_json::from_value(serde_json::Value::Object(args))
                        .map_err(|e| McpError::invalid_params(e.to_string(), None))?;
                Ok(Self::execute(&params, &config).await)
            }
            .boxed()
        })
    }
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Reject locators that are empty or could be parsed as a Repomix flag.
fn validate_repository(raw: &str) -> Result<String, String> {
    let repository = raw.trim();
    if repository.is_empty() {
        return Err("remoteRepository must not be empty".to_string());
    }
    if repository.starts_with('-') {
        return Err(format!("Invalid remoteRepository '{}'", repository));
    }
    Ok(repository.to_string())
}

// ============================================================================
// Tests
// ============================================================================
