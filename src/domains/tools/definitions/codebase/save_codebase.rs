//! Codebase save tool.
//!
//! Packs a local directory with Repomix into a file and reports where it was
//! written and how large it is.

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

use super::common::{check_output_path, default_output_file, error_result, resolve_working_dir};
use crate::core::config::Config;
use crate::domains::repomix::{
    CommandRunner, InvocationMode, PackOptions, RepomixExecutor, compose, resolve_output_path,
};

// ============================================================================
// Tool Parameters
// ============================================================================

/// Parameters for the save codebase tool.
#[derive(Debug, Clone, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveCodebaseParams {
    /// Directory to pack.
    #[serde(default, alias = "cwd")]
    #[schemars(description = "Working directory of the codebase (defaults to the server's current directory)")]
    pub working_directory: Option<String>,

    /// Destination file, relative to the working directory unless absolute.
    #[serde(default = "default_output_file")]
    #[schemars(description = "Output file path (default: 'repomix-output.txt')")]
    pub output_file: String,

    #[serde(flatten)]
    pub options: PackOptions,
}

impl Default for SaveCodebaseParams {
    fn default() -> Self {
        Self {
            working_directory: None,
            output_file: default_output_file(),
            options: PackOptions::default(),
        }
    }
}

// ============================================================================
// Tool Definition
// ============================================================================

/// Save a local codebase to a file.
pub struct SaveCodebaseTool;

impl SaveCodebaseTool {
    /// Tool name as registered in MCP.
    pub const NAME: &'static str = "saveCodebase";

    /// Tool description shown to clients.
    pub const DESCRIPTION: &'static str = "Save the codebase to a file using RepoMix";

    const ERROR_CONTEXT: &'static str = "Error saving codebase";

    /// Execute the tool logic with real Repomix processes.
    pub async fn execute(params: &SaveCodebaseParams, config: &Config) -> CallToolResult {
        let executor = RepomixExecutor::from_config(&config.repomix);
        Self::execute_with(params, config, &executor).await
    }

    /// Execute the tool logic with the given executor.
    #[instrument(skip_all, fields(output_file = %params.output_file))]
    pub async fn execute_with<R: CommandRunner>(
        params: &SaveCodebaseParams,
        config: &Config,
        executor: &RepomixExecutor<R>,
    ) -> CallToolResult {
        info!("saveCodebase called");

        let output_file = params.output_file.trim();
        if output_file.is_empty() {
            return error_result(&format!(
                "{}: outputFile must not be empty",
                Self::ERROR_CONTEXT
            ));
        }

        let working_dir =
            match resolve_working_dir(params.working_directory.as_deref(), config) {
                Ok(dir) => dir,
                Err(message) => {
                    return error_result(&format!("{}: {}", Self::ERROR_CONTEXT, message));
                }
            };

        let output_path = resolve_output_path(&working_dir, output_file);
        if let Err(message) = check_output_path(&output_path, config) {
            return error_result(&format!("{}: {}", Self::ERROR_CONTEXT, message));
        }

        let mode = InvocationMode::Save {
            working_dir,
            output_file: output_file.to_string(),
        };
        let spec = compose(&config.repomix, &mode, &params.options);

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
        let params: SaveCodebaseParams = serde_json::from_value(arguments)
            .map_err(|e| ToolError::invalid_arguments(e.to_string()))?;

        let result = Self::execute(&params, &config).await;
        Ok(super::common::to_http_value(&result))
    }

    /// Create a Tool model for this tool (metadata).
    pub fn to_tool() -> Tool {
        Tool {
            name: Self::NAME.into(),
            description: Some(Self::DESCRIPTION.into()),
            input_schema: cached_schema_for_type::<SaveCodebaseParams>(),
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
                let params: SaveCodebaseParams =
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
