//! HTTP transport implementation.
//!
//! JSON-RPC over POST so plain HTTP clients (curl, browsers) can list and
//! call the codebase tools without an MCP SDK.

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, instrument, warn};

use super::{TransportError, TransportResult, config::HttpConfig};
use crate::core::McpServer;

/// MCP protocol revision announced by `initialize`.
const PROTOCOL_VERSION: &str = "2024-11-05";

/// HTTP transport handler.
pub struct HttpTransport {
    config: HttpConfig,
}

/// JSON-RPC request structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcRequest {
    pub jsonrpc: String,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    pub method: String,
    #[serde(default)]
    pub params: Option<serde_json::Value>,
}

/// JSON-RPC response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

/// JSON-RPC error structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcResponse {
    /// Create a success response.
    pub fn success(id: Option<serde_json::Value>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: Some(result),
            error: None,
        }
    }

    /// Create an error response.
    pub fn error(id: Option<serde_json::Value>, code: i32, message: impl Into<String>) -> Self {
        Self {
            jsonrpc: "2.0".to_string(),
            id,
            result: None,
            error: Some(JsonRpcError {
                code,
                message: message.into(),
                data: None,
            }),
        }
    }

    /// Method not found error.
    pub fn method_not_found(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32601, "Method not found")
    }

    /// Invalid request error.
    pub fn invalid_request(id: Option<serde_json::Value>) -> Self {
        Self::error(id, -32600, "Invalid Request")
    }

    /// Invalid params error.
    pub fn invalid_params(id: Option<serde_json::Value>, msg: impl Into<String>) -> Self {
        Self::error(id, -32602, msg)
    }
}

/// Application state shared across HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    server: McpServer,
    rpc_path: String,
}

impl AppState {
    fn new(server: McpServer, rpc_path: impl Into<String>) -> Self {
        Self {
            server,
            rpc_path: rpc_path.into(),
        }
    }
}

impl HttpTransport {
    /// Create a new HTTP transport with the given config.
    pub fn new(config: HttpConfig) -> Self {
        Self { config }
    }

    /// Get the bind address.
    pub fn address(&self) -> String {
        format!("{}:{}", self.config.host, self.config.port)
    }

    /// Build the axum router serving the JSON-RPC, health and info endpoints.
    pub fn router(&self, server: McpServer) -> Router {
        let state = AppState::new(server, self.config.rpc_path.clone());

        let app = Router::new()
            .route(&self.config.rpc_path, post(handle_rpc))
            .route("/health", get(health_check))
            .route("/", get(root_handler))
            .with_state(state);

        if self.config.enable_cors {
            let cors = CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any);
            app.layer(cors)
        } else {
            app
        }
    }

    /// Serve HTTP until the process is stopped.
    pub async fn run(self, server: McpServer) -> TransportResult<()> {
        let addr = self.address();
        let app = self.router(server);

        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| TransportError::bind(&addr, e))?;

        info!(
            "Listening on {} (JSON-RPC at POST {}, CORS {})",
            addr,
            self.config.rpc_path,
            if self.config.enable_cors { "on" } else { "off" }
        );

        axum::serve(listener, app)
            .await
            .map_err(|e| TransportError::ServiceError(e.to_string()))?;

        Ok(())
    }
}

/// Root handler - describes the server and its endpoints.
async fn root_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "name": state.server.name(),
        "version": state.server.version(),
        "transport": "HTTP",
        "endpoints": {
            "rpc": state.rpc_path,
            "health": "/health"
        },
        "tools": state
            .server
            .list_tools()
            .iter()
            .map(|t| t["name"].clone())
            .collect::<Vec<_>>(),
        "protocol": "JSON-RPC 2.0"
    }))
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

/// Handle JSON-RPC requests.
#[instrument(skip_all, fields(method))]
async fn handle_rpc(
    State(state): State<AppState>,
    Json(request): Json<JsonRpcRequest>,
) -> impl IntoResponse {
    tracing::Span::current().record("method", &request.method);
    info!("Received JSON-RPC request: {}", request.method);

    let response = process_request(&state, request).await;

    (StatusCode::OK, Json(response))
}

/// Process a JSON-RPC request and return the response.
async fn process_request(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    if request.jsonrpc != "2.0" {
        return JsonRpcResponse::invalid_request(request.id);
    }

    match request.method.as_str() {
        "initialize" => handle_initialize(state, request),
        "tools/list" => handle_tools_list(state, request),
        "tools/call" => handle_tools_call(state, request).await,
        method if method.starts_with("notifications/") => {
            info!("Received notification: {}", request.method);
            JsonRpcResponse::success(request.id, serde_json::json!(null))
        }
        _ => {
            warn!("Unknown method: {}", request.method);
            JsonRpcResponse::method_not_found(request.id)
        }
    }
}

/// Handle initialize request.
fn handle_initialize(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let result = serde_json::json!({
        "protocolVersion": PROTOCOL_VERSION,
        "capabilities": {
            "tools": {}
        },
        "serverInfo": {
            "name": state.server.name(),
            "version": state.server.version()
        },
        "instructions": state.server.instructions()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/list request.
fn handle_tools_list(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let result = serde_json::json!({
        "tools": state.server.list_tools()
    });

    JsonRpcResponse::success(request.id, result)
}

/// Handle tools/call request.
async fn handle_tools_call(state: &AppState, request: JsonRpcRequest) -> JsonRpcResponse {
    let Some(params) = request.params else {
        return JsonRpcResponse::invalid_params(request.id, "Missing params");
    };

    let Some(name) = params.get("name").and_then(|v| v.as_str()) else {
        return JsonRpcResponse::invalid_params(request.id, "Missing tool name");
    };

    let arguments = params
        .get("arguments")
        .cloned()
        .unwrap_or(serde_json::json!({}));

    info!("Calling tool {}", name);
    match state.server.call_tool(name, arguments).await {
        Ok(result) => JsonRpcResponse::success(request.id, result),
        Err(e) => JsonRpcResponse::invalid_params(request.id, e),
    }
}
