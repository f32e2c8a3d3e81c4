//! MCP Server
//!
//! Transport-agnostic protocol handling. Each instance is independent:
//! the event-stream transport creates one per open session so client state
//! never bleeds between unrelated connections, while the stateless HTTP
//! transport shares a single instance across request cycles.

use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::protocol::{JsonRpcError, McpRequest, McpResponse};
use crate::{PROTOCOL_VERSION, SERVER_NAME, SERVER_VERSION};
use railway_tools::ToolRegistry;

#[derive(Debug, Clone)]
struct ClientInfo {
    name: String,
    version: Option<String>,
}

/// One protocol-server instance bound to the shared tool registry
pub struct McpServer {
    registry: Arc<ToolRegistry>,
    client_info: RwLock<Option<ClientInfo>>,
}

impl McpServer {
    /// Build a fresh instance. Callable repeatedly; every registered tool
    /// becomes a callable operation on the new instance.
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            client_info: RwLock::new(None),
        }
    }

    /// Handle one protocol request. Returns `None` for notifications,
    /// which expect no response frame.
    pub async fn handle_request(&self, request: McpRequest) -> Option<McpResponse> {
        debug!(method = %request.method, "Handling MCP request");

        if request.is_notification() {
            return None;
        }

        let response = match request.method.as_str() {
            "initialize" => self.handle_initialize(request).await,
            "ping" => McpResponse::success(request.id, json!({})),
            "tools/list" => self.handle_tools_list(request),
            "tools/call" => self.handle_tools_call(request).await,
            _ => McpResponse::error(request.id, JsonRpcError::method_not_found(&request.method)),
        };
        Some(response)
    }

    async fn handle_initialize(&self, request: McpRequest) -> McpResponse {
        let client = request.params.as_ref().and_then(|p| p.get("clientInfo"));
        let client_name = client
            .and_then(|ci| ci.get("name"))
            .and_then(|n| n.as_str())
            .unwrap_or("unknown");
        let client_version = client
            .and_then(|ci| ci.get("version"))
            .and_then(|v| v.as_str());

        *self.client_info.write().await = Some(ClientInfo {
            name: client_name.to_string(),
            version: client_version.map(String::from),
        });

        info!(
            client = %client_name,
            version = %client_version.unwrap_or("?"),
            "Client connected"
        );

        McpResponse::success(
            request.id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false },
                    "logging": {}
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "title": "Railway MCP Server",
                    "version": SERVER_VERSION
                }
            }),
        )
    }

    fn handle_tools_list(&self, request: McpRequest) -> McpResponse {
        let tools: Vec<Value> = self
            .registry
            .list()
            .iter()
            .map(|t| {
                json!({
                    "name": t.name(),
                    "title": t.title(),
                    "description": t.description(),
                    "inputSchema": t.input_schema()
                })
            })
            .collect();

        McpResponse::success(request.id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, request: McpRequest) -> McpResponse {
        let params = match &request.params {
            Some(p) => p,
            None => {
                return McpResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing params"),
                )
            }
        };

        let tool_name = match params.get("name").and_then(|n| n.as_str()) {
            Some(n) => n,
            None => {
                return McpResponse::error(
                    request.id,
                    JsonRpcError::invalid_params("Missing tool name"),
                )
            }
        };

        let tool = match self.registry.get(tool_name) {
            Some(tool) => tool,
            None => {
                warn!(tool = %tool_name, "Unknown tool requested");
                return McpResponse::error(
                    request.id,
                    JsonRpcError::invalid_params(format!("Unknown tool: {tool_name}")),
                );
            }
        };

        let arguments = params.get("arguments").cloned().unwrap_or(json!({}));
        info!(tool = %tool_name, "Executing tool");

        // Tool failures (subprocess errors included) become protocol-level
        // error results, never a transport failure.
        match tool.execute(arguments).await {
            Ok(text) => McpResponse::success(
                request.id,
                json!({
                    "content": [{ "type": "text", "text": text }],
                    "isError": false
                }),
            ),
            Err(e) => McpResponse::success(
                request.id,
                json!({
                    "content": [{ "type": "text", "text": format!("Error: {e}") }],
                    "isError": true
                }),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use railway_tools::Tool;

    struct UpperTool;

    #[async_trait]
    impl Tool for UpperTool {
        fn name(&self) -> &str {
            "upper"
        }
        fn title(&self) -> &str {
            "Uppercase"
        }
        fn description(&self) -> &str {
            "Uppercase the text argument"
        }
        fn input_schema(&self) -> Value {
            json!({
                "type": "object",
                "properties": { "text": { "type": "string" } },
                "required": ["text"]
            })
        }
        async fn execute(&self, input: Value) -> anyhow::Result<String> {
            let text = input
                .get("text")
                .and_then(|v| v.as_str())
                .ok_or_else(|| anyhow::anyhow!("Missing required parameter: text"))?;
            Ok(text.to_uppercase())
        }
    }

    fn server() -> McpServer {
        McpServer::new(Arc::new(ToolRegistry::from_tools(vec![Arc::new(UpperTool)])))
    }

    #[tokio::test]
    async fn initialize_reports_server_info() {
        let request = McpRequest::new("initialize").with_id(json!(1)).with_params(json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {},
            "clientInfo": { "name": "test-client", "version": "1.0.0" }
        }));

        let response = server().handle_request(request).await.unwrap();
        assert!(response.is_success());

        let result = response.result.unwrap();
        assert_eq!(result["protocolVersion"], PROTOCOL_VERSION);
        assert_eq!(result["serverInfo"]["name"], SERVER_NAME);
    }

    #[tokio::test]
    async fn tools_list_includes_descriptor_fields() {
        let request = McpRequest::new("tools/list").with_id(json!(2));
        let response = server().handle_request(request).await.unwrap();

        let result = response.result.unwrap();
        let tools = result["tools"].as_array().unwrap();
        assert_eq!(tools.len(), 1);
        assert_eq!(tools[0]["name"], "upper");
        assert_eq!(tools[0]["title"], "Uppercase");
        assert!(tools[0]["inputSchema"].is_object());
    }

    #[tokio::test]
    async fn tools_call_wraps_text_content() {
        let request = McpRequest::new("tools/call").with_id(json!(3)).with_params(json!({
            "name": "upper",
            "arguments": { "text": "hello" }
        }));

        let response = server().handle_request(request).await.unwrap();
        let result = response.result.unwrap();
        assert_eq!(result["isError"], false);
        assert_eq!(result["content"][0]["text"], "HELLO");
    }

    #[tokio::test]
    async fn tool_failure_is_an_error_result_not_a_transport_error() {
        let request = McpRequest::new("tools/call").with_id(json!(4)).with_params(json!({
            "name": "upper",
            "arguments": {}
        }));

        let response = server().handle_request(request).await.unwrap();
        assert!(response.is_success());
        let result = response.result.unwrap();
        assert_eq!(result["isError"], true);
        assert!(result["content"][0]["text"]
            .as_str()
            .unwrap()
            .contains("text"));
    }

    #[tokio::test]
    async fn unknown_tool_is_invalid_params() {
        let request = McpRequest::new("tools/call").with_id(json!(5)).with_params(json!({
            "name": "missing"
        }));

        let response = server().handle_request(request).await.unwrap();
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[tokio::test]
    async fn unknown_method_is_method_not_found() {
        let request = McpRequest::new("resources/list").with_id(json!(6));
        let response = server().handle_request(request).await.unwrap();
        assert_eq!(response.error.unwrap().code, -32601);
    }

    #[tokio::test]
    async fn notifications_produce_no_frame() {
        let request = McpRequest::new("notifications/initialized");
        assert!(server().handle_request(request).await.is_none());
    }

    #[tokio::test]
    async fn instances_are_independent() {
        let registry = Arc::new(ToolRegistry::from_tools(vec![Arc::new(UpperTool) as _]));
        let a = McpServer::new(registry.clone());
        let b = McpServer::new(registry);

        let init = McpRequest::new("initialize").with_id(json!(1)).with_params(json!({
            "clientInfo": { "name": "client-a" }
        }));
        a.handle_request(init).await.unwrap();

        assert!(a.client_info.read().await.is_some());
        assert!(b.client_info.read().await.is_none());
    }
}
