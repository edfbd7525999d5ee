//! MCP server with stdio transport
//!
//! One JSON-RPC message per line in both directions. Notifications are
//! processed but never answered.

use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tracing::{debug, error, info};

use super::protocol::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION};
use crate::{error::Result, tools::ToolHandler};

pub struct McpServer {
    tool_handler: ToolHandler,
}

impl McpServer {
    pub fn new(tool_handler: ToolHandler) -> Self {
        Self { tool_handler }
    }

    /// Serves stdin/stdout until stdin is closed.
    pub async fn run(&self) -> Result<()> {
        let stdin = BufReader::new(tokio::io::stdin());
        let stdout = tokio::io::stdout();
        self.serve(stdin, stdout).await
    }

    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        info!(
            "MCP server started for {} collection, listening on stdin",
            self.tool_handler.collection()
        );
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            debug!("Received: {line}");

            let Some(response) = self.process_line(line).await else {
                continue;
            };
            let response_json = match serde_json::to_string(&response) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize response: {e}");
                    continue;
                }
            };
            debug!("Sending: {response_json}");

            writer.write_all(response_json.as_bytes()).await?;
            writer.write_all(b"\n").await?;
            writer.flush().await?;
        }

        info!("Input closed, MCP server shutting down");
        Ok(())
    }

    /// Handles one message, `None` means nothing is sent back.
    pub async fn process_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_str(line) {
            Ok(value) => value,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    None,
                    JsonRpcError::parse_error(format!("Invalid JSON: {e}")),
                ))
            }
        };
        // Only a message without an `id` member is a notification, `"id": null` is answered.
        let is_notification = value.as_object().is_some_and(|m| !m.contains_key("id"));
        let id = value.get("id").cloned().filter(|id| !id.is_null());
        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    JsonRpcError::invalid_request(format!("Invalid request: {e}")),
                ))
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.id,
                JsonRpcError::invalid_request("jsonrpc must be '2.0'"),
            ));
        }

        if is_notification {
            debug!("Notification {}", request.method);
            return None;
        }

        let JsonRpcRequest { method, params, id, .. } = request;
        let response = match method.as_str() {
            "initialize" => self.handle_initialize(id),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_tools_list(id),
            "tools/call" => self.handle_tools_call(id, &params).await,
            _ => JsonRpcResponse::error(id, JsonRpcError::method_not_found(&method)),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<Value>) -> JsonRpcResponse {
        debug!("Handling initialize");

        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "serverInfo": {
                    "name": format!("shelf-{}", self.tool_handler.collection()),
                    "version": env!("CARGO_PKG_VERSION")
                },
                "capabilities": {
                    "tools": {}
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<Value>) -> JsonRpcResponse {
        let tools = self.tool_handler.list_tools();
        JsonRpcResponse::success(id, json!({ "tools": tools }))
    }

    async fn handle_tools_call(&self, id: Option<Value>, params: &Value) -> JsonRpcResponse {
        let Some(params) = params.as_object() else {
            return JsonRpcResponse::error(
                id,
                JsonRpcError::invalid_params("params must be an object"),
            );
        };
        let Some(tool_name) = params.get("name").and_then(|v| v.as_str()) else {
            return JsonRpcResponse::error(id, JsonRpcError::invalid_params("missing 'name' field"));
        };
        let arguments = params
            .get("arguments")
            .cloned()
            .unwrap_or_else(|| json!({}));

        let output = self.tool_handler.call(tool_name, &arguments).await;
        JsonRpcResponse::success(
            id,
            json!({
                "content": [{"type": "text", "text": output.text}],
                "isError": output.is_error
            }),
        )
    }
}
