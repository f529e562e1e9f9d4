// sumomask/src/mcp/server.rs
//! The stdio server loop and tool dispatch.
//!
//! One JSON-RPC message per line on stdin, one response per line on
//! stdout. Notifications (messages without an id) are consumed without a
//! reply. All diagnostics go to stderr; stdout carries protocol frames
//! only.

use anyhow::{Context, Result};
use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use sumomask_core::MaskingEngine;

use crate::mcp::protocol::{
    CallToolParams, CallToolResult, InitializeResult, JsonRpcRequest, JsonRpcResponse,
    ListToolsResult, ServerCapabilities, ServerInfo, ToolDefinition, ToolsCapability,
    INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, PARSE_ERROR, PROTOCOL_VERSION,
};
use crate::search::{self, SearchRequest};
use crate::sumologic::SumoClient;

const SEARCH_TOOL_NAME: &str = "search_sumologic";

pub struct McpServer {
    client: SumoClient,
    engine: Box<dyn MaskingEngine>,
}

#[derive(Debug, Deserialize)]
struct SearchArguments {
    query: String,
    #[serde(default)]
    from: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default, rename = "timeZone")]
    time_zone: Option<String>,
}

impl McpServer {
    pub fn new(client: SumoClient, engine: Box<dyn MaskingEngine>) -> Self {
        Self { client, engine }
    }

    /// Serves requests from stdin until it closes.
    pub async fn run(&self) -> Result<()> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut lines = BufReader::new(stdin).lines();

        info!("MCP server listening on stdio");
        while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let Some(response) = self.handle_line(line).await else {
                continue;
            };
            let mut frame =
                serde_json::to_string(&response).context("Failed to encode response")?;
            frame.push('\n');
            stdout
                .write_all(frame.as_bytes())
                .await
                .context("Failed to write to stdout")?;
            stdout.flush().await.context("Failed to flush stdout")?;
        }
        info!("stdin closed, shutting down");
        Ok(())
    }

    /// Parses and dispatches one frame. Returns `None` for notifications.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(request) => request,
            Err(e) => {
                warn!("Discarding unparseable frame: {e}");
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    PARSE_ERROR,
                    format!("Parse error: {e}"),
                ));
            }
        };
        let Some(id) = request.id.clone() else {
            debug!("Ignoring notification {}", request.method);
            return None;
        };
        Some(self.handle_request(id, &request).await)
    }

    async fn handle_request(&self, id: Value, request: &JsonRpcRequest) -> JsonRpcResponse {
        debug!("Handling {} request", request.method);
        match request.method.as_str() {
            "initialize" => JsonRpcResponse::success(
                id,
                json!(InitializeResult {
                    protocol_version: PROTOCOL_VERSION,
                    capabilities: ServerCapabilities {
                        tools: ToolsCapability { list_changed: false },
                    },
                    server_info: ServerInfo {
                        name: env!("CARGO_PKG_NAME"),
                        version: env!("CARGO_PKG_VERSION"),
                    },
                }),
            ),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(
                id,
                json!(ListToolsResult {
                    tools: vec![search_tool_definition()],
                }),
            ),
            "tools/call" => self.handle_tool_call(id, request.params.clone()).await,
            other => JsonRpcResponse::error(
                id,
                METHOD_NOT_FOUND,
                format!("Method not found: {other}"),
            ),
        }
    }

    async fn handle_tool_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match serde_json::from_value(params.unwrap_or(Value::Null)) {
            Ok(params) => params,
            Err(e) => {
                return JsonRpcResponse::error(id, INVALID_PARAMS, format!("Invalid params: {e}"))
            }
        };
        if params.name != SEARCH_TOOL_NAME {
            return JsonRpcResponse::error(
                id,
                INVALID_PARAMS,
                format!("Unknown tool: {}", params.name),
            );
        }
        let result = match self.run_search_tool(params.arguments).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool call failed: {e:#}");
                CallToolResult::error(format!("Error: {e}"))
            }
        };
        match serde_json::to_value(&result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => {
                JsonRpcResponse::error(id, INTERNAL_ERROR, format!("Internal error: {e}"))
            }
        }
    }

    async fn run_search_tool(&self, arguments: Option<Value>) -> Result<CallToolResult> {
        let arguments: SearchArguments =
            serde_json::from_value(arguments.unwrap_or(Value::Null))
                .context("Invalid search arguments")?;
        // Search Job API queries are single-line; embedded newlines from
        // client-side formatting are stripped rather than rejected.
        let request = SearchRequest {
            query: arguments.query.replace('\n', ""),
            from: arguments.from,
            to: arguments.to,
            time_zone: arguments.time_zone,
        };
        info!("Running search tool");
        let result = search::search(&self.client, self.engine.as_ref(), request).await;
        let body = serde_json::to_string_pretty(&result)
            .context("Failed to encode search result")?;
        Ok(CallToolResult::text(body))
    }
}

fn search_tool_definition() -> ToolDefinition {
    ToolDefinition {
        name: SEARCH_TOOL_NAME,
        description: "Runs a Sumo Logic search query over a time range and returns the matching \
                      log messages with personal data masked.",
        input_schema: json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "Sumo Logic query, e.g. _sourceCategory=prod/api | count by _sourceHost"
                },
                "from": {
                    "type": "string",
                    "description": "Start of the time range, ISO 8601. Defaults to 24 hours ago."
                },
                "to": {
                    "type": "string",
                    "description": "End of the time range, ISO 8601. Defaults to now."
                },
                "timeZone": {
                    "type": "string",
                    "description": "IANA timezone for the time range. Defaults to SUMO_TIME_ZONE or UTC."
                }
            },
            "required": ["query"]
        }),
    }
}
