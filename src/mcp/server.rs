use crate::app::App;
use crate::errors::{McpError, ToolError};
use crate::mcp::catalog::tool_catalog;
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use serde_json::Value;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

const PROTOCOL_VERSION: &str = "2025-06-18";
const SERVER_NAME: &str = "baklib-mcp";
const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
}

/// Success payload for the boundary: the pretty-printed call result as a
/// single text block.
pub fn format_response(result: &Value) -> Value {
    serde_json::json!({
        "content": [ { "type": "text", "text": pretty(result) } ]
    })
}

/// Failure payload: `{error, hint?, details?}` rendered the same way, with
/// the explicit error flag set. Tool-level failures are not JSON-RPC errors.
pub fn format_error(err: &ToolError) -> Value {
    let mut payload = serde_json::Map::new();
    payload.insert("error".to_string(), Value::String(err.message.clone()));
    if let Some(hint) = &err.hint {
        payload.insert("hint".to_string(), Value::String(hint.clone()));
    }
    if let Some(details) = &err.details {
        payload.insert("details".to_string(), details.clone());
    }
    serde_json::json!({
        "content": [ { "type": "text", "text": pretty(&Value::Object(payload)) } ],
        "isError": true
    })
}

pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new() -> Result<Self, ToolError> {
        let app = App::initialize()?;
        Ok(Self { app: Arc::new(app) })
    }

    fn handle_initialize(&self) -> Value {
        serde_json::json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"list": true, "call": true}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
        })
    }

    fn handle_tools_list(&self) -> Value {
        serde_json::json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, name: &str, raw_args: Value) -> Value {
        let args = if raw_args.is_object() {
            raw_args
        } else {
            serde_json::json!({})
        };
        match self.app.tool_executor.execute(name, args).await {
            Ok(result) => format_response(&result),
            Err(err) => format_error(&err),
        }
    }

    pub async fn run_stdio(&self) -> Result<(), ToolError> {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin).lines();
        let mut writer = BufWriter::new(stdout);

        while let Some(line) = reader
            .next_line()
            .await
            .map_err(|err| ToolError::internal(err.to_string()))?
        {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let parsed: Value = match serde_json::from_str(trimmed) {
                Ok(value) => value,
                Err(_) => {
                    write_response(
                        &mut writer,
                        &JsonRpcResponse::failure(Value::Null, McpError::parse_error()),
                    )
                    .await?;
                    continue;
                }
            };

            let request: JsonRpcRequest = match serde_json::from_value(parsed) {
                Ok(request) => request,
                Err(_) => {
                    write_response(
                        &mut writer,
                        &JsonRpcResponse::failure(Value::Null, McpError::invalid_request()),
                    )
                    .await?;
                    continue;
                }
            };

            let response = match request.method.as_str() {
                "notifications/initialized" => request
                    .id
                    .clone()
                    .map(|id| JsonRpcResponse::success(id, serde_json::json!({}))),
                _ if request.method.starts_with("notifications/") && request.is_notification() => {
                    None
                }
                "initialize" => request
                    .id
                    .clone()
                    .map(|id| JsonRpcResponse::success(id, self.handle_initialize())),
                "tools/list" => request
                    .id
                    .clone()
                    .map(|id| JsonRpcResponse::success(id, self.handle_tools_list())),
                "tools/call" => match request.id.clone() {
                    Some(id) => {
                        let params = request.params.as_object().cloned().unwrap_or_default();
                        let name = params.get("name").and_then(|v| v.as_str()).unwrap_or("");
                        if name.is_empty() {
                            Some(JsonRpcResponse::failure(
                                id,
                                McpError::invalid_params("Missing tool name"),
                            ))
                        } else {
                            let args = params
                                .get("arguments")
                                .cloned()
                                .unwrap_or(Value::Null);
                            Some(JsonRpcResponse::success(
                                id,
                                self.handle_tools_call(name, args).await,
                            ))
                        }
                    }
                    None => None,
                },
                _ => request
                    .id
                    .clone()
                    .map(|id| JsonRpcResponse::failure(id, McpError::method_not_found())),
            };

            if let Some(response) = response {
                write_response(&mut writer, &response).await?;
            }
        }

        Ok(())
    }
}

async fn write_response(
    writer: &mut BufWriter<tokio::io::Stdout>,
    response: &JsonRpcResponse,
) -> Result<(), ToolError> {
    let payload = serde_json::to_string(response).unwrap_or_default();
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await?;
    Ok(())
}

pub async fn run_stdio() -> Result<(), ToolError> {
    let server = McpServer::new()?;
    server.run_stdio().await
}
