use crate::app::App;
use crate::constants::graph::API_VERSION;
use crate::errors::{ErrorCode, GatewayError, GatewayResult, McpError};
use crate::mcp::catalog::{tool_catalog, validate_tool_args};
use crate::mcp::protocol::{JsonRpcRequest, JsonRpcResponse};
use crate::services::config::GatewayConfig;
use crate::services::logger::Logger;
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, BufWriter};

pub const PROTOCOL_VERSION: &str = "2025-06-18";
pub const SERVER_NAME: &str = "meta-pages-mcp";
pub const SERVER_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Transport-independent MCP request handling. The stdio loop and the HTTP
/// endpoint both feed raw JSON-RPC text through [`McpServer::handle_payload`].
#[derive(Clone)]
pub struct McpServer {
    app: Arc<App>,
}

impl McpServer {
    pub fn new(app: App) -> Self {
        Self { app: Arc::new(app) }
    }

    pub fn app(&self) -> &App {
        &self.app
    }

    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": SERVER_NAME, "version": SERVER_VERSION},
            "instructions": format!(
                "Meta Graph API {} tools for Pages, comments, ads, Instagram, Messenger, leads, insights and webhooks. Page tokens are resolved automatically from page_id.",
                API_VERSION
            ),
        })
    }

    fn handle_tools_list(&self) -> Value {
        json!({ "tools": tool_catalog() })
    }

    async fn handle_tools_call(&self, params: &Value) -> Result<Value, McpError> {
        let name = params
            .get("name")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| McpError::invalid_params("Missing tool name"))?;
        let args = match params.get("arguments") {
            None | Some(Value::Null) => json!({}),
            Some(args) => args.clone(),
        };

        validate_tool_args(name, &args)?;
        let result = self.app.tool_executor.execute(name, args).await?;
        let text = serde_json::to_string_pretty(&result)?;
        Ok(json!({
            "content": [ { "type": "text", "text": text } ]
        }))
    }

    /// Routes one parsed request. Notifications never produce a response.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            if !request.method.starts_with("notifications/") {
                self.app.logger.debug(
                    "ignoring request without id",
                    Some(&json!({ "method": request.method })),
                );
            }
            return None;
        }
        let id = request.id.clone().unwrap_or(Value::Null);

        let outcome = match request.method.as_str() {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "tools/list" => Ok(self.handle_tools_list()),
            "tools/call" => self.handle_tools_call(&request.params).await,
            method => Err(McpError::method_not_found(method)),
        };

        Some(match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(err) => JsonRpcResponse::from_error(id, err),
        })
    }

    /// Parses and handles one JSON-RPC message.
    pub async fn handle_payload(&self, raw: &str) -> Option<JsonRpcResponse> {
        let parsed: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(_) => {
                return Some(JsonRpcResponse::from_error(
                    Value::Null,
                    McpError::bare(ErrorCode::ParseError),
                ))
            }
        };
        let id = parsed.get("id").cloned().unwrap_or(Value::Null);
        match serde_json::from_value::<JsonRpcRequest>(parsed) {
            Ok(request) => self.handle_request(request).await,
            Err(_) => Some(JsonRpcResponse::from_error(
                id,
                McpError::bare(ErrorCode::InvalidRequest),
            )),
        }
    }

    pub async fn run_stdio(&self) -> GatewayResult<()> {
        let stdin = tokio::io::stdin();
        let stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin).lines();
        let mut writer = BufWriter::new(stdout);
        self.app.logger.info("serving MCP over stdio", None);

        while let Some(line) = reader
            .next_line()
            .await
            .map_err(|err| GatewayError::transport(format!("stdin: {}", err)))?
        {
            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }
            let Some(response) = self.handle_payload(trimmed).await else {
                continue;
            };
            let payload = serde_json::to_string(&response)
                .map_err(|err| GatewayError::transport(format!("encode response: {}", err)))?;
            write_line(&mut writer, &payload)
                .await
                .map_err(|err| GatewayError::transport(format!("stdout: {}", err)))?;
        }

        self.app.logger.info("stdin closed; shutting down", None);
        Ok(())
    }
}

async fn write_line<W>(writer: &mut W, payload: &str) -> std::io::Result<()>
where
    W: AsyncWriteExt + Unpin,
{
    writer.write_all(payload.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

pub async fn run_stdio(logger: Logger, config: GatewayConfig) -> GatewayResult<()> {
    let server = McpServer::new(App::initialize(logger, config)?);
    server.run_stdio().await
}
