use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use crate::constants::limits::LOG_SUBSTRING_LENGTH;
use crate::errors::{GatewayResult, McpError};
use crate::services::logger::Logger;
use crate::utils::redact::redact_object;
use crate::utils::suggest::suggest;

use serde_json::Value;

/// One handler serves every tool of a domain area; `tool` selects the
/// operation.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value>;
}

#[derive(Clone)]
pub struct ToolExecutor {
    logger: Logger,
    handlers: Arc<HashMap<String, Arc<dyn ToolHandler>>>,
}

impl ToolExecutor {
    pub fn new(logger: Logger, handlers: HashMap<String, Arc<dyn ToolHandler>>) -> Self {
        Self {
            logger: logger.child("executor"),
            handlers: Arc::new(handlers),
        }
    }

    pub fn has_handler(&self, tool: &str) -> bool {
        self.handlers.contains_key(tool)
    }

    /// Runs one tool. Unknown tools are protocol errors; everything that
    /// goes wrong inside a known tool becomes `{"error": message}`.
    pub async fn execute(&self, tool: &str, args: Value) -> Result<Value, McpError> {
        let Some(handler) = self.handlers.get(tool).cloned() else {
            let known: Vec<String> = self.handlers.keys().cloned().collect();
            let suggestions = suggest(tool, &known, 3);
            let mut message = format!("Unknown tool: {}", tool);
            if !suggestions.is_empty() {
                message.push_str(&format!(". Did you mean: {}?", suggestions.join(", ")));
            }
            return Err(McpError::invalid_params(message));
        };

        let call_id = uuid::Uuid::new_v4().to_string();
        let started = Instant::now();
        self.logger.debug(
            tool,
            Some(&serde_json::json!({
                "call_id": call_id,
                "args": redact_object(&args, LOG_SUBSTRING_LENGTH, None),
            })),
        );

        let result = match handler.handle(tool, args).await {
            Ok(result) => {
                if let Some(message) = result.get("error").and_then(Value::as_str) {
                    self.logger.info(
                        "tool returned remote error",
                        Some(&serde_json::json!({
                            "tool": tool,
                            "call_id": call_id,
                            "error": message,
                        })),
                    );
                }
                result
            }
            Err(err) => {
                self.logger.warn(
                    "tool failed",
                    Some(&serde_json::json!({
                        "tool": tool,
                        "call_id": call_id,
                        "kind": err.kind(),
                        "error": err.to_string(),
                    })),
                );
                err.to_result()
            }
        };

        self.logger.debug(
            "tool completed",
            Some(&serde_json::json!({
                "tool": tool,
                "call_id": call_id,
                "duration_ms": started.elapsed().as_millis() as u64,
            })),
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::GatewayError;

    struct Echo;

    #[async_trait]
    impl ToolHandler for Echo {
        async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
            match tool {
                "echo_ok" => Ok(args),
                _ => Err(GatewayError::configuration("META_APP_ID and META_APP_SECRET env vars are not set")),
            }
        }
    }

    fn executor() -> ToolExecutor {
        let handler: Arc<dyn ToolHandler> = Arc::new(Echo);
        let mut handlers = HashMap::new();
        handlers.insert("echo_ok".to_string(), handler.clone());
        handlers.insert("echo_fail".to_string(), handler);
        ToolExecutor::new(Logger::new("test"), handlers)
    }

    #[tokio::test]
    async fn handler_errors_become_error_shape() {
        let result = executor()
            .execute("echo_fail", Value::Null)
            .await
            .expect("result");
        assert_eq!(
            result,
            serde_json::json!({"error": "META_APP_ID and META_APP_SECRET env vars are not set"})
        );
    }

    #[tokio::test]
    async fn successful_results_pass_through() {
        let args = serde_json::json!({"x": 1});
        let result = executor().execute("echo_ok", args.clone()).await.expect("result");
        assert_eq!(result, args);
    }

    #[tokio::test]
    async fn unknown_tool_is_a_protocol_error_with_suggestion() {
        let err = executor()
            .execute("echo_okk", Value::Null)
            .await
            .expect_err("unknown");
        assert!(err.message.contains("Unknown tool: echo_okk"));
        assert!(err.message.contains("echo_ok"));
    }
}
