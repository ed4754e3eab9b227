use crate::constants::limits::{COLLECTION_CEILING, CONVERSATIONS_CEILING};
use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::{clamped_limit_param, params_from, Params};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TOOLS: &[&str] = &[
    "meta_get_conversations",
    "meta_get_conversation_messages",
    "meta_send_message",
];

const CONVERSATION_FIELDS: &str =
    "id,snippet,updated_time,message_count,participants,messages.limit(3){id,message,from,created_time}";
const MESSAGE_FIELDS: &str = "id,message,from,to,created_time,attachments{mime_type,name,size,url}";
const MESSAGING_TYPE: &str = "RESPONSE";

#[derive(Clone)]
pub struct MessagingManager {
    logger: Logger,
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl MessagingManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        resolver: Arc<CredentialResolver>,
        gateway: Arc<GraphGateway>,
    ) -> Self {
        Self {
            logger: logger.child("messaging"),
            validation,
            resolver,
            gateway,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: &Value) -> GatewayResult<Value> {
        match tool {
            "meta_get_conversations" => {
                let page_id = self.validation.ensure_string(args, "page_id")?;
                let limit = self.validation.integer_or(args, "limit", 10)?;
                let mut params = params_from([("fields", CONVERSATION_FIELDS)]);
                params.insert(
                    "limit".to_string(),
                    clamped_limit_param(limit, CONVERSATIONS_CEILING),
                );
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway
                    .get(&format!("{}/conversations", page_id), params, &credential)
                    .await
            }
            "meta_get_conversation_messages" => {
                let conversation_id = self.validation.ensure_string(args, "conversation_id")?;
                let page_id = self.validation.ensure_string(args, "page_id")?;
                let limit = self.validation.integer_or(args, "limit", 20)?;
                let mut params = params_from([("fields", MESSAGE_FIELDS)]);
                params.insert("limit".to_string(), clamped_limit_param(limit, COLLECTION_CEILING));
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway
                    .get(&format!("{}/messages", conversation_id), params, &credential)
                    .await
            }
            "meta_send_message" => self.send_message(args).await,
            _ => Err(unknown_tool_error("messaging", tool, TOOLS)),
        }
    }

    async fn send_message(&self, args: &Value) -> GatewayResult<Value> {
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let recipient_id = self.validation.ensure_string(args, "recipient_id")?;
        let message = self.validation.ensure_text(args, "message")?;
        let credential = self.resolver.resolve_page(&page_id).await?;

        self.logger.debug(
            "sending page message",
            Some(&json!({ "page_id": page_id, "recipient_id": recipient_id })),
        );
        let payload = message_payload(&recipient_id, &message);
        self.gateway
            .post(&format!("{}/messages", page_id), payload, &credential)
            .await
    }
}

/// Send API form fields; `recipient` and `message` travel as JSON text.
fn message_payload(recipient_id: &str, text: &str) -> Params {
    let mut payload = Params::new();
    payload.insert("recipient".to_string(), json!({ "id": recipient_id }));
    payload.insert("message".to_string(), json!({ "text": text }));
    payload.insert(
        "messaging_type".to_string(),
        Value::String(MESSAGING_TYPE.to_string()),
    );
    payload
}

#[async_trait::async_trait]
impl ToolHandler for MessagingManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::params::render_params;

    #[test]
    fn payload_renders_nested_objects_as_json_text() {
        let pairs = render_params(&message_payload("psid-1", "hi \"there\""));
        assert_eq!(
            pairs,
            vec![
                ("recipient".to_string(), r#"{"id":"psid-1"}"#.to_string()),
                ("message".to_string(), r#"{"text":"hi \"there\""}"#.to_string()),
                ("messaging_type".to_string(), "RESPONSE".to_string()),
            ]
        );
    }
}
