use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::Params;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS: &[&str] = &["meta_get_page_subscriptions", "meta_subscribe_page_webhooks"];

const DEFAULT_SUBSCRIBED_FIELDS: &str =
    "feed,messages,messaging_postbacks,message_deliveries,message_reads";

/// Webhook subscriptions of this app on a page. Receiving the events is
/// out of scope; only the subscription state is managed.
#[derive(Clone)]
pub struct WebhooksManager {
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl WebhooksManager {
    pub fn new(
        validation: Validation,
        resolver: Arc<CredentialResolver>,
        gateway: Arc<GraphGateway>,
    ) -> Self {
        Self {
            validation,
            resolver,
            gateway,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: &Value) -> GatewayResult<Value> {
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let endpoint = format!("{}/subscribed_apps", page_id);
        match tool {
            "meta_get_page_subscriptions" => {
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway.get(&endpoint, Params::new(), &credential).await
            }
            "meta_subscribe_page_webhooks" => {
                let fields =
                    self.validation
                        .string_or(args, "subscribed_fields", DEFAULT_SUBSCRIBED_FIELDS)?;
                let credential = self.resolver.resolve_page(&page_id).await?;
                let mut payload = Params::new();
                payload.insert("subscribed_fields".to_string(), Value::String(fields));
                self.gateway.post(&endpoint, payload, &credential).await
            }
            _ => Err(unknown_tool_error("webhooks", tool, TOOLS)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for WebhooksManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
