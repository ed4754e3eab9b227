use crate::constants::limits::{COLLECTION_CEILING, IG_MEDIA_CEILING};
use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::{clamped_limit_param, params_from, Params};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS: &[&str] = &[
    "meta_get_ig_accounts",
    "meta_get_ig_media",
    "meta_get_ig_comments",
    "meta_reply_ig_comment",
    "meta_delete_ig_comment",
];

const IG_ACCOUNT_FIELDS: &str = "instagram_business_account{id,name,username,profile_picture_url,followers_count,media_count}";
const IG_MEDIA_FIELDS: &str =
    "id,caption,media_type,media_url,permalink,timestamp,like_count,comments_count,thumbnail_url";
const IG_COMMENT_FIELDS: &str = "id,text,username,timestamp,like_count,replies{id,text,username,timestamp}";

/// Instagram business accounts linked to a page. The page token of the
/// owning page authorizes every call.
#[derive(Clone)]
pub struct InstagramManager {
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl InstagramManager {
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
        match tool {
            "meta_get_ig_accounts" => {
                let credential = self.resolver.resolve_page(&page_id).await?;
                let params = params_from([("fields", IG_ACCOUNT_FIELDS)]);
                self.gateway.get(&page_id, params, &credential).await
            }
            "meta_get_ig_media" => {
                let account = self.validation.ensure_string(args, "ig_account_id")?;
                let limit = self.validation.integer_or(args, "limit", 10)?;
                let mut params = params_from([("fields", IG_MEDIA_FIELDS)]);
                params.insert("limit".to_string(), clamped_limit_param(limit, IG_MEDIA_CEILING));
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway
                    .get(&format!("{}/media", account), params, &credential)
                    .await
            }
            "meta_get_ig_comments" => {
                let media_id = self.validation.ensure_string(args, "media_id")?;
                let limit = self.validation.integer_or(args, "limit", 25)?;
                let mut params = params_from([("fields", IG_COMMENT_FIELDS)]);
                params.insert("limit".to_string(), clamped_limit_param(limit, COLLECTION_CEILING));
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway
                    .get(&format!("{}/comments", media_id), params, &credential)
                    .await
            }
            "meta_reply_ig_comment" => {
                let comment_id = self.validation.ensure_string(args, "comment_id")?;
                let message = self.validation.ensure_text(args, "message")?;
                let mut payload = Params::new();
                payload.insert("message".to_string(), Value::String(message));
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway
                    .post(&format!("{}/replies", comment_id), payload, &credential)
                    .await
            }
            "meta_delete_ig_comment" => {
                let comment_id = self.validation.ensure_string(args, "comment_id")?;
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway.delete(&comment_id, &credential).await
            }
            _ => Err(unknown_tool_error("instagram", tool, TOOLS)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for InstagramManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
