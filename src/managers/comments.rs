use crate::constants::limits::COLLECTION_CEILING;
use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::{clamped_limit_param, params_from, Params};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS: &[&str] = &[
    "meta_get_post_comments",
    "meta_reply_to_comment",
    "meta_delete_comment",
    "meta_like_comment",
    "meta_hide_comment",
    "meta_get_ad_comments",
    "meta_reply_to_ad_comment",
    "meta_hide_ad_comment",
    "meta_delete_ad_comment",
];

const POST_COMMENT_FIELDS: &str = "id,message,from{id,name},created_time,like_count,comment_count,attachment{media_type,url,media}";
const AD_COMMENT_FIELDS: &str = "id,message,from{id,name},created_time,like_count,comment_count,is_hidden,attachment{media_type,url,media}";

/// Comment moderation on page posts and on the page posts behind ads.
/// Every call acts as the page, so every call needs a page credential.
#[derive(Clone)]
pub struct CommentsManager {
    logger: Logger,
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl CommentsManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        resolver: Arc<CredentialResolver>,
        gateway: Arc<GraphGateway>,
    ) -> Self {
        Self {
            logger: logger.child("comments"),
            validation,
            resolver,
            gateway,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: &Value) -> GatewayResult<Value> {
        match tool {
            "meta_get_post_comments" => {
                let post_id = self.validation.ensure_string(args, "post_id")?;
                self.list_comments(args, &post_id, POST_COMMENT_FIELDS, None).await
            }
            "meta_get_ad_comments" => {
                let story_id = self
                    .validation
                    .ensure_string(args, "effective_object_story_id")?;
                let filter = self.validation.string_or(args, "filter_type", "toplevel")?;
                self.list_comments(args, &story_id, AD_COMMENT_FIELDS, Some(filter))
                    .await
            }
            "meta_reply_to_comment" | "meta_reply_to_ad_comment" => self.reply(args).await,
            "meta_delete_comment" | "meta_delete_ad_comment" => self.delete(args).await,
            "meta_like_comment" => self.like(args).await,
            "meta_hide_comment" | "meta_hide_ad_comment" => self.hide(args).await,
            _ => Err(unknown_tool_error("comments", tool, TOOLS)),
        }
    }

    async fn list_comments(
        &self,
        args: &Value,
        object_id: &str,
        fields: &str,
        filter: Option<String>,
    ) -> GatewayResult<Value> {
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let limit = self.validation.integer_or(args, "limit", 25)?;
        let credential = self.resolver.resolve_page(&page_id).await?;

        let mut params = params_from([("fields", fields)]);
        params.insert("limit".to_string(), clamped_limit_param(limit, COLLECTION_CEILING));
        if let Some(filter) = filter {
            params.insert("filter".to_string(), Value::String(filter));
        }
        self.gateway
            .get(&format!("{}/comments", object_id), params, &credential)
            .await
    }

    async fn reply(&self, args: &Value) -> GatewayResult<Value> {
        let comment_id = self.validation.ensure_string(args, "comment_id")?;
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let message = self.validation.ensure_text(args, "message")?;
        let credential = self.resolver.resolve_page(&page_id).await?;

        let mut payload = Params::new();
        payload.insert("message".to_string(), Value::String(message));
        self.gateway
            .post(&format!("{}/comments", comment_id), payload, &credential)
            .await
    }

    async fn delete(&self, args: &Value) -> GatewayResult<Value> {
        let comment_id = self.validation.ensure_string(args, "comment_id")?;
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let credential = self.resolver.resolve_page(&page_id).await?;
        self.gateway.delete(&comment_id, &credential).await
    }

    async fn like(&self, args: &Value) -> GatewayResult<Value> {
        let comment_id = self.validation.ensure_string(args, "comment_id")?;
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let credential = self.resolver.resolve_page(&page_id).await?;
        self.gateway
            .post(&format!("{}/likes", comment_id), Params::new(), &credential)
            .await
    }

    async fn hide(&self, args: &Value) -> GatewayResult<Value> {
        let comment_id = self.validation.ensure_string(args, "comment_id")?;
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let is_hidden = self.validation.bool_or(args, "is_hidden", true)?;
        let credential = self.resolver.resolve_page(&page_id).await?;
        self.logger.debug(
            "setting comment visibility",
            Some(&serde_json::json!({ "comment_id": comment_id, "is_hidden": is_hidden })),
        );

        let mut payload = Params::new();
        payload.insert("is_hidden".to_string(), Value::Bool(is_hidden));
        self.gateway.post(&comment_id, payload, &credential).await
    }
}

#[async_trait::async_trait]
impl ToolHandler for CommentsManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
