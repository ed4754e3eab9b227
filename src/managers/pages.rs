use crate::constants::limits::{ACCOUNT_LISTING_LIMIT, COLLECTION_CEILING};
use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::{clamped_limit_param, insert_optional, params_from, Params};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS: &[&str] = &[
    "meta_list_pages",
    "meta_get_page_info",
    "meta_get_page_posts",
    "meta_create_page_post",
    "meta_delete_page_post",
];

const LIST_PAGES_FIELDS: &str = "id,name,category,fan_count,username";
const PAGE_INFO_FIELDS: &str = "id,name,username,category,fan_count,followers_count,about,description,website,phone,emails,location,hours,verification_status,picture{url}";
const PAGE_POST_FIELDS: &str = "id,message,created_time,type,permalink_url,shares,likes.summary(true).limit(0),comments.summary(true).limit(0),attachments{media_type,url,media}";

/// Page listing, page info and feed posts.
#[derive(Clone)]
pub struct PagesManager {
    logger: Logger,
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl PagesManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        resolver: Arc<CredentialResolver>,
        gateway: Arc<GraphGateway>,
    ) -> Self {
        Self {
            logger: logger.child("pages"),
            validation,
            resolver,
            gateway,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: &Value) -> GatewayResult<Value> {
        match tool {
            "meta_list_pages" => self.list_pages().await,
            "meta_get_page_info" => self.page_info(args).await,
            "meta_get_page_posts" => self.page_posts(args).await,
            "meta_create_page_post" => self.create_post(args).await,
            "meta_delete_page_post" => self.delete_post(args).await,
            _ => Err(unknown_tool_error("pages", tool, TOOLS)),
        }
    }

    async fn list_pages(&self) -> GatewayResult<Value> {
        let credential = self.resolver.resolve_user()?;
        let params = params_from([("fields", LIST_PAGES_FIELDS), ("limit", ACCOUNT_LISTING_LIMIT)]);
        self.gateway.get("me/accounts", params, &credential).await
    }

    async fn page_info(&self, args: &Value) -> GatewayResult<Value> {
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let credential = self.resolver.resolve_page(&page_id).await?;
        let params = params_from([("fields", PAGE_INFO_FIELDS)]);
        self.gateway.get(&page_id, params, &credential).await
    }

    async fn page_posts(&self, args: &Value) -> GatewayResult<Value> {
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let limit = self.validation.integer_or(args, "limit", 10)?;
        let credential = self.resolver.resolve_page(&page_id).await?;
        let mut params = params_from([("fields", PAGE_POST_FIELDS)]);
        params.insert("limit".to_string(), clamped_limit_param(limit, COLLECTION_CEILING));
        self.gateway
            .get(&format!("{}/feed", page_id), params, &credential)
            .await
    }

    async fn create_post(&self, args: &Value) -> GatewayResult<Value> {
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let message = self.validation.ensure_text(args, "message")?;
        let link = self.validation.optional_string(args, "link")?;
        let credential = self.resolver.resolve_page(&page_id).await?;

        let mut payload = Params::new();
        payload.insert("message".to_string(), Value::String(message));
        insert_optional(&mut payload, "link", link);
        self.logger.debug(
            "creating page post",
            Some(&serde_json::json!({ "page_id": page_id, "has_link": payload.contains_key("link") })),
        );
        self.gateway
            .post(&format!("{}/feed", page_id), payload, &credential)
            .await
    }

    async fn delete_post(&self, args: &Value) -> GatewayResult<Value> {
        let post_id = self.validation.ensure_string(args, "post_id")?;
        let page_id = self.validation.ensure_string(args, "page_id")?;
        let credential = self.resolver.resolve_page(&page_id).await?;
        self.gateway.delete(&post_id, &credential).await
    }
}

#[async_trait::async_trait]
impl ToolHandler for PagesManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
