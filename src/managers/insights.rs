use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::{insert_optional, params_from, Params};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS: &[&str] = &["meta_get_page_insights", "meta_get_post_insights"];

const DEFAULT_PAGE_METRICS: &str = "page_impressions,page_engaged_users,page_fans,page_views_total";
const POST_METRICS: &str =
    "post_impressions,post_impressions_unique,post_engaged_users,post_clicks,post_reactions_by_type_total";
const DEFAULT_PERIOD: &str = "day";

/// Page and post metrics.
#[derive(Clone)]
pub struct InsightsManager {
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl InsightsManager {
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
        match tool {
            "meta_get_page_insights" => {
                let page_id = self.validation.ensure_string(args, "page_id")?;
                let params = self.page_params(args)?;
                let credential = self.resolver.resolve_page(&page_id).await?;
                self.gateway
                    .get(&format!("{}/insights", page_id), params, &credential)
                    .await
            }
            "meta_get_post_insights" => {
                let post_id = self.validation.ensure_string(args, "post_id")?;
                let page_id = self.validation.ensure_string(args, "page_id")?;
                let credential = self.resolver.resolve_page(&page_id).await?;
                let params = params_from([("metric", POST_METRICS)]);
                self.gateway
                    .get(&format!("{}/insights", post_id), params, &credential)
                    .await
            }
            _ => Err(unknown_tool_error("insights", tool, TOOLS)),
        }
    }

    fn page_params(&self, args: &Value) -> GatewayResult<Params> {
        let metrics = self.validation.string_or(args, "metrics", DEFAULT_PAGE_METRICS)?;
        let period = self.validation.string_or(args, "period", DEFAULT_PERIOD)?;
        let mut params = params_from([("metric", metrics.as_str()), ("period", period.as_str())]);
        insert_optional(&mut params, "since", self.validation.optional_string(args, "since")?);
        insert_optional(&mut params, "until", self.validation.optional_string(args, "until")?);
        Ok(params)
    }
}

#[async_trait::async_trait]
impl ToolHandler for InsightsManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
