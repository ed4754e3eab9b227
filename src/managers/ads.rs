use crate::constants::graph::FILTERING_PARAM;
use crate::constants::limits::{ACCOUNT_LISTING_LIMIT, COLLECTION_CEILING};
use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::filtering::{FilterSet, StatusFilter};
use crate::utils::params::{clamped_limit_param, params_from, Params};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS: &[&str] = &[
    "meta_get_ad_accounts",
    "meta_get_ad_campaigns",
    "meta_get_ad_adsets",
    "meta_get_ads",
    "meta_get_ad_creative",
];

const AD_ACCOUNT_FIELDS: &str = "id,name,account_id,account_status,currency,timezone_name";
const CAMPAIGN_FIELDS: &str =
    "id,name,objective,status,effective_status,daily_budget,lifetime_budget,created_time";
const ADSET_FIELDS: &str = "id,name,campaign_id,status,effective_status,daily_budget,lifetime_budget,targeting,optimization_goal";
const AD_FIELDS: &str =
    "id,name,status,effective_status,campaign_id,adset_id,creative{id,effective_object_story_id}";
const CREATIVE_FIELDS: &str =
    "id,name,creative{id,effective_object_story_id,object_story_spec,thumbnail_url,title,body}";

/// Ad account, campaign, ad set and ad listings. All of these act as the
/// user.
#[derive(Clone)]
pub struct AdsManager {
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl AdsManager {
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
            "meta_get_ad_accounts" => {
                let credential = self.resolver.resolve_user()?;
                let params =
                    params_from([("fields", AD_ACCOUNT_FIELDS), ("limit", ACCOUNT_LISTING_LIMIT)]);
                self.gateway.get("me/adaccounts", params, &credential).await
            }
            "meta_get_ad_campaigns" => self.list_filtered(args, "campaigns", CAMPAIGN_FIELDS, false, false).await,
            "meta_get_ad_adsets" => self.list_filtered(args, "adsets", ADSET_FIELDS, true, false).await,
            "meta_get_ads" => self.list_filtered(args, "ads", AD_FIELDS, true, true).await,
            "meta_get_ad_creative" => {
                let ad_id = self.validation.ensure_string(args, "ad_id")?;
                let credential = self.resolver.resolve_user()?;
                let params = params_from([("fields", CREATIVE_FIELDS)]);
                self.gateway.get(&ad_id, params, &credential).await
            }
            _ => Err(unknown_tool_error("ads", tool, TOOLS)),
        }
    }

    async fn list_filtered(
        &self,
        args: &Value,
        edge: &str,
        fields: &str,
        by_campaign: bool,
        by_adset: bool,
    ) -> GatewayResult<Value> {
        let ad_account_id = self.validation.ensure_string(args, "ad_account_id")?;
        let status: StatusFilter = self
            .validation
            .string_or(args, "status_filter", StatusFilter::default().as_str())?
            .parse()?;
        let limit = self.validation.integer_or(args, "limit", 25)?;
        let campaign_id = if by_campaign {
            self.validation.optional_string(args, "campaign_id")?
        } else {
            None
        };
        let adset_id = if by_adset {
            self.validation.optional_string(args, "adset_id")?
        } else {
            None
        };

        let params = list_params(fields, limit, status, campaign_id.as_deref(), adset_id.as_deref())?;
        let credential = self.resolver.resolve_user()?;
        self.gateway
            .get(&format!("{}/{}", ad_account_id, edge), params, &credential)
            .await
    }
}

/// Query parameters for a status/identity filtered collection listing.
pub fn list_params(
    fields: &str,
    limit: i64,
    status: StatusFilter,
    campaign_id: Option<&str>,
    adset_id: Option<&str>,
) -> GatewayResult<Params> {
    let mut params = params_from([("fields", fields)]);
    params.insert("limit".to_string(), clamped_limit_param(limit, COLLECTION_CEILING));
    let filtering = FilterSet::with_status(status)
        .equal_if_present("campaign.id", campaign_id)
        .equal_if_present("adset.id", adset_id)
        .encode()?;
    if let Some(filtering) = filtering {
        params.insert(
            FILTERING_PARAM.to_string(),
            Value::String(filtering),
        );
    }
    Ok(params)
}

#[async_trait::async_trait]
impl ToolHandler for AdsManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
