use crate::constants::limits::{COLLECTION_CEILING, LEAD_FORMS_LIMIT};
use crate::errors::GatewayResult;
use crate::services::credentials::CredentialResolver;
use crate::services::graph_gateway::GraphGateway;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::{clamped_limit_param, params_from};
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::Value;
use std::sync::Arc;

pub const TOOLS: &[&str] = &["meta_get_lead_forms", "meta_get_lead_data"];

const LEAD_FORM_FIELDS: &str = "id,name,status,created_time,leads_count,locale,questions{key,label,type}";
const LEAD_FIELDS: &str = "id,created_time,field_data,ad_id,ad_name,campaign_id,campaign_name";

#[derive(Clone)]
pub struct LeadsManager {
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl LeadsManager {
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
            "meta_get_lead_forms" => {
                let page_id = self.validation.ensure_string(args, "page_id")?;
                let credential = self.resolver.resolve_page(&page_id).await?;
                let params = params_from([("fields", LEAD_FORM_FIELDS), ("limit", LEAD_FORMS_LIMIT)]);
                self.gateway
                    .get(&format!("{}/leadgen_forms", page_id), params, &credential)
                    .await
            }
            "meta_get_lead_data" => {
                let form_id = self.validation.ensure_string(args, "form_id")?;
                let page_id = self.validation.ensure_string(args, "page_id")?;
                let limit = self.validation.integer_or(args, "limit", 25)?;
                let credential = self.resolver.resolve_page(&page_id).await?;
                let mut params = params_from([("fields", LEAD_FIELDS)]);
                params.insert("limit".to_string(), clamped_limit_param(limit, COLLECTION_CEILING));
                self.gateway
                    .get(&format!("{}/leads", form_id), params, &credential)
                    .await
            }
            _ => Err(unknown_tool_error("leads", tool, TOOLS)),
        }
    }
}

#[async_trait::async_trait]
impl ToolHandler for LeadsManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
