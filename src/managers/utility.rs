use crate::errors::{GatewayError, GatewayResult};
use crate::services::credentials::{Credential, CredentialResolver, Principal};
use crate::services::graph_gateway::{GraphGateway, Verb};
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolHandler;
use crate::services::validation::Validation;
use crate::utils::params::Params;
use crate::utils::tool_errors::unknown_tool_error;
use serde_json::{json, Value};
use std::sync::Arc;

pub const TOOLS: &[&str] = &["meta_debug_token", "meta_graph_api_call"];

/// A fully validated raw Graph API call. Everything that can be rejected
/// locally is rejected while building this, before any credential is
/// resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct RawCall {
    pub endpoint: String,
    pub verb: Verb,
    pub principal: Principal,
    pub params: Params,
}

/// Token inspection and the raw Graph API escape hatch.
#[derive(Clone)]
pub struct UtilityManager {
    logger: Logger,
    validation: Validation,
    resolver: Arc<CredentialResolver>,
    gateway: Arc<GraphGateway>,
}

impl UtilityManager {
    pub fn new(
        logger: Logger,
        validation: Validation,
        resolver: Arc<CredentialResolver>,
        gateway: Arc<GraphGateway>,
    ) -> Self {
        Self {
            logger: logger.child("utility"),
            validation,
            resolver,
            gateway,
        }
    }

    pub async fn handle_tool(&self, tool: &str, args: &Value) -> GatewayResult<Value> {
        match tool {
            "meta_debug_token" => self.debug_token(args).await,
            "meta_graph_api_call" => self.graph_api_call(args).await,
            _ => Err(unknown_tool_error("utility", tool, TOOLS)),
        }
    }

    /// `token_type` is `user`, `app`, or a page id. The inspection call is
    /// always authorized with the app credential.
    async fn debug_token(&self, args: &Value) -> GatewayResult<Value> {
        let token_type = self.validation.string_or(args, "token_type", "user")?;
        let principal = match token_type.as_str() {
            "user" => Principal::User,
            "app" => Principal::App,
            page_id => Principal::Page(page_id.to_string()),
        };
        let authority = self.resolver.resolve_app()?;
        let inspected = self.resolver.resolve(&principal).await?;

        let mut params = Params::new();
        params.insert(
            "input_token".to_string(),
            Value::String(inspected.token().to_string()),
        );
        self.gateway.get("debug_token", params, &authority).await
    }

    async fn graph_api_call(&self, args: &Value) -> GatewayResult<Value> {
        let call = match self.prepare_raw_call(args) {
            Ok(call) => call,
            Err(RawCallRejection::Result(result)) => return Ok(result),
            Err(RawCallRejection::Error(err)) => return Err(err),
        };
        let credential = self.resolver.resolve(&call.principal).await?;
        self.logger.info(
            "raw graph call",
            Some(&json!({
                "verb": call.verb.to_string(),
                "endpoint": call.endpoint,
                "principal": call.principal.to_string(),
            })),
        );
        self.dispatch(call, &credential).await
    }

    async fn dispatch(&self, call: RawCall, credential: &Credential) -> GatewayResult<Value> {
        match call.verb {
            Verb::Read => self.gateway.get(&call.endpoint, call.params, credential).await,
            Verb::Write => self.gateway.post(&call.endpoint, call.params, credential).await,
            Verb::Remove => self.gateway.delete(&call.endpoint, credential).await,
        }
    }

    pub fn prepare_raw_call(&self, args: &Value) -> Result<RawCall, RawCallRejection> {
        let token_type = self.validation.string_or(args, "token_type", "user")?;
        let page_id = self.validation.optional_string(args, "page_id")?;
        let page_selected = token_type.trim().eq_ignore_ascii_case("page");
        let principal = match Principal::from_selector(&token_type, page_id.as_deref()) {
            Ok(principal) => principal,
            Err(err) if page_selected => return Err(RawCallRejection::Result(err.to_result())),
            Err(err) => return Err(err.into()),
        };

        let endpoint = self.validation.ensure_string(args, "endpoint")?;
        let method = self.validation.string_or(args, "method", "GET")?;

        let mut params = Params::new();
        if let Some(fields) = self.validation.optional_string(args, "fields")? {
            params.insert("fields".to_string(), Value::String(fields));
        }
        if let Some(raw) = self.validation.optional_string(args, "params")? {
            let extra = parse_object(&raw, "params")?;
            params.extend(extra);
        }

        let verb = Verb::parse(&method).ok_or_else(|| {
            RawCallRejection::Result(json!({
                "error": format!("Unsupported method: {}. Use GET, POST, or DELETE.", method)
            }))
        })?;

        if verb == Verb::Write {
            let mut payload = match self.validation.optional_string(args, "body")? {
                Some(raw) => parse_object(&raw, "body")?,
                None => Params::new(),
            };
            payload.extend(params);
            params = payload;
        }

        Ok(RawCall {
            endpoint,
            verb,
            principal,
            params,
        })
    }
}

/// Why a raw call never reached the network: either a plain error result
/// for the caller, or a failure the executor converts.
#[derive(Debug)]
pub enum RawCallRejection {
    Result(Value),
    Error(GatewayError),
}

impl From<GatewayError> for RawCallRejection {
    fn from(err: GatewayError) -> Self {
        RawCallRejection::Error(err)
    }
}

fn parse_object(raw: &str, label: &str) -> Result<Params, RawCallRejection> {
    match serde_json::from_str::<Value>(raw) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(_) => Err(RawCallRejection::Result(
            json!({ "error": format!("{} must be a JSON object", label) }),
        )),
        Err(_) => Err(RawCallRejection::Result(
            json!({ "error": format!("{} must be valid JSON", label) }),
        )),
    }
}

#[async_trait::async_trait]
impl ToolHandler for UtilityManager {
    async fn handle(&self, tool: &str, args: Value) -> GatewayResult<Value> {
        self.handle_tool(tool, &args).await
    }
}
