use crate::constants::graph::{ACCESS_TOKEN_PARAM, APP_TOKEN_SEPARATOR};
use crate::errors::{GatewayError, GatewayResult};
use crate::services::config::GatewayConfig;
use crate::services::graph_gateway::{build_client, graph_url};
use crate::services::logger::Logger;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Which kind of bearer a credential acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Principal {
    User,
    App,
    Page(String),
}

impl Principal {
    /// Parses the `token_type` selector of the raw Graph API tool.
    pub fn from_selector(token_type: &str, page_id: Option<&str>) -> GatewayResult<Self> {
        match token_type.trim().to_lowercase().as_str() {
            "user" => Ok(Principal::User),
            "app" => Ok(Principal::App),
            "page" => match page_id.map(str::trim).filter(|id| !id.is_empty()) {
                Some(id) => Ok(Principal::Page(id.to_string())),
                None => Err(GatewayError::validation(
                    "page_id is required when token_type='page'",
                )),
            },
            other => Err(GatewayError::validation(format!(
                "token_type must be one of user, app, page (got '{}')",
                other
            ))),
        }
    }
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Principal::User => f.write_str("user"),
            Principal::App => f.write_str("app"),
            Principal::Page(id) => write!(f, "page:{}", id),
        }
    }
}

/// A bearer token together with the principal that backs it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
    principal: Principal,
}

impl Credential {
    pub fn new(token: impl Into<String>, principal: Principal) -> Self {
        Self {
            token: token.into(),
            principal,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("principal", &self.principal)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Clone)]
pub struct CredentialResolver {
    logger: Logger,
    config: Arc<GatewayConfig>,
}

impl CredentialResolver {
    pub fn new(logger: Logger, config: Arc<GatewayConfig>) -> Self {
        Self {
            logger: logger.child("credentials"),
            config,
        }
    }

    pub async fn resolve(&self, principal: &Principal) -> GatewayResult<Credential> {
        match principal {
            Principal::User => self.resolve_user(),
            Principal::App => self.resolve_app(),
            Principal::Page(page_id) => self.resolve_page(page_id).await,
        }
    }

    pub fn resolve_user(&self) -> GatewayResult<Credential> {
        self.config
            .user_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .map(|token| Credential::new(token, Principal::User))
            .ok_or_else(|| {
                GatewayError::configuration("META_SYSTEM_USER_TOKEN env var is not set")
            })
    }

    pub fn resolve_app(&self) -> GatewayResult<Credential> {
        let app_id = self.config.app_id.as_deref().filter(|v| !v.is_empty());
        let app_secret = self.config.app_secret.as_deref().filter(|v| !v.is_empty());
        match (app_id, app_secret) {
            (Some(id), Some(secret)) => Ok(Credential::new(
                format!("{}{}{}", id, APP_TOKEN_SEPARATOR, secret),
                Principal::App,
            )),
            _ => Err(GatewayError::configuration(
                "META_APP_ID and META_APP_SECRET env vars are not set",
            )),
        }
    }

    /// Static map first; on a miss, trades the user token for the page
    /// token. The exchanged token is not remembered.
    pub async fn resolve_page(&self, page_id: &str) -> GatewayResult<Credential> {
        let page_id = page_id.trim();
        if page_id.is_empty() {
            return Err(GatewayError::validation("page_id must be a non-empty string"));
        }
        let principal = Principal::Page(page_id.to_string());
        if let Some(token) = self.config.page_tokens.get(page_id) {
            return Ok(Credential::new(token.as_str(), principal));
        }
        let token = self.exchange_page_token(page_id).await?;
        Ok(Credential::new(token, principal))
    }

    async fn exchange_page_token(&self, page_id: &str) -> GatewayResult<String> {
        let user = self
            .resolve_user()
            .map_err(|err| GatewayError::token_exchange(page_id, err))?;
        self.logger.debug(
            "exchanging user token for page token",
            Some(&serde_json::json!({ "page_id": page_id })),
        );

        let result = self.fetch_page_token(page_id, user.token()).await;
        if let Err(err) = &result {
            self.logger.warn(
                "page token exchange failed",
                Some(&serde_json::json!({ "page_id": page_id, "cause": err })),
            );
        }
        result.map_err(|cause| GatewayError::token_exchange(page_id, cause))
    }

    async fn fetch_page_token(&self, page_id: &str, user_token: &str) -> Result<String, String> {
        let url = graph_url(
            &self.config.graph_api_base,
            page_id,
            &[("fields", "access_token"), (ACCESS_TOKEN_PARAM, user_token)],
        )
        .map_err(|err| err.to_string())?;
        let client = build_client(self.config.request_timeout).map_err(|err| err.to_string())?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| GatewayError::from(err).to_string())?;
        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|err| GatewayError::from(err).to_string())?;

        if let Some(error) = body.get("error") {
            let message = error
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_else(|| error.to_string());
            return Err(message);
        }
        if !status.is_success() {
            return Err(format!("Graph API responded with HTTP {}", status.as_u16()));
        }

        body.get(ACCESS_TOKEN_PARAM)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .ok_or_else(|| format!("No access_token returned for page {}", page_id))
    }
}
