use serde_json::Value;
use thiserror::Error;

pub type GatewayResult<T> = Result<T, GatewayError>;

/// Failure taxonomy of the resolver/gateway core.
///
/// Every variant is converted to `{"error": <Display>}` at the tool boundary,
/// so the `Display` text is what callers read.
#[derive(Debug, Clone, Error)]
pub enum GatewayError {
    #[error("{0}")]
    Configuration(String),

    #[error("Could not get page token for {page_id}: {cause}")]
    TokenExchange { page_id: String, cause: String },

    #[error("{0}")]
    RemoteApi(String),

    #[error("{0}")]
    Transport(String),

    #[error("{0}")]
    Validation(String),
}

impl GatewayError {
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    pub fn token_exchange(page_id: impl Into<String>, cause: impl ToString) -> Self {
        Self::TokenExchange {
            page_id: page_id.into(),
            cause: cause.to_string(),
        }
    }

    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteApi(message.into())
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Configuration(_) => "configuration",
            Self::TokenExchange { .. } => "token_exchange",
            Self::RemoteApi(_) => "remote_api",
            Self::Transport(_) => "transport",
            Self::Validation(_) => "validation",
        }
    }

    /// Uniform error shape handed back to tool callers.
    pub fn to_result(&self) -> Value {
        serde_json::json!({ "error": self.to_string() })
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            return GatewayError::transport("Graph API request timed out");
        }
        if err.is_decode() {
            return GatewayError::transport(format!("Graph API returned a non-JSON body: {}", err));
        }
        GatewayError::transport(format!("Graph API request failed: {}", err))
    }
}
