use crate::constants::{env, graph, network};
use crate::errors::{GatewayError, GatewayResult};
use crate::services::logger::Logger;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use url::Url;

/// Process-lifetime configuration. Built once at startup and shared
/// read-only (behind `Arc`) by the resolver and the gateway.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub user_token: Option<String>,
    pub page_tokens: HashMap<String, String>,
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub port: u16,
    pub graph_api_base: String,
    pub request_timeout: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            user_token: None,
            page_tokens: HashMap::new(),
            app_id: None,
            app_secret: None,
            port: network::DEFAULT_PORT,
            graph_api_base: graph::API_BASE.to_string(),
            request_timeout: Duration::from_millis(network::TIMEOUT_GRAPH_REQUEST_MS),
        }
    }
}

impl GatewayConfig {
    pub fn from_env(logger: &Logger) -> GatewayResult<Self> {
        Self::from_lookup(logger, |key| std::env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup. Missing credentials
    /// are not an error here; they fail the operations that need them.
    pub fn from_lookup<F>(logger: &Logger, lookup: F) -> GatewayResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let logger = logger.child("config");
        let read = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let page_tokens = match read(env::PAGE_TOKENS) {
            Some(raw) => parse_page_tokens(&raw, &logger),
            None => HashMap::new(),
        };

        let port = match read(env::PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| {
                GatewayError::configuration(format!("{} must be a valid port, got '{}'", env::PORT, raw))
            })?,
            None => network::DEFAULT_PORT,
        };

        let graph_api_base = match read(env::GRAPH_API_BASE) {
            Some(raw) => normalize_base_url(&raw)?,
            None => graph::API_BASE.to_string(),
        };

        let request_timeout = match read(env::REQUEST_TIMEOUT_MS) {
            Some(raw) => {
                let ms = raw.parse::<u64>().ok().filter(|ms| *ms > 0).ok_or_else(|| {
                    GatewayError::configuration(format!(
                        "{} must be a positive integer, got '{}'",
                        env::REQUEST_TIMEOUT_MS,
                        raw
                    ))
                })?;
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(network::TIMEOUT_GRAPH_REQUEST_MS),
        };

        let config = Self {
            user_token: read(env::USER_TOKEN),
            page_tokens,
            app_id: read(env::APP_ID),
            app_secret: read(env::APP_SECRET),
            port,
            graph_api_base,
            request_timeout,
        };

        logger.info(
            "configuration loaded",
            Some(&serde_json::json!({
                "graph_api_base": config.graph_api_base,
                "user_token_configured": config.user_token.is_some(),
                "app_credentials_configured": config.app_id.is_some() && config.app_secret.is_some(),
                "static_page_tokens": config.page_tokens.len(),
                "port": config.port,
            })),
        );
        Ok(config)
    }

    pub fn with_graph_api_base(mut self, base: &str) -> GatewayResult<Self> {
        self.graph_api_base = normalize_base_url(base)?;
        Ok(self)
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }
}

/// Parses the static page-token map. A malformed blob degrades to an empty
/// map; non-string entries are dropped.
pub fn parse_page_tokens(raw: &str, logger: &Logger) -> HashMap<String, String> {
    let parsed: Value = match serde_json::from_str(raw) {
        Ok(value) => value,
        Err(err) => {
            logger.error(
                &format!("{} is not valid JSON", env::PAGE_TOKENS),
                Some(&serde_json::json!({ "cause": err.to_string() })),
            );
            return HashMap::new();
        }
    };
    let Value::Object(map) = parsed else {
        logger.error(&format!("{} must be a JSON object", env::PAGE_TOKENS), None);
        return HashMap::new();
    };

    let mut tokens = HashMap::with_capacity(map.len());
    for (page_id, token) in map {
        match token.as_str().map(str::trim).filter(|t| !t.is_empty()) {
            Some(token) => {
                tokens.insert(page_id, token.to_string());
            }
            None => logger.warn(
                "ignoring page token entry without a string value",
                Some(&serde_json::json!({ "page_id": page_id })),
            ),
        }
    }
    tokens
}

fn normalize_base_url(raw: &str) -> GatewayResult<String> {
    let parsed = Url::parse(raw.trim()).map_err(|_| {
        GatewayError::configuration(format!("{} must be an absolute URL", env::GRAPH_API_BASE))
    })?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(GatewayError::configuration(
            "Only http/https Graph API base URLs are supported",
        ));
    }
    Ok(parsed.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let config = GatewayConfig::from_lookup(&Logger::new("test"), lookup(&[])).expect("config");
        assert!(config.user_token.is_none());
        assert!(config.page_tokens.is_empty());
        assert_eq!(config.port, 10_000);
        assert_eq!(config.graph_api_base, "https://graph.facebook.com/v22.0");
        assert_eq!(config.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn reads_credentials_and_page_map() {
        let config = GatewayConfig::from_lookup(
            &Logger::new("test"),
            lookup(&[
                ("META_SYSTEM_USER_TOKEN", " user-tok "),
                ("META_PAGE_TOKENS", r#"{"111":"page-tok","222":7}"#),
                ("META_APP_ID", "app"),
                ("META_APP_SECRET", "shh"),
                ("PORT", "8080"),
                ("META_GRAPH_API_BASE", "http://127.0.0.1:9000/v22.0/"),
            ]),
        )
        .expect("config");
        assert_eq!(config.user_token.as_deref(), Some("user-tok"));
        assert_eq!(config.page_tokens.get("111").map(String::as_str), Some("page-tok"));
        assert!(!config.page_tokens.contains_key("222"));
        assert_eq!(config.port, 8080);
        assert_eq!(config.graph_api_base, "http://127.0.0.1:9000/v22.0");
    }

    #[test]
    fn malformed_page_tokens_degrade_to_empty_map() {
        let logger = Logger::new("test");
        assert!(parse_page_tokens("{not json", &logger).is_empty());
        assert!(parse_page_tokens("[\"a\"]", &logger).is_empty());
    }

    #[test]
    fn invalid_port_is_rejected() {
        let err = GatewayConfig::from_lookup(&Logger::new("test"), lookup(&[("PORT", "http")]))
            .expect_err("bad port");
        assert!(matches!(err, GatewayError::Configuration(_)));
    }
}
