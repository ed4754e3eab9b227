use crate::constants::graph::ACCESS_TOKEN_PARAM;
use crate::constants::network::USER_AGENT;
use crate::errors::{GatewayError, GatewayResult};
use crate::services::config::GatewayConfig;
use crate::services::credentials::Credential;
use crate::services::logger::Logger;
use crate::utils::params::{render_params, Params};
use reqwest::{Client, Method};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    Read,
    Write,
    Remove,
}

impl Verb {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_uppercase().as_str() {
            "GET" => Some(Verb::Read),
            "POST" => Some(Verb::Write),
            "DELETE" => Some(Verb::Remove),
            _ => None,
        }
    }

    fn method(self) -> Method {
        match self {
            Verb::Read => Method::GET,
            Verb::Write => Method::POST,
            Verb::Remove => Method::DELETE,
        }
    }
}

impl fmt::Display for Verb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.method().as_str())
    }
}

/// Executes single Graph API calls and normalizes their responses.
///
/// Remote error payloads come back as `Ok({"error": message})`; only
/// transport-level failures are `Err`.
#[derive(Clone)]
pub struct GraphGateway {
    logger: Logger,
    config: Arc<GatewayConfig>,
}

impl GraphGateway {
    pub fn new(logger: Logger, config: Arc<GatewayConfig>) -> Self {
        Self {
            logger: logger.child("graph"),
            config,
        }
    }

    pub async fn get(
        &self,
        endpoint: &str,
        mut params: Params,
        credential: &Credential,
    ) -> GatewayResult<Value> {
        params.insert(
            ACCESS_TOKEN_PARAM.to_string(),
            Value::String(credential.token().to_string()),
        );
        let pairs = render_params(&params);
        self.send(Verb::Read, endpoint, &pairs, None, credential)
            .await
    }

    pub async fn post(
        &self,
        endpoint: &str,
        mut payload: Params,
        credential: &Credential,
    ) -> GatewayResult<Value> {
        payload.insert(
            ACCESS_TOKEN_PARAM.to_string(),
            Value::String(credential.token().to_string()),
        );
        let form = serde_urlencoded::to_string(render_params(&payload))
            .map_err(|err| GatewayError::validation(format!("body is not form-encodable: {}", err)))?;
        self.send(Verb::Write, endpoint, &[], Some(form), credential)
            .await
    }

    pub async fn delete(&self, endpoint: &str, credential: &Credential) -> GatewayResult<Value> {
        let pairs = vec![(
            ACCESS_TOKEN_PARAM.to_string(),
            credential.token().to_string(),
        )];
        self.send(Verb::Remove, endpoint, &pairs, None, credential)
            .await
    }

    async fn send(
        &self,
        verb: Verb,
        endpoint: &str,
        query: &[(String, String)],
        form: Option<String>,
        credential: &Credential,
    ) -> GatewayResult<Value> {
        let query: Vec<(&str, &str)> = query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        let url = graph_url(&self.config.graph_api_base, endpoint, &query)?;
        let client = build_client(self.config.request_timeout)?;

        let mut request = client.request(verb.method(), url);
        if let Some(form) = form {
            request = request
                .header(
                    reqwest::header::CONTENT_TYPE,
                    "application/x-www-form-urlencoded",
                )
                .body(form);
        }

        let started = Instant::now();
        let outcome = async {
            let response = request.send().await?;
            let status = response.status();
            let body: Value = response.json().await?;
            Ok::<_, reqwest::Error>((status, body))
        }
        .await;

        match outcome {
            Ok((status, body)) => {
                let normalized = normalize_response(body);
                self.logger.debug(
                    "graph call completed",
                    Some(&serde_json::json!({
                        "verb": verb.to_string(),
                        "endpoint": endpoint,
                        "principal": credential.principal().to_string(),
                        "status": status.as_u16(),
                        "remote_error": normalized.get("error").is_some(),
                        "duration_ms": started.elapsed().as_millis() as u64,
                    })),
                );
                Ok(normalized)
            }
            Err(err) => {
                let err = GatewayError::from(err);
                self.logger.warn(
                    "graph call failed",
                    Some(&serde_json::json!({
                        "verb": verb.to_string(),
                        "endpoint": endpoint,
                        "principal": credential.principal().to_string(),
                        "cause": err.to_string(),
                    })),
                );
                Err(err)
            }
        }
    }
}

/// Collapses a remote `{"error": {...}}` payload into `{"error": message}`;
/// anything else passes through verbatim.
pub fn normalize_response(body: Value) -> Value {
    let Some(error) = body.as_object().and_then(|obj| obj.get("error")) else {
        return body;
    };
    let message = error
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| match error {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        });
    serde_json::json!({ "error": message })
}

pub(crate) fn graph_url(base: &str, endpoint: &str, query: &[(&str, &str)]) -> GatewayResult<Url> {
    let endpoint = endpoint.trim().trim_start_matches('/');
    if endpoint.is_empty() {
        return Err(GatewayError::validation("endpoint must be a non-empty string"));
    }
    let mut url = Url::parse(&format!("{}/{}", base.trim_end_matches('/'), endpoint))
        .map_err(|_| GatewayError::validation(format!("Invalid Graph API endpoint: {}", endpoint)))?;
    if !query.is_empty() {
        url.query_pairs_mut().extend_pairs(query.iter().copied());
    }
    Ok(url)
}

/// One client per call: no connection pool outlives a single request.
pub(crate) fn build_client(timeout: Duration) -> GatewayResult<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|err| GatewayError::transport(format!("Failed to build HTTP client: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_extracts_error_message() {
        let body = serde_json::json!({"error": {"message": "X", "code": 190}});
        assert_eq!(normalize_response(body), serde_json::json!({"error": "X"}));
    }

    #[test]
    fn normalize_renders_error_object_without_message() {
        let body = serde_json::json!({"error": {"code": 100}});
        assert_eq!(
            normalize_response(body),
            serde_json::json!({"error": "{\"code\":100}"})
        );
    }

    #[test]
    fn normalize_passes_success_through() {
        let body = serde_json::json!({"data": [{"id": "1"}], "paging": {"cursors": {}}});
        assert_eq!(normalize_response(body.clone()), body);
        let array = serde_json::json!([1, 2]);
        assert_eq!(normalize_response(array.clone()), array);
    }

    #[test]
    fn graph_url_joins_and_encodes() {
        let url = graph_url(
            "https://graph.facebook.com/v22.0",
            "/123/feed",
            &[("fields", "id,likes.summary(true)"), ("access_token", "a b")],
        )
        .expect("url");
        assert_eq!(url.path(), "/v22.0/123/feed");
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0], ("fields".to_string(), "id,likes.summary(true)".to_string()));
        assert_eq!(pairs[1], ("access_token".to_string(), "a b".to_string()));
    }

    #[test]
    fn graph_url_rejects_empty_endpoint() {
        assert!(graph_url("https://graph.facebook.com/v22.0", " / ", &[]).is_err());
    }

    #[test]
    fn verb_parsing_is_case_insensitive() {
        assert_eq!(Verb::parse("get"), Some(Verb::Read));
        assert_eq!(Verb::parse("Post"), Some(Verb::Write));
        assert_eq!(Verb::parse("DELETE"), Some(Verb::Remove));
        assert_eq!(Verb::parse("PATCH"), None);
        assert_eq!(Verb::Write.to_string(), "POST");
    }
}
