#![allow(dead_code)]

use httpmock::MockServer;
use meta_pages_mcp::app::App;
use meta_pages_mcp::services::config::GatewayConfig;
use meta_pages_mcp::services::logger::Logger;
use once_cell::sync::Lazy;
use serde_json::Value;
use std::collections::HashMap;
use tokio::sync::Mutex;

pub static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

pub const USER_TOKEN: &str = "user-tok";
pub const STATIC_PAGE_ID: &str = "111";
pub const STATIC_PAGE_TOKEN: &str = "static-page-tok";

/// Path of a Graph API object on the mock server.
pub fn graph_path(endpoint: &str) -> String {
    format!("/v22.0/{}", endpoint)
}

/// Config pointed at `server`, with a user token and one static page token.
pub fn config_for(server: &MockServer) -> GatewayConfig {
    let mut page_tokens = HashMap::new();
    page_tokens.insert(STATIC_PAGE_ID.to_string(), STATIC_PAGE_TOKEN.to_string());
    GatewayConfig {
        user_token: Some(USER_TOKEN.to_string()),
        page_tokens,
        ..GatewayConfig::default()
    }
    .with_graph_api_base(&format!("{}/v22.0", server.base_url()))
    .expect("mock base url")
}

pub fn app_with(config: GatewayConfig) -> App {
    App::initialize(Logger::new("test"), config).expect("app")
}

pub async fn call_tool(app: &App, tool: &str, args: Value) -> Value {
    app.tool_executor
        .execute(tool, args)
        .await
        .expect("known tool")
}
