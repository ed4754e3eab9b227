mod common;

use common::{app_with, call_tool, config_for, graph_path, STATIC_PAGE_ID, STATIC_PAGE_TOKEN, USER_TOKEN};
use httpmock::prelude::*;
use meta_pages_mcp::services::config::GatewayConfig;
use serde_json::json;

#[tokio::test]
async fn static_page_token_skips_exchange() {
    let server = MockServer::start();
    let exchange = server.mock(|when, then| {
        when.method(GET)
            .path(graph_path(STATIC_PAGE_ID))
            .query_param("fields", "access_token");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"access_token":"should-not-be-used"}"#);
    });
    let info = server.mock(|when, then| {
        when.method(GET)
            .path(graph_path(STATIC_PAGE_ID))
            .query_param("access_token", STATIC_PAGE_TOKEN);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"111","name":"Static Page"}"#);
    });

    let app = app_with(config_for(&server));
    let result = call_tool(&app, "meta_get_page_info", json!({"page_id": STATIC_PAGE_ID})).await;

    assert_eq!(result, json!({"id": "111", "name": "Static Page"}));
    assert_eq!(exchange.calls(), 0);
    assert_eq!(info.calls(), 1);
}

#[tokio::test]
async fn unmapped_page_exchanges_user_token_on_every_call() {
    let server = MockServer::start();
    let exchange = server.mock(|when, then| {
        when.method(GET)
            .path(graph_path("222"))
            .query_param("fields", "access_token")
            .query_param("access_token", USER_TOKEN);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"access_token":"exchanged-tok","id":"222"}"#);
    });
    let feed = server.mock(|when, then| {
        when.method(GET)
            .path(graph_path("222/feed"))
            .query_param("access_token", "exchanged-tok")
            .query_param("limit", "10");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[]}"#);
    });

    let app = app_with(config_for(&server));
    for _ in 0..2 {
        let result = call_tool(&app, "meta_get_page_posts", json!({"page_id": "222"})).await;
        assert_eq!(result, json!({"data": []}));
    }

    assert_eq!(exchange.calls(), 2);
    assert_eq!(feed.calls(), 2);
}

#[tokio::test]
async fn exchange_without_access_token_fails_the_tool() {
    let server = MockServer::start();
    let exchange = server.mock(|when, then| {
        when.method(GET)
            .path(graph_path("333"))
            .query_param("fields", "access_token");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"333"}"#);
    });
    let feed = server.mock(|when, then| {
        when.method(GET).path(graph_path("333/feed"));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[]}"#);
    });

    let app = app_with(config_for(&server));
    let result = call_tool(&app, "meta_get_page_posts", json!({"page_id": "333"})).await;

    assert_eq!(
        result,
        json!({"error": "Could not get page token for 333: No access_token returned for page 333"})
    );
    assert_eq!(exchange.calls(), 1);
    assert_eq!(feed.calls(), 0);
}

#[tokio::test]
async fn exchange_remote_error_is_carried_in_the_cause() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path(graph_path("444"))
            .query_param("fields", "access_token");
        then.status(400)
            .header("content-type", "application/json")
            .body(r#"{"error":{"message":"Invalid OAuth access token.","type":"OAuthException","code":190}}"#);
    });

    let app = app_with(config_for(&server));
    let result = call_tool(&app, "meta_get_lead_forms", json!({"page_id": "444"})).await;

    assert_eq!(
        result,
        json!({"error": "Could not get page token for 444: Invalid OAuth access token."})
    );
}

#[tokio::test]
async fn missing_user_token_fails_user_tools_without_network() {
    let server = MockServer::start();
    let accounts = server.mock(|when, then| {
        when.method(GET).path(graph_path("me/accounts"));
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[]}"#);
    });

    let config = GatewayConfig::default()
        .with_graph_api_base(&format!("{}/v22.0", server.base_url()))
        .expect("base");
    let app = app_with(config);
    let result = call_tool(&app, "meta_list_pages", json!({})).await;

    assert_eq!(result, json!({"error": "META_SYSTEM_USER_TOKEN env var is not set"}));
    assert_eq!(accounts.calls(), 0);
}
