mod common;

use common::{app_with, config_for};
use httpmock::prelude::*;
use meta_pages_mcp::mcp::http::router;
use meta_pages_mcp::mcp::server::McpServer;
use meta_pages_mcp::services::config::GatewayConfig;
use serde_json::{json, Value};

async fn rpc(server: &McpServer, request: Value) -> Value {
    let response = server
        .handle_payload(&request.to_string())
        .await
        .expect("response");
    serde_json::to_value(&response).expect("serialize")
}

#[tokio::test]
async fn tools_list_advertises_annotations_for_every_tool() {
    let server = McpServer::new(app_with(GatewayConfig::default()));
    let response = rpc(&server, json!({"jsonrpc": "2.0", "id": 1, "method": "tools/list"})).await;

    let tools = response["result"]["tools"].as_array().expect("tools");
    assert_eq!(tools.len(), 35);
    for tool in tools {
        let annotations = &tool["annotations"];
        for hint in ["readOnlyHint", "destructiveHint", "idempotentHint", "openWorldHint"] {
            assert!(annotations[hint].is_boolean(), "{} lacks {}", tool["name"], hint);
        }
        assert_eq!(tool["inputSchema"]["type"], "object");
    }

    let find = |name: &str| {
        tools
            .iter()
            .find(|tool| tool["name"] == name)
            .cloned()
            .expect("tool present")
    };
    assert_eq!(find("meta_list_pages")["annotations"]["readOnlyHint"], true);
    assert_eq!(find("meta_delete_page_post")["annotations"]["destructiveHint"], true);
    assert_eq!(find("meta_graph_api_call")["annotations"]["readOnlyHint"], false);
}

#[tokio::test]
async fn tools_call_returns_pretty_json_text() {
    let graph = MockServer::start();
    graph.mock(|when, then| {
        when.method(GET).path("/v22.0/me/accounts");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[{"id":"111","name":"Shop"}]}"#);
    });

    let server = McpServer::new(app_with(config_for(&graph)));
    let response = rpc(
        &server,
        json!({
            "jsonrpc": "2.0",
            "id": "call-1",
            "method": "tools/call",
            "params": {"name": "meta_list_pages", "arguments": {}}
        }),
    )
    .await;

    let text = response["result"]["content"][0]["text"].as_str().expect("text");
    assert!(text.contains('\n'), "result text is pretty-printed");
    let payload: Value = serde_json::from_str(text).expect("json");
    assert_eq!(payload, json!({"data": [{"id": "111", "name": "Shop"}]}));
}

#[tokio::test]
async fn http_transport_serves_mcp_and_health() {
    let server = McpServer::new(app_with(GatewayConfig::default()));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router(server)).await;
    });

    let client = reqwest::Client::new();
    let response: Value = client
        .post(format!("http://{}/mcp", addr))
        .header("content-type", "application/json")
        .body(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");
    assert_eq!(response["result"]["serverInfo"]["name"], "meta-pages-mcp");

    let notification = client
        .post(format!("http://{}/mcp", addr))
        .body(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .send()
        .await
        .expect("send");
    assert_eq!(notification.status().as_u16(), 202);

    let health: Value = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .expect("send")
        .json()
        .await
        .expect("json");
    assert_eq!(health["status"], "ok");
    assert!(health["log"]["info"].is_u64());
}
