mod common;

use common::{app_with, call_tool, config_for, graph_path, STATIC_PAGE_ID, STATIC_PAGE_TOKEN};
use httpmock::prelude::*;
use serde_json::json;

const REMOTE_ERROR: &str =
    r#"{"error":{"message":"Unsupported request","type":"GraphMethodException","code":100}}"#;

#[tokio::test]
async fn remote_errors_have_one_shape_for_every_verb() {
    let server = MockServer::start();
    for method in [GET, POST, DELETE] {
        server.mock(|when, then| {
            when.method(method).path(graph_path("broken"));
            then.status(400)
                .header("content-type", "application/json")
                .body(REMOTE_ERROR);
        });
    }

    let app = app_with(config_for(&server));
    for verb in ["GET", "POST", "DELETE"] {
        let result = call_tool(
            &app,
            "meta_graph_api_call",
            json!({"endpoint": "broken", "method": verb}),
        )
        .await;
        assert_eq!(result, json!({"error": "Unsupported request"}), "verb {}", verb);
    }
}

#[tokio::test]
async fn non_json_body_is_a_transport_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(graph_path("me"));
        then.status(502)
            .header("content-type", "text/html")
            .body("<html>Bad Gateway</html>");
    });

    let app = app_with(config_for(&server));
    let result = call_tool(&app, "meta_graph_api_call", json!({"endpoint": "me"})).await;

    let message = result["error"].as_str().expect("error text");
    assert!(message.starts_with("Graph API returned a non-JSON body"), "{}", message);
}

#[tokio::test]
async fn create_post_without_link_sends_message_and_token_only() {
    let server = MockServer::start();
    let feed = server.mock(|when, then| {
        when.method(POST)
            .path(graph_path("111/feed"))
            .header("content-type", "application/x-www-form-urlencoded")
            .body_includes("message=hello")
            .body_includes(format!("access_token={}", STATIC_PAGE_TOKEN))
            .body_excludes("link=");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"111_999"}"#);
    });

    let app = app_with(config_for(&server));
    let variants = [
        json!({"page_id": STATIC_PAGE_ID, "message": "hello"}),
        json!({"page_id": STATIC_PAGE_ID, "message": "hello", "link": ""}),
    ];
    for args in variants {
        let result = call_tool(&app, "meta_create_page_post", args).await;
        assert_eq!(result, json!({"id": "111_999"}));
    }
    assert_eq!(feed.calls(), 2);
}

#[tokio::test]
async fn create_post_with_link_form_encodes_it() {
    let server = MockServer::start();
    let feed = server.mock(|when, then| {
        when.method(POST)
            .path(graph_path("111/feed"))
            .body_includes("message=launch+day")
            .body_includes("link=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"id":"111_1000"}"#);
    });

    let app = app_with(config_for(&server));
    let result = call_tool(
        &app,
        "meta_create_page_post",
        json!({"page_id": STATIC_PAGE_ID, "message": "launch day", "link": "https://example.com/a?b=1"}),
    )
    .await;

    assert_eq!(result, json!({"id": "111_1000"}));
    assert_eq!(feed.calls(), 1);
}

#[tokio::test]
async fn delete_carries_token_in_query_only() {
    let server = MockServer::start();
    let delete = server.mock(|when, then| {
        when.method(DELETE)
            .path(graph_path("111_42"))
            .query_param("access_token", STATIC_PAGE_TOKEN);
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"success":true}"#);
    });

    let app = app_with(config_for(&server));
    let result = call_tool(
        &app,
        "meta_delete_page_post",
        json!({"post_id": "111_42", "page_id": STATIC_PAGE_ID}),
    )
    .await;

    assert_eq!(result, json!({"success": true}));
    assert_eq!(delete.calls(), 1);
}

#[tokio::test]
async fn hide_comment_defaults_to_hidden_and_accepts_unhide() {
    let server = MockServer::start();
    let hide = server.mock(|when, then| {
        when.method(POST)
            .path(graph_path("c1"))
            .body_includes("is_hidden=true");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"success":true}"#);
    });
    let unhide = server.mock(|when, then| {
        when.method(POST)
            .path(graph_path("c1"))
            .body_includes("is_hidden=false");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"success":true}"#);
    });

    let app = app_with(config_for(&server));
    call_tool(&app, "meta_hide_comment", json!({"comment_id": "c1", "page_id": STATIC_PAGE_ID})).await;
    call_tool(
        &app,
        "meta_hide_ad_comment",
        json!({"comment_id": "c1", "page_id": STATIC_PAGE_ID, "is_hidden": false}),
    )
    .await;

    assert_eq!(hide.calls(), 1);
    assert_eq!(unhide.calls(), 1);
}

#[tokio::test]
async fn send_message_encodes_recipient_and_text_as_json() {
    let server = MockServer::start();
    let messages = server.mock(|when, then| {
        when.method(POST)
            .path(graph_path("111/messages"))
            .body_includes("recipient=%7B%22id%22%3A%22psid-9%22%7D")
            .body_includes("message=%7B%22text%22%3A%22thanks%22%7D")
            .body_includes("messaging_type=RESPONSE");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"recipient_id":"psid-9","message_id":"m_1"}"#);
    });

    let app = app_with(config_for(&server));
    let result = call_tool(
        &app,
        "meta_send_message",
        json!({"page_id": STATIC_PAGE_ID, "recipient_id": "psid-9", "message": "thanks"}),
    )
    .await;

    assert_eq!(result["message_id"], "m_1");
    assert_eq!(messages.calls(), 1);
}

#[tokio::test]
async fn listing_limits_are_clamped() {
    let server = MockServer::start();
    let media = server.mock(|when, then| {
        when.method(GET)
            .path(graph_path("ig-1/media"))
            .query_param("limit", "50");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[]}"#);
    });
    let comments = server.mock(|when, then| {
        when.method(GET)
            .path(graph_path("111_5/comments"))
            .query_param("limit", "1");
        then.status(200)
            .header("content-type", "application/json")
            .body(r#"{"data":[]}"#);
    });

    let app = app_with(config_for(&server));
    call_tool(
        &app,
        "meta_get_ig_media",
        json!({"ig_account_id": "ig-1", "page_id": STATIC_PAGE_ID, "limit": 500}),
    )
    .await;
    call_tool(
        &app,
        "meta_get_post_comments",
        json!({"post_id": "111_5", "page_id": STATIC_PAGE_ID, "limit": 0}),
    )
    .await;

    assert_eq!(media.calls(), 1);
    assert_eq!(comments.calls(), 1);
}
