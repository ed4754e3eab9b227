use crate::app::App;
use crate::errors::{GatewayError, GatewayResult};
use crate::mcp::server::{McpServer, SERVER_NAME, SERVER_VERSION};
use crate::services::config::GatewayConfig;
use crate::services::logger::Logger;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::json;
use std::net::SocketAddr;

/// Stateless MCP over HTTP: every `POST /mcp` carries one JSON-RPC message
/// and gets its response in the reply body.
pub fn router(server: McpServer) -> Router {
    Router::new()
        .route("/mcp", post(mcp_handler))
        .route("/health", get(health_handler))
        .with_state(server)
}

async fn mcp_handler(State(server): State<McpServer>, body: String) -> Response {
    match server.handle_payload(body.trim()).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

async fn health_handler(State(server): State<McpServer>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "server": SERVER_NAME,
        "version": SERVER_VERSION,
        "log": server.app().logger.stats(),
    }))
}

pub async fn serve(server: McpServer, port: u16) -> GatewayResult<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| GatewayError::transport(format!("Failed to bind {}: {}", addr, err)))?;
    server.app().logger.info(
        "serving MCP over HTTP",
        Some(&json!({ "addr": addr.to_string(), "endpoint": "/mcp" })),
    );
    axum::serve(listener, router(server))
        .await
        .map_err(|err| GatewayError::transport(format!("HTTP server error: {}", err)))
}

pub async fn run_http(logger: Logger, config: GatewayConfig) -> GatewayResult<()> {
    let port = config.port;
    let server = McpServer::new(App::initialize(logger, config)?);
    serve(server, port).await
}
