//! HTTP Endpoints
//!
//! REST surface over the tool registry.

use axum::extract::{Path, State};
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use bank_agent_core::ToolOutput;
use bank_agent_tools::ToolExecutor;

use crate::state::AppState;
use crate::ServerError;

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let server = &state.config.server;
    let cors_layer = build_cors_layer(&server.cors_origins, server.cors_enabled);

    let mut router = Router::new()
        .route("/api/tools", get(list_tools))
        .route("/api/tools/:name", post(call_tool))
        .route("/health", get(health_check));

    if let Some(cors) = cors_layer {
        router = router.layer(cors);
    }

    router
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(state)
}

/// CORS layer from configured origins; `None` when CORS is disabled
fn build_cors_layer(origins: &[String], enabled: bool) -> Option<CorsLayer> {
    if !enabled {
        tracing::info!("CORS disabled");
        return None;
    }

    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if origins.is_empty() {
        tracing::info!("No CORS origins configured, allowing any origin");
        return Some(base.allow_origin(Any));
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    if parsed_origins.is_empty() {
        tracing::error!("All configured CORS origins are invalid, allowing any origin");
        return Some(base.allow_origin(Any));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    Some(base.allow_origin(parsed_origins))
}

/// List tools
async fn list_tools(State(state): State<AppState>) -> Json<Value> {
    let tools: Vec<Value> = state
        .tools
        .list_tools()
        .into_iter()
        .map(|t| {
            json!({
                "name": t.name,
                "description": t.description,
                "input_schema": t.input_schema,
            })
        })
        .collect();

    Json(json!({ "tools": tools }))
}

/// Tool call request
#[derive(Debug, Deserialize)]
struct ToolCallRequest {
    #[serde(default = "empty_arguments")]
    arguments: Value,
}

fn empty_arguments() -> Value {
    json!({})
}

/// Call tool. Tool-level failures come back as `is_error: true` with 200.
async fn call_tool(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<ToolCallRequest>,
) -> Result<Json<ToolOutput>, ServerError> {
    if !state.tools.has(&name) {
        return Err(ServerError::ToolNotFound(name));
    }

    tracing::debug!(tool = %name, "Tool call received");

    Ok(Json(state.tools.call(&name, request.arguments).await))
}

/// Health check
async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "tools": state.tools.len(),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use bank_agent_config::Settings;
    use bank_agent_tools::{create_banking_registry, StubBankApi, ToolServices};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn app() -> Router {
        let settings = Settings::default();
        let services = ToolServices::with_api(Arc::new(StubBankApi::new()), &settings);
        create_router(AppState::new(settings, create_banking_registry(services)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["tools"], 14);
    }

    #[tokio::test]
    async fn test_list_tools() {
        let response = app()
            .oneshot(Request::builder().uri("/api/tools").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_json(response).await;
        let tools = body["tools"].as_array().unwrap();

        assert_eq!(tools.len(), 14);
        assert_eq!(tools[0]["name"], "block_atm_card");
        assert_eq!(tools[0]["input_schema"]["type"], "object");
    }

    #[tokio::test]
    async fn test_call_tool() {
        let response = app()
            .oneshot(post_json(
                "/api/tools/get_account_balance",
                json!({"arguments": {"customer_id": "CUST001"}}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["is_error"], false);
        assert_eq!(body["content"][0]["type"], "text");
        assert_eq!(
            body["content"][0]["text"],
            "Account balance for XXXX4521: ₹125,000.50"
        );
    }

    #[tokio::test]
    async fn test_call_tool_bad_arguments() {
        let response = app()
            .oneshot(post_json("/api/tools/verify_otp", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["is_error"], true);
        assert_eq!(body["content"][0]["text"], "customer_id is required");
    }

    #[tokio::test]
    async fn test_unknown_tool() {
        let response = app()
            .oneshot(post_json("/api/tools/transfer_funds", json!({"arguments": {}})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            body_json(response).await["error"],
            "Tool not found: transfer_funds"
        );
    }

    #[test]
    fn test_cors_layer_selection() {
        assert!(build_cors_layer(&[], false).is_none());
        assert!(build_cors_layer(&[], true).is_some());
        assert!(build_cors_layer(&["https://agent.swiftbank.example".to_string()], true).is_some());
    }
}
