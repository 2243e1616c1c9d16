//! Axum route handlers for the tutor HTTP server.
//!
//! # Routes
//!
//! - `GET    /`           - Service banner with the endpoint list
//! - `GET    /health`     - Returns `{"status": "healthy"}`
//! - `POST   /query`      - `{question}` → `AnswerResult`, 500 on failure
//! - `POST   /chat`       - `{message}` → `AnswerResult`, canned answer on failure
//! - `DELETE /chat/clear` - Acknowledges a history reset (nothing is stored)

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::gateway::CompletionGateway;
use crate::types::{AnswerResult, ChatMessage, Query};

/// Set to `true` on `/chat` responses that carry a canned answer.
pub const DEGRADED_HEADER: &str = "x-tutor-degraded";

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Completion pipeline, immutable after startup.
    pub gateway: Arc<CompletionGateway>,
}

impl AppState {
    pub fn new(gateway: CompletionGateway) -> Self {
        Self {
            gateway: Arc::new(gateway),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/query", post(query_handler))
        .route("/chat", post(chat_handler))
        .route("/chat/clear", delete(clear_chat_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET / - service banner.
async fn root_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "AI Tutor API is running!",
        "endpoints": ["/query", "/chat", "/health"],
        "version": crate::VERSION,
    }))
}

/// GET /health - liveness check. Never touches the upstream.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// POST /query - single-turn question answering.
///
/// Total upstream failure is a 500 with `{"detail", "kind"}`.
async fn query_handler(
    State(state): State<AppState>,
    Json(request): Json<Query>,
) -> Result<Json<AnswerResult>, (StatusCode, Json<Value>)> {
    tracing::debug!(question = %request.question, "Received query");

    state
        .gateway
        .answer(&request.question)
        .await
        .map(Json)
        .map_err(|e| {
            tracing::error!(kind = e.kind(), error = %e, "Query failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "detail": e.message(),
                    "kind": e.kind(),
                })),
            )
        })
}

/// POST /chat - conversational turn.
///
/// Always answers 200. On total upstream failure the body is a canned
/// `AnswerResult` (emotion `calm`, sources 0) and the degraded header is
/// set.
async fn chat_handler(State(state): State<AppState>, Json(request): Json<ChatMessage>) -> Response {
    tracing::debug!(message = %request.message, "Received chat message");

    let answer = state.gateway.answer_or_fallback(&request.message).await;
    if answer.is_degraded() {
        tracing::warn!("Chat failed, sending fallback answer");
        (
            [(
                HeaderName::from_static(DEGRADED_HEADER),
                HeaderValue::from_static("true"),
            )],
            Json(answer),
        )
            .into_response()
    } else {
        Json(answer).into_response()
    }
}

/// DELETE /chat/clear - no history is kept, so this only acknowledges.
async fn clear_chat_handler() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "cleared" }))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::gateway::testing::ScriptedLLM;
    use crate::gateway::DATA_POLICY_HELP;
    use crate::knowledge::Knowledge;
    use crate::llms::errors::CompletionError;
    use crate::types::Emotion;

    fn app_with(primary: ScriptedLLM, secondary: ScriptedLLM) -> Router {
        let gateway =
            CompletionGateway::new(Arc::new(primary), Arc::new(secondary), Knowledge::builtin());
        app_router(AppState::new(gateway))
    }

    fn healthy_app() -> Router {
        app_with(
            ScriptedLLM::answering("a", "AI means machines that learn. Great question!"),
            ScriptedLLM::answering("b", "unused"),
        )
    }

    fn failing_app(error: CompletionError) -> Router {
        app_with(
            ScriptedLLM::failing("a", error.clone()),
            ScriptedLLM::failing("b", error),
        )
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_root_lists_endpoints() {
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = healthy_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["message"], "AI Tutor API is running!");
        assert_eq!(json["endpoints"], serde_json::json!(["/query", "/chat", "/health"]));
    }

    #[tokio::test]
    async fn test_health_endpoint_ignores_upstream() {
        let app = failing_app(CompletionError::Network("down".into()));
        let request = Request::builder().uri("/health").body(Body::empty()).unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!({"status": "healthy"}));
    }

    #[tokio::test]
    async fn test_query_success() {
        let response = healthy_app()
            .oneshot(post_json("/query", serde_json::json!({"question": "What is AI?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["sources"], 1);
        assert_eq!(json["text"], "AI means machines that learn. Great question!");
        let emotion: Emotion = serde_json::from_value(json["emotion"].clone()).unwrap();
        assert!(Emotion::ALL.contains(&emotion));
        assert_eq!(emotion, Emotion::Happy);
    }

    #[tokio::test]
    async fn test_query_total_failure_is_500() {
        let app = failing_app(CompletionError::Upstream("Error code: 502 - bad gateway".into()));
        let response = app
            .oneshot(post_json("/query", serde_json::json!({"question": "What is AI?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let json = body_json(response).await;
        assert_eq!(json["detail"], "Error code: 502 - bad gateway");
        assert_eq!(json["kind"], "upstream_failure");
    }

    #[tokio::test]
    async fn test_chat_success_not_degraded() {
        let response = healthy_app()
            .oneshot(post_json("/chat", serde_json::json!({"message": "hello"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(DEGRADED_HEADER).is_none());
        assert_eq!(body_json(response).await["sources"], 1);
    }

    #[tokio::test]
    async fn test_chat_policy_failure_returns_instructions() {
        let app = failing_app(CompletionError::PolicyRejected(
            "Error code: 404 - No endpoints found matching your data policy".into(),
        ));
        let response = app
            .oneshot(post_json("/chat", serde_json::json!({"message": "What is AI?"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[DEGRADED_HEADER], "true");

        let json = body_json(response).await;
        assert_eq!(json["text"], DATA_POLICY_HELP);
        assert_eq!(json["emotion"], "calm");
        assert_eq!(json["sources"], 0);
    }

    #[tokio::test]
    async fn test_chat_generic_failure_apologizes() {
        let app = failing_app(CompletionError::Network("connection refused".into()));
        let response = app
            .oneshot(post_json("/chat", serde_json::json!({"message": "hi"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[DEGRADED_HEADER], "true");

        let json = body_json(response).await;
        assert_eq!(json["text"], "I encountered an error: connection refused. Please try again!");
        assert_eq!(json["emotion"], "calm");
        assert_eq!(json["sources"], 0);
    }

    #[tokio::test]
    async fn test_clear_chat_acknowledges() {
        let request = Request::builder()
            .method("DELETE")
            .uri("/chat/clear")
            .body(Body::empty())
            .unwrap();
        let response = healthy_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["status"], "cleared");
    }

    #[tokio::test]
    async fn test_query_rejects_missing_field() {
        let response = healthy_app()
            .oneshot(post_json("/query", serde_json::json!({"message": "wrong field"})))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }
}
