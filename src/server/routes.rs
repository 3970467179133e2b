//! Axum router and shared state for the companion HTTP server.

use std::sync::Arc;

use axum::{
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::chat::handler::{analyze_handler, chat_handler, resources_handler};
use crate::chat::ChatPipeline;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ChatPipeline>,
}

impl AppState {
    pub fn new(pipeline: ChatPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/chat", post(chat_handler))
        .route("/analyze", post(analyze_handler))
        .route("/resources/:category", get(resources_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// GET /health: liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "dialogos",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llms::base_llm::{LLMMessage, TextGenerator};
    use crate::memory::InMemoryStore;
    use crate::telemetry::TracingSink;
    use crate::utilities::errors::GenerationError;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::Value;
    use tower::ServiceExt;

    struct EchoGenerator(Option<&'static str>);

    #[async_trait]
    impl TextGenerator for EchoGenerator {
        async fn generate(&self, _messages: &[LLMMessage]) -> Result<String, GenerationError> {
            match self.0 {
                Some(reply) => Ok(reply.to_string()),
                None => Err(GenerationError::RetriesExhausted {
                    attempts: 3,
                    last: "connection refused".into(),
                }),
            }
        }

        fn model(&self) -> &str {
            "echo"
        }
    }

    fn app(reply: Option<&'static str>) -> Router {
        let pipeline = ChatPipeline::new(
            Arc::new(EchoGenerator(reply)),
            Arc::new(InMemoryStore::new()),
            Arc::new(TracingSink),
        );
        app_router(AppState::new(pipeline))
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn read_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app(Some("ok")).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "dialogos");
    }

    #[tokio::test]
    async fn test_chat_returns_camel_case_reply() {
        let request = post_json(
            "/chat",
            serde_json::json!({
                "message": "Hoy fue un buen día",
                "conversationHistory": [{"sender": "user", "text": "Hola"}],
                "urbanLevel": 30
            }),
        );

        let response = app(Some("Qué bueno, me alegra leerte así."))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["text"], "Qué bueno, me alegra leerte así.");
        assert_eq!(json["mode"], "ORIENTACION");
        assert_eq!(json["crisisDetected"], false);
        assert!(json["crisisInfo"].is_null());
        assert!(json["voiceProfile"]["rate"].is_number());
    }

    #[tokio::test]
    async fn test_chat_crisis_includes_resources() {
        let request = post_json("/chat", serde_json::json!({"message": "No puedo más, quiero morir"}));

        let response = app(Some("Aquí estoy contigo. No estás solo en esto."))
            .oneshot(request)
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["crisisDetected"], true);
        assert_eq!(json["mode"], "CONTENCION");
        assert_eq!(json["crisisInfo"]["severity"], "critical");
        assert_eq!(json["crisisInfo"]["category"], "suicide");
        assert_eq!(json["crisisInfo"]["resources"]["resources"][0]["number"], "01 800 113 113");
    }

    #[tokio::test]
    async fn test_chat_rejects_invalid_requests() {
        let response = app(Some("ok"))
            .oneshot(post_json("/chat", serde_json::json!({"message": ""})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = read_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("message"));

        let response = app(Some("ok"))
            .oneshot(post_json(
                "/chat",
                serde_json::json!({"message": "Hola", "urbanLevel": 150}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_chat_generation_failure_is_bad_gateway() {
        let response = app(None)
            .oneshot(post_json("/chat", serde_json::json!({"message": "Hola"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = read_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_analyze_endpoint() {
        let response = app(None)
            .oneshot(post_json(
                "/analyze",
                serde_json::json!({"message": "Ya he hecho de todo, pero bueno"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["mode"], "CONTENCION");
        assert_eq!(json["emotional"]["isExhausted"], true);
        assert_eq!(json["rules"]["maxQuestions"], 0);
        assert_eq!(json["crisis"]["detected"], false);
    }

    #[tokio::test]
    async fn test_resources_endpoint() {
        let request = Request::builder()
            .uri("/resources/self_harm")
            .body(Body::empty())
            .unwrap();

        let response = app(None).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = read_json(response).await;
        assert_eq!(json["title"], "Apoyo Profesional Disponible");
        assert_eq!(json["resources"].as_array().unwrap().len(), 3);
    }
}
