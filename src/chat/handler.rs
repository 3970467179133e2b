//! Chat handlers: `POST /chat`, `POST /analyze`, `GET /resources/:category`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;

use super::types::{AnalyzeRequest, AnalyzeResponse, ChatRequest, ChatResponse};
use crate::detection::resources::{get_emergency_resources_by_name, EmergencyResources};
use crate::server::AppState;
use crate::utilities::errors::ChatError;

type HandlerError = (StatusCode, Json<Value>);

/// Map a pipeline error onto an HTTP status and `{"error": ...}` body.
fn error_response(err: ChatError) -> HandlerError {
    let status = match &err {
        ChatError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
        ChatError::Generation(_) => StatusCode::BAD_GATEWAY,
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

// ============================================================================
// POST /chat
// ============================================================================

/// Run one conversational turn.
///
/// Request:  `ChatRequest` = `{ "message", "conversationHistory"?, "userId"?, "urbanLevel"? }`
/// Response: `ChatResponse` = `{ "text", "emotion", "voiceProfile", "mode", "crisisDetected", "crisisInfo" }`
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(request): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, HandlerError> {
    tracing::info!(
        user_id = request.user_id().unwrap_or("anonymous"),
        history = request.conversation_history.len(),
        "chat request"
    );

    match state.pipeline.process(&request).await {
        Ok(response) => {
            tracing::info!(
                mode = %response.mode,
                crisis = response.crisis_detected,
                emotion = %response.emotion,
                "chat response"
            );
            Ok(Json(response))
        }
        Err(e) => {
            tracing::error!(error = %e, "chat turn failed");
            Err(error_response(e))
        }
    }
}

// ============================================================================
// POST /analyze
// ============================================================================

/// Analysis of a single message, no generation.
pub async fn analyze_handler(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, HandlerError> {
    state
        .pipeline
        .analyze(&request.message, &request.user_history())
        .map(Json)
        .map_err(error_response)
}

// ============================================================================
// GET /resources/:category
// ============================================================================

/// Emergency resources by category name. Unknown names get the default set.
pub async fn resources_handler(Path(category): Path<String>) -> Json<EmergencyResources> {
    Json(get_emergency_resources_by_name(&category))
}
