//! Chat endpoints. One orchestrator, one transcript, one message in flight.

use super::ApiError;
use crate::AppState;
use axum::extract::{Json, State};

#[derive(serde::Deserialize)]
pub(crate) struct ChatRequest {
    message: String,
}

/// POST /api/v1/chat
pub(crate) async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<axum::Json<serde_json::Value>, ApiError> {
    tracing::info!(target: "cultura::chat", chars = req.message.chars().count(), "chat request received");
    let reply = state.chat.submit(&req.message).await?;
    Ok(axum::Json(serde_json::json!({
        "message": reply,
        "state": state.chat.state(),
    })))
}

/// GET /api/v1/chat/transcript
pub(crate) async fn transcript(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({
        "messages": state.chat.transcript(),
        "state": state.chat.state(),
    }))
}

/// GET /api/v1/chat/samples
pub(crate) async fn samples(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "questions": state.chat.resolver().sample_questions() }))
}

/// GET /api/v1/topics
pub(crate) async fn topics(State(state): State<AppState>) -> axum::Json<serde_json::Value> {
    axum::Json(serde_json::json!({ "topics": state.chat.resolver().knowledge_base().topics() }))
}
