//! AI chat endpoint.

use std::sync::Arc;

use axum::{Json, extract::State};
use qchain_ai::chat_or_apologise;

use crate::auth::CurrentSession;
use crate::dto::{ChatRequest, ChatResponse};
use crate::error::ApiError;
use crate::state::AppState;

/// POST /api/chat - One chat turn. Model failures become an apology, not an error.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    _current: CurrentSession,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    let prompt = req.prompt.trim();
    if prompt.is_empty() {
        return Err(ApiError::BadRequest("Prompt cannot be empty.".to_string()));
    }
    let reply = chat_or_apologise(state.generator.as_ref(), prompt).await;
    Ok(Json(ChatResponse { reply }))
}
