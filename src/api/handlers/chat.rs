use axum::{extract::State, Json};
use crate::state::AppState;
use crate::api::dtos::requests::ChatRequest;
use crate::api::dtos::responses::ChatResponse;
use crate::domain::services::assistant::{validate_history, SYSTEM_PROMPT};
use crate::error::AppError;
use std::sync::Arc;

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let llm = state.llm_service.as_ref()
        .ok_or(AppError::Unavailable("Chat assistant is not configured".into()))?;

    validate_history(&payload.messages)?;

    let content = llm.chat(SYSTEM_PROMPT, &payload.messages).await?;
    Ok(Json(ChatResponse { role: "assistant", content }))
}
