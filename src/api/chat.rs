use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState, validation};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub prompt: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
pub struct TranslateRequest {
    pub text: String,
    pub target: String,
}

#[derive(Debug, Serialize)]
pub struct TranslateResponse {
    pub text: String,
    pub target: String,
}

/// POST /chat
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatResponse>>, ApiError> {
    let prompt = validation::validate_text("prompt", &payload.prompt)?;

    let reply = state.shared.chat.complete(prompt).await?;

    Ok(Json(ApiResponse::success(ChatResponse { reply })))
}

/// POST /translate
pub async fn translate(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<TranslateRequest>,
) -> Result<Json<ApiResponse<TranslateResponse>>, ApiError> {
    let text = validation::validate_text("text", &payload.text)?;
    let target = validation::validate_language(&payload.target)?;

    let text = state.shared.translator.translate(text, &target).await?;

    Ok(Json(ApiResponse::success(TranslateResponse { text, target })))
}
