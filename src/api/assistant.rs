use axum::{Json, extract::State};
use serde::Deserialize;
use std::sync::Arc;

use super::{ApiError, ApiResponse, AppState};
use crate::db::AnalyticsEvent;
use crate::services::ChatReply;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: String,
}

/// POST /assistant/chat
///
/// Public: the widget runs before anyone logs in. Each exchange counts an
/// assistant interaction; tracking failures never break the reply.
pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ApiResponse<ChatReply>>, ApiError> {
    if payload.message.trim().is_empty() {
        return Err(ApiError::validation("Message is required"));
    }

    let reply = state.assist.chat(&payload.message).await;

    if let Err(err) = state
        .store
        .track_event(AnalyticsEvent::AssistantInteraction)
        .await
    {
        tracing::debug!("Failed to count assistant interaction: {err:#}");
    }

    Ok(Json(ApiResponse::success(reply)))
}
