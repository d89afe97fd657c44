use crate::{error::ApiError, state::ServerState};
use axum::{body::Bytes, extract::State, Json};
use databank_core::AppError;
use databank_quota::QuotaStatus;
use serde::{Deserialize, Serialize};
use tracing::Instrument;

#[derive(Debug, Deserialize)]
struct ChatRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub reply: String,
    pub remaining: u32,
    pub limit: u32,
}

/// Current quota usage; no side effects.
pub async fn status(State(state): State<ServerState>) -> Json<QuotaStatus> {
    Json(state.quota.status())
}

/// Answer one question, charging the quota only on success.
pub async fn answer(
    State(state): State<ServerState>,
    body: Bytes,
) -> Result<Json<ChatReply>, ApiError> {
    let span = tracing::info_span!("chat", body_bytes = body.len());
    handle_answer(state, body).instrument(span).await
}

async fn handle_answer(state: ServerState, body: Bytes) -> Result<Json<ChatReply>, ApiError> {
    let check = state.quota.check();
    if !check.allowed {
        tracing::info!(limit = check.limit, "Rejected request, daily quota exhausted");
        return Err(AppError::QuotaExceeded { limit: check.limit }.into());
    }

    let message = parse_message(&body)?;
    let pipeline = state.pipeline()?;

    let answer = pipeline.run(&message).await?;

    state.quota.record();
    let status = state.quota.status();

    tracing::info!(
        mode = ?answer.mode,
        topics = ?answer.topics,
        remaining = status.remaining,
        "Answered chat request"
    );

    Ok(Json(ChatReply {
        reply: answer.reply,
        remaining: status.remaining,
        limit: status.limit,
    }))
}

fn parse_message(body: &[u8]) -> Result<String, ApiError> {
    let request: ChatRequest = serde_json::from_slice(body).map_err(|e| {
        tracing::debug!(error = %e, "Unparsable chat body");
        AppError::Validation("Message is required".to_string())
    })?;

    match request.message {
        Some(message) if !message.trim().is_empty() => Ok(message),
        _ => Err(AppError::Validation("Message is required".to_string()).into()),
    }
}
