//! HTTP Handlers

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tracing::Instrument;

use agent_core::{AgentError, ChatMessage};

use crate::state::AppState;

// ============================================================================
// Request / Response Types
// ============================================================================

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub persona: String,
    pub provider: String,
    pub model: String,
    pub provider_connected: bool,
    pub tools: Vec<String>,
    pub knowledge_loaded_at: String,
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let provider = state.agent.provider();
    let provider_connected = provider.health_check().await.unwrap_or(false);

    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
        persona: state.persona_name.to_string(),
        provider: provider.name().to_string(),
        model: provider.model().to_string(),
        provider_connected,
        tools: state
            .agent
            .tools()
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
        knowledge_loaded_at: state.knowledge_loaded_at.to_string(),
    })
}

/// One chat turn: `(message, history)` in, reply text out
pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, (StatusCode, Json<ErrorResponse>)> {
    let turn_id = uuid::Uuid::new_v4();
    let span = tracing::info_span!("turn", %turn_id, history = payload.history.len());

    let reply = state
        .agent
        .respond(&payload.message, &payload.history)
        .instrument(span)
        .await
        .map_err(|e| {
            tracing::error!(%turn_id, "Agent error: {}", e);
            error_response(&e)
        })?;

    Ok(Json(ChatResponse { message: reply }))
}

fn error_response(e: &AgentError) -> (StatusCode, Json<ErrorResponse>) {
    let (status, code) = if e.is_provider_error() {
        (StatusCode::BAD_GATEWAY, "PROVIDER_ERROR")
    } else {
        (StatusCode::INTERNAL_SERVER_ERROR, "AGENT_ERROR")
    };

    (
        status,
        Json(ErrorResponse {
            error: e.user_message(),
            code: code.into(),
        }),
    )
}
