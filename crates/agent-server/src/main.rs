//! persona-agent HTTP Server
//!
//! Axum-based chat driver. Loads the persona's knowledge at startup, builds
//! the system prompt once, and serves one chat turn per request.

mod handlers;
mod state;

use std::sync::Arc;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use agent_core::{AgentBuilder, LlmProvider};
use agent_runtime::GeminiProvider;
use persona::{EmailNotifier, PersonaConfig, build_prompt, knowledge, tool_registry};

use crate::handlers::{chat_handler, health_check};
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        .route("/api/chat", post(chat_handler))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Values in .env win over the inherited environment
    dotenvy::dotenv_override().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = PersonaConfig::from_env();

    // Missing documents are fatal: nothing is served without the knowledge
    let knowledge = knowledge::load(&config.sources)
        .context("Could not load persona knowledge documents")?;
    let system_prompt = build_prompt(&config.name, &knowledge);

    let notifier = EmailNotifier::new(config.smtp.clone());
    if notifier.is_configured() {
        tracing::info!("✓ Email notifications configured");
    } else {
        tracing::warn!("⚠ Email notifications disabled - notifications are only logged");
        tracing::warn!("  Set CLONE_EMAIL and CLONE_PASSWORD in .env");
    }

    let tools = tool_registry(Arc::new(notifier));
    tracing::info!("Registered {} tools:", tools.len());
    for name in tools.names() {
        tracing::info!("  • {}", name);
    }

    let provider = Arc::new(
        GeminiProvider::from_env(tools.schemas()).context("Could not configure Gemini")?,
    );
    match provider.health_check().await {
        Ok(true) => tracing::info!("✓ Connected to Gemini ({})", provider.model()),
        Ok(false) | Err(_) => {
            tracing::warn!("⚠ Gemini not reachable - chat turns will fail");
        }
    }

    let mut builder = AgentBuilder::new()
        .provider(provider)
        .tools(tools)
        .system_prompt(system_prompt);
    if let Some(max) = std::env::var("AGENT_MAX_TOOL_ROUNDS")
        .ok()
        .and_then(|v| v.parse().ok())
    {
        builder = builder.max_iterations(max);
    }
    let agent = builder.build()?;

    let state = AppState {
        agent: Arc::new(agent),
        persona_name: config.name.as_str().into(),
        knowledge_loaded_at: knowledge.loaded_at.to_rfc3339().into(),
    };

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("🚀 {} is chatting on http://{}", config.name, addr);
    tracing::info!("══════════════════════════════════════════════════");
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health    - Health check");
    tracing::info!("  POST /api/chat  - Send message with history");

    axum::serve(listener, router(state)).await?;

    Ok(())
}
