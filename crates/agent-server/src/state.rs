//! Application State

use std::sync::Arc;

use agent_core::Agent;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Agent with the persona prompt and tools baked in
    pub agent: Arc<Agent>,

    /// Who the agent speaks as
    pub persona_name: Arc<str>,

    /// When the knowledge documents were read (RFC 3339)
    pub knowledge_loaded_at: Arc<str>,
}
