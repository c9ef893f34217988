//! # persona
//!
//! An agent that answers visitors' questions as a named person, grounded in
//! that person's summary, resume and profile.
//!
//! ## Flow
//!
//! ```text
//! startup:  summary.txt ─┐
//!           resume.pdf  ─┼─ knowledge::load ─ prompt::build_prompt ─ system prompt
//!           Profile.pdf ─┘
//!
//! per turn: visitor ─ Agent ─ Gemini ─┬─ text ──────────────────────── visitor
//!                                     └─ record_user_details      ─┐
//!                                        record_unknown_question  ─┴─ Notifier (log + email)
//! ```

pub mod config;
pub mod error;
pub mod knowledge;
pub mod notifier;
pub mod prompt;
pub mod svckit;

use std::sync::Arc;

use agent_core::ToolRegistry;

pub use config::{DEFAULT_PERSONA_NAME, PersonaConfig};
pub use error::{PersonaError, Result};
pub use knowledge::{Knowledge, KnowledgeSources};
pub use notifier::{Delivery, EmailNotifier, Notifier, SmtpConfig};
pub use prompt::build_prompt;

/// Re-export tools for easy registration
pub mod tools {
    pub use crate::svckit::{RecordUnknownQuestionTool, RecordUserDetailsTool};
}

/// The fixed tool set, reporting through `notifier`
pub fn tool_registry(notifier: Arc<dyn Notifier>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(tools::RecordUserDetailsTool::new(notifier.clone()));
    registry.register(tools::RecordUnknownQuestionTool::new(notifier));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svckit::testing::RecordingNotifier;

    #[test]
    fn test_registry_holds_both_tools() {
        let registry = tool_registry(Arc::new(RecordingNotifier::default()));
        assert_eq!(
            registry.names(),
            vec!["record_unknown_question", "record_user_details"]
        );
    }

    #[tokio::test]
    async fn test_unregistered_tool_is_not_found() {
        let registry = tool_registry(Arc::new(RecordingNotifier::default()));
        let err = registry
            .invoke("send_calendar_invite", &agent_core::Arguments::new())
            .await
            .unwrap_err();
        assert_eq!(err.tool_payload(), "Tool 'send_calendar_invite' not implemented.");
    }
}
