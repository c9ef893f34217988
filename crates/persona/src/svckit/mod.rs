//! Service Kit - Agent Tools
//!
//! Contact-capture tools that implement `agent_core::Tool`. Both report
//! through a [`Notifier`](crate::notifier::Notifier).

mod record_unknown_question;
mod record_user_details;

pub use record_unknown_question::RecordUnknownQuestionTool;
pub use record_user_details::RecordUserDetailsTool;
