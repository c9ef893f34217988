//! Record User Details Tool
//!
//! Captures a visitor's contact details so the persona can follow up.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use agent_core::{
    AgentError, Arguments, Result as CoreResult, Tool, ToolSchema,
    tool::{ParameterSchema, arg_text},
};

use crate::notifier::Notifier;

const DEFAULT_NAME: &str = "Name not provided";
const DEFAULT_NOTES: &str = "notes not provided";

/// Tool for recording an interested visitor's email
pub struct RecordUserDetailsTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUserDetailsTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUserDetailsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "record_user_details".into(),
            description: "Records user details including email, name, and notes. Used for capturing user interest or contact information.".into(),
            parameters: vec![
                ParameterSchema::required("email", "The user's email address (required)."),
                ParameterSchema::optional(
                    "name",
                    "The user's name (optional, defaults to 'Name not provided').",
                    DEFAULT_NAME,
                ),
                ParameterSchema::optional(
                    "notes",
                    "Any additional notes or details provided by the user (optional, defaults to 'notes not provided').",
                    DEFAULT_NOTES,
                ),
            ],
        }
    }

    async fn execute(&self, arguments: &Arguments) -> CoreResult<Value> {
        let email = arg_text(arguments, "email")
            .ok_or_else(|| AgentError::ToolValidation("Missing email".into()))?;
        let name = arg_text(arguments, "name").unwrap_or_else(|| DEFAULT_NAME.into());
        let notes = arg_text(arguments, "notes").unwrap_or_else(|| DEFAULT_NOTES.into());

        self.notifier
            .notify(
                &format!("Recording interest from {name} with email {email} and notes {notes}"),
                "Recording User Details",
            )
            .await;

        Ok(json!({ "recorded": "ok" }))
    }
}
