//! Record Unknown Question Tool

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use agent_core::{
    AgentError, Arguments, Result as CoreResult, Tool, ToolSchema,
    tool::{ParameterSchema, arg_text},
};

use crate::notifier::Notifier;

/// Tool for recording questions the persona could not answer
pub struct RecordUnknownQuestionTool {
    notifier: Arc<dyn Notifier>,
}

impl RecordUnknownQuestionTool {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }
}

#[async_trait]
impl Tool for RecordUnknownQuestionTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "record_unknown_question".into(),
            description: "Records a question that the agent does not know the answer to, for future reference or training.".into(),
            parameters: vec![ParameterSchema::required(
                "question",
                "The question that the agent could not answer.",
            )],
        }
    }

    async fn execute(&self, arguments: &Arguments) -> CoreResult<Value> {
        let question = arg_text(arguments, "question")
            .ok_or_else(|| AgentError::ToolValidation("Missing question".into()))?;

        self.notifier
            .notify(
                &format!("Recording {question} that I don't know the answer to"),
                "Recording Unknown Question",
            )
            .await;

        Ok(json!({ "recorded": "ok" }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::svckit::testing::RecordingNotifier;

    #[tokio::test]
    async fn test_records_question() {
        let notifier = Arc::new(RecordingNotifier::default());
        let tool = RecordUnknownQuestionTool::new(notifier.clone());

        let arguments = json!({ "question": "What is your favourite editor?" })
            .as_object()
            .cloned()
            .unwrap();
        let response = tool.execute(&arguments).await.unwrap();

        assert_eq!(response, json!({ "recorded": "ok" }));
        assert_eq!(
            notifier.sent(),
            vec![(
                "Recording What is your favourite editor? that I don't know the answer to".to_string(),
                "Recording Unknown Question".to_string()
            )]
        );
    }
}
