//! Conversation Messages
//!
//! Chat history as the front-end records it. These are translated into the
//! provider's schema on every turn; see [`crate::provider::Content`].

use serde::{Deserialize, Serialize};

use crate::tool::{ToolCall, ToolResult};

/// Role of a message sender
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// User input
    User,
    /// Assistant (LLM) response
    Assistant,
    /// Tool result recorded by the front-end
    Tool,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Tool => write!(f, "tool"),
        }
    }
}

/// A single message in the chat history
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Message role
    pub role: Role,

    /// Text content
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,

    /// Tool calls the assistant made in this turn
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,

    /// Tool responses (tool role only), replayed verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_results: Option<Vec<ToolResult>>,
}

impl ChatMessage {
    /// Create a new message
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: Some(content.into()),
            tool_calls: None,
            tool_results: None,
        }
    }

    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    /// Attach recorded tool calls to an assistant message
    pub fn with_tool_calls(mut self, calls: Vec<ToolCall>) -> Self {
        self.tool_calls = Some(calls);
        self
    }

    /// Create a tool message carrying recorded results
    pub fn tool(results: Vec<ToolResult>) -> Self {
        Self {
            role: Role::Tool,
            content: None,
            tool_calls: None,
            tool_results: Some(results),
        }
    }

    /// Text content, treating an absent or empty string the same
    pub fn text(&self) -> Option<&str> {
        self.content.as_deref().filter(|s| !s.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_creation() {
        let msg = ChatMessage::user("Hello");
        assert_eq!(msg.role, Role::User);
        assert_eq!(msg.text(), Some("Hello"));
        assert_eq!(ChatMessage::assistant("").text(), None);
    }

    #[test]
    fn test_deserialize_front_end_history() {
        let history: Vec<ChatMessage> = serde_json::from_value(json!([
            { "role": "user", "content": "Hi" },
            {
                "role": "assistant",
                "content": null,
                "tool_calls": [
                    { "name": "record_user_details", "arguments": "{\"email\": \"a@b.co\"}" }
                ]
            },
            {
                "role": "tool",
                "tool_results": [
                    { "name": "record_user_details", "response": { "recorded": "ok" } }
                ]
            }
        ]))
        .unwrap();

        assert_eq!(history.len(), 3);
        assert_eq!(history[1].role, Role::Assistant);
        assert_eq!(history[1].text(), None);
        let calls = history[1].tool_calls.as_ref().unwrap();
        assert_eq!(calls[0].arguments.get("email"), Some(&json!("a@b.co")));
        assert_eq!(history[2].tool_results.as_ref().unwrap().len(), 1);
    }
}
