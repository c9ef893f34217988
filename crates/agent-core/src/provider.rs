//! LLM Provider Strategy Pattern
//!
//! Defines a common interface for tool-calling LLM backends. The agent builds
//! a provider-neutral conversation of [`Content`] values; each provider maps
//! it onto its own wire format at the boundary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_core::provider::{Content, LlmProvider};
//!
//! let provider = GeminiProvider::from_config(config, registry.schemas())?;
//! let response = provider.generate(&[Content::user_text("Hello")]).await?;
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::tool::{ToolCall, ToolResult};

/// Producer of a piece of provider-side content
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    User,
    Model,
    /// Function responses fed back to the model
    Function,
}

/// One part of a content entry
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Part {
    Text(String),
    FunctionCall(ToolCall),
    FunctionResponse(ToolResult),
}

impl Part {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_function_call(&self) -> Option<&ToolCall> {
        match self {
            Part::FunctionCall(call) => Some(call),
            _ => None,
        }
    }
}

/// A role-tagged message in provider schema
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Content {
    pub role: ContentRole,
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: ContentRole, parts: Vec<Part>) -> Self {
        Self { role, parts }
    }

    pub fn user_text(text: impl Into<String>) -> Self {
        Self::new(ContentRole::User, vec![Part::Text(text.into())])
    }

    pub fn model_text(text: impl Into<String>) -> Self {
        Self::new(ContentRole::Model, vec![Part::Text(text.into())])
    }

    pub fn function_responses(results: Vec<ToolResult>) -> Self {
        Self::new(
            ContentRole::Function,
            results.into_iter().map(Part::FunctionResponse).collect(),
        )
    }

    /// Function calls requested in this content, in order
    pub fn function_calls(&self) -> Vec<&ToolCall> {
        self.parts.iter().filter_map(Part::as_function_call).collect()
    }

    /// First non-empty text part
    pub fn first_text(&self) -> Option<&str> {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .find(|text| !text.is_empty())
    }
}

/// Token usage statistics
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// Reason for completion finishing
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FinishReason {
    Stop,
    Length,
    ContentFilter,
    Other(String),
}

/// One alternative model output
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<FinishReason>,
}

impl Candidate {
    pub fn new(content: Content) -> Self {
        Self {
            content: Some(content),
            finish_reason: Some(FinishReason::Stop),
        }
    }
}

/// Response from a generate call
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderResponse {
    pub candidates: Vec<Candidate>,
    pub usage: Option<TokenUsage>,
}

impl ProviderResponse {
    /// Single-candidate response
    pub fn from_content(content: Content) -> Self {
        Self {
            candidates: vec![Candidate::new(content)],
            usage: None,
        }
    }

    /// Content of the first candidate, if it has any parts
    pub fn first_content(&self) -> Option<&Content> {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .filter(|content| !content.parts.is_empty())
    }

    /// Function calls in the first candidate
    pub fn tool_calls(&self) -> Vec<&ToolCall> {
        self.first_content()
            .map(Content::function_calls)
            .unwrap_or_default()
    }

    /// First non-empty text of the first candidate, or an empty string
    pub fn text(&self) -> String {
        self.first_content()
            .and_then(Content::first_text)
            .unwrap_or_default()
            .to_string()
    }
}

/// Strategy trait for LLM providers
///
/// Implement this trait to add support for new LLM backends. Tool
/// declarations are fixed when the provider is constructed; the agent only
/// sends conversations.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "Gemini")
    fn name(&self) -> &str;

    /// Model identifier requests are sent to
    fn model(&self) -> &str;

    /// Check if the provider is configured and reachable
    async fn health_check(&self) -> Result<bool> {
        Ok(true)
    }

    /// Generate the next model turn for a full conversation
    async fn generate(&self, contents: &[Content]) -> Result<ProviderResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Map;

    #[test]
    fn test_empty_responses_degrade_to_empty_text() {
        assert_eq!(ProviderResponse::default().text(), "");

        let no_content = ProviderResponse {
            candidates: vec![Candidate::default()],
            usage: None,
        };
        assert_eq!(no_content.text(), "");
        assert!(no_content.tool_calls().is_empty());

        let no_parts = ProviderResponse::from_content(Content::new(ContentRole::Model, vec![]));
        assert_eq!(no_parts.text(), "");
    }

    #[test]
    fn test_text_skips_empty_and_call_parts() {
        let response = ProviderResponse::from_content(Content::new(
            ContentRole::Model,
            vec![
                Part::FunctionCall(ToolCall::new("lookup", Map::new())),
                Part::Text(String::new()),
                Part::Text("first".into()),
                Part::Text("second".into()),
            ],
        ));

        assert_eq!(response.text(), "first");
        assert_eq!(response.tool_calls().len(), 1);
    }
}
