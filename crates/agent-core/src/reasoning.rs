//! Resolution Loop
//!
//! Runs one chat turn: replay the history in provider schema, query the
//! model, execute any tools it asks for, feed the results back, and repeat
//! until the model answers in text.

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::{AgentError, Result};
use crate::message::{ChatMessage, Role};
use crate::provider::{Content, ContentRole, LlmProvider, Part};
use crate::tool::{ToolCall, ToolRegistry, ToolResult};

/// Agent configuration
#[derive(Clone, Debug, Default)]
pub struct AgentConfig {
    /// System prompt, sent as the first message of every request
    pub system_prompt: String,

    /// Cap on tool rounds per turn. `None` leaves the loop bounded only by
    /// the model eventually answering in text.
    pub max_iterations: Option<usize>,
}

/// The main Agent struct
pub struct Agent {
    provider: Arc<dyn LlmProvider>,
    tools: Arc<ToolRegistry>,
    config: AgentConfig,
    turn_lock: Mutex<()>,
}

impl Agent {
    /// Create a new agent
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        tools: Arc<ToolRegistry>,
        config: AgentConfig,
    ) -> Self {
        Self {
            provider,
            tools,
            config,
            turn_lock: Mutex::new(()),
        }
    }

    /// Answer `message` given the prior `history`.
    ///
    /// Tool failures are reported to the model and never end the turn;
    /// provider failures do. Turns on one agent run one at a time.
    pub async fn respond(&self, message: &str, history: &[ChatMessage]) -> Result<String> {
        let _turn = self.turn_lock.lock().await;

        let mut conversation = self.build_conversation(message, history);
        let mut rounds = 0;

        loop {
            let response = self.provider.generate(&conversation).await?;

            let calls: Vec<ToolCall> = response.tool_calls().into_iter().cloned().collect();
            if calls.is_empty() {
                return Ok(response.text());
            }

            rounds += 1;
            if let Some(max) = self.config.max_iterations {
                if rounds > max {
                    tracing::warn!(max, "Tool rounds exhausted without a final answer");
                    return Err(AgentError::MaxIterations(max));
                }
            }

            if let Some(content) = response.first_content() {
                conversation.push(content.clone());
            }

            let results = self.execute_tools(&calls).await;
            conversation.push(Content::function_responses(results));
        }
    }

    /// Answer a single question with no prior history
    pub async fn ask(&self, question: &str) -> Result<String> {
        self.respond(question, &[]).await
    }

    /// Provider-schema conversation for a new turn: system prompt, translated
    /// history, then the new user message.
    pub fn build_conversation(&self, message: &str, history: &[ChatMessage]) -> Vec<Content> {
        let mut contents = Vec::with_capacity(history.len() + 2);

        if !self.config.system_prompt.is_empty() {
            contents.push(Content::user_text(self.config.system_prompt.clone()));
        }

        contents.extend(history.iter().filter_map(translate_message));
        contents.push(Content::user_text(message));
        contents
    }

    /// Execute requested tools in order, one result per call
    async fn execute_tools(&self, calls: &[ToolCall]) -> Vec<ToolResult> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            tracing::debug!(tool = %call.name, arguments = ?call.arguments, "Agent requested tool call");

            let result = match self.tools.invoke(&call.name, &call.arguments).await {
                Ok(result) => {
                    tracing::debug!(tool = %call.name, response = %result.response, "Tool returned");
                    result
                }
                Err(e) => {
                    tracing::error!(tool = %call.name, error = %e, "Tool call failed");
                    ToolResult::failure(&call.name, e.tool_payload())
                }
            };

            results.push(result);
        }

        results
    }

    /// Get the tool registry
    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Get the provider
    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Get configuration
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }
}

fn translate_message(message: &ChatMessage) -> Option<Content> {
    match message.role {
        Role::User => {
            let text = message.text();
            if text.is_none() {
                tracing::debug!("Skipping empty user message in history");
            }
            text.map(Content::user_text)
        }
        Role::Assistant => {
            let mut parts = Vec::new();
            if let Some(text) = message.text() {
                parts.push(Part::Text(text.to_string()));
            }
            if let Some(calls) = &message.tool_calls {
                parts.extend(calls.iter().cloned().map(Part::FunctionCall));
            }
            if parts.is_empty() {
                tracing::debug!("Skipping empty assistant message in history");
                return None;
            }
            Some(Content::new(ContentRole::Model, parts))
        }
        Role::Tool => match (&message.tool_results, message.text()) {
            (Some(results), _) if !results.is_empty() => {
                Some(Content::function_responses(results.clone()))
            }
            (_, Some(text)) => Some(Content::new(
                ContentRole::Function,
                vec![Part::Text(text.to_string())],
            )),
            _ => None,
        },
    }
}

/// Builder for Agent configuration
pub struct AgentBuilder {
    provider: Option<Arc<dyn LlmProvider>>,
    tools: ToolRegistry,
    config: AgentConfig,
}

impl Default for AgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl AgentBuilder {
    pub fn new() -> Self {
        Self {
            provider: None,
            tools: ToolRegistry::new(),
            config: AgentConfig::default(),
        }
    }

    pub fn provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        self.provider = Some(provider);
        self
    }

    pub fn tool<T: crate::tool::Tool + 'static>(mut self, tool: T) -> Self {
        self.tools.register(tool);
        self
    }

    pub fn tools(mut self, tools: ToolRegistry) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    pub fn max_iterations(mut self, max: usize) -> Self {
        self.config.max_iterations = Some(max);
        self
    }

    pub fn build(self) -> Result<Agent> {
        let provider = self
            .provider
            .ok_or_else(|| AgentError::Config("Provider is required".into()))?;

        Ok(Agent::new(provider, Arc::new(self.tools), self.config))
    }
}
