//! Error Types

use thiserror::Error;

/// Result type alias for agent operations
pub type Result<T> = std::result::Result<T, AgentError>;

/// Agent error types
#[derive(Error, Debug)]
pub enum AgentError {
    /// LLM provider returned an error response
    #[error("Provider error: {0}")]
    Provider(String),

    /// Provider unreachable (connect failure, timeout)
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Tool not found in registry
    #[error("Tool not found: {0}")]
    ToolNotFound(String),

    /// Arguments did not bind to the tool's parameters
    #[error("Tool validation error: {0}")]
    ToolValidation(String),

    /// Tool body failed
    #[error("Tool execution error: {0}")]
    ToolExecution(String),

    /// Iteration cap reached in the resolution loop
    #[error("Maximum iterations ({0}) reached")]
    MaxIterations(usize),

    /// Provider response could not be decoded
    #[error("Parse error: {0}")]
    Parse(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Rate limited
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// Authentication failed
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl AgentError {
    /// Errors raised by the provider call, which end the turn.
    pub fn is_provider_error(&self) -> bool {
        matches!(
            self,
            AgentError::Provider(_)
                | AgentError::ProviderUnavailable(_)
                | AgentError::RateLimited(_)
                | AgentError::Auth(_)
                | AgentError::Parse(_)
        )
    }

    /// Text placed in the model-visible error payload of a failed tool call
    pub fn tool_payload(&self) -> String {
        match self {
            AgentError::ToolNotFound(name) => format!("Tool '{name}' not implemented."),
            AgentError::ToolValidation(cause) | AgentError::ToolExecution(cause) => {
                format!("Tool execution failed: {cause}")
            }
            other => format!("Tool execution failed: {other}"),
        }
    }

    /// Convert to a user-friendly message
    pub fn user_message(&self) -> String {
        match self {
            AgentError::Provider(msg) => format!("The AI service encountered an error: {msg}"),
            AgentError::ProviderUnavailable(_) => {
                "The AI service is currently unavailable. Please try again.".into()
            }
            AgentError::ToolNotFound(name) => format!("The tool '{name}' is not available."),
            AgentError::ToolValidation(msg) => format!("Invalid tool input: {msg}"),
            AgentError::ToolExecution(msg) => format!("Tool error: {msg}"),
            AgentError::MaxIterations(_) => {
                "The request took too long to process. Please try a simpler query.".into()
            }
            AgentError::RateLimited(_) => "Too many requests. Please wait a moment.".into(),
            AgentError::Auth(_) => "The AI service rejected our credentials.".into(),
            _ => "An unexpected error occurred.".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tool_payloads() {
        let missing = AgentError::ToolNotFound("send_fax".into());
        assert_eq!(missing.tool_payload(), "Tool 'send_fax' not implemented.");

        let failed = AgentError::ToolExecution("smtp down".into());
        assert_eq!(
            failed.tool_payload(),
            "Tool execution failed: smtp down"
        );

        let invalid = AgentError::ToolValidation(
            "record_user_details() missing required argument: 'email'".into(),
        );
        assert_eq!(
            invalid.tool_payload(),
            "Tool execution failed: record_user_details() missing required argument: 'email'"
        );
    }

    #[test]
    fn test_provider_classification() {
        assert!(AgentError::RateLimited("slow down".into()).is_provider_error());
        assert!(AgentError::Parse("bad body".into()).is_provider_error());
        assert!(!AgentError::ToolNotFound("x".into()).is_provider_error());
    }
}
