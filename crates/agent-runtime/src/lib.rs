//! # agent-runtime
//!
//! Runtime providers for the persona agent.
//!
//! ## Providers
//!
//! - **Gemini** (default): Google Gemini `generateContent` with function calling
//!
//! ## Usage
//!
//! ```rust,ignore
//! use agent_runtime::gemini::{GeminiConfig, GeminiProvider};
//!
//! let provider = GeminiProvider::from_config(GeminiConfig::from_env()?, tools.schemas())?;
//! let agent = AgentBuilder::new()
//!     .provider(Arc::new(provider))
//!     .tools(tools)
//!     .build()?;
//! ```

#[cfg(feature = "gemini")]
pub mod gemini;

#[cfg(feature = "gemini")]
pub use gemini::{GeminiConfig, GeminiProvider};

// Re-export core types for convenience
pub use agent_core::{
    Agent, AgentError, ChatMessage, LlmProvider, Result, Role, Tool, ToolRegistry,
};
