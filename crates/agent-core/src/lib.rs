//! # agent-core
//!
//! Provider-agnostic tool-calling agent: chat history in, final text out.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        Agent                                │
//! │  ┌─────────────┐  ┌─────────────┐  ┌─────────────────────┐  │
//! │  │ Resolution  │  │    Tools    │  │   LlmProvider       │  │
//! │  │    Loop     │──│   Registry  │──│   (Strategy)        │  │
//! │  └─────────────┘  └─────────────┘  └─────────────────────┘  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each turn rebuilds the provider conversation from the front-end's history,
//! so the agent keeps no conversation state between turns.

pub mod error;
pub mod message;
pub mod provider;
pub mod reasoning;
pub mod tool;

pub use error::{AgentError, Result};
pub use message::{ChatMessage, Role};
pub use provider::{Content, ContentRole, LlmProvider, Part, ProviderResponse};
pub use reasoning::{Agent, AgentBuilder, AgentConfig};
pub use tool::{Arguments, Tool, ToolCall, ToolRegistry, ToolResult, ToolSchema};
