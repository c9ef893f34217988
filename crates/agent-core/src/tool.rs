//! Tool System
//!
//! Named actions the model may request. Tools are registered once at startup
//! and invoked by the resolution loop with the arguments the model supplied.

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{AgentError, Result};

/// Keyword arguments of a tool call
pub type Arguments = Map<String, Value>;

/// Tool call request from the LLM
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool identifier
    pub name: String,

    /// Arguments as key-value pairs
    #[serde(default, deserialize_with = "arguments_from_map_or_str")]
    pub arguments: Arguments,
}

impl ToolCall {
    pub fn new(name: impl Into<String>, arguments: Arguments) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// Chat front-ends that record OpenAI-style calls keep the arguments as a
/// JSON-encoded string. Accept both shapes.
fn arguments_from_map_or_str<'de, D>(deserializer: D) -> std::result::Result<Arguments, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Object(map) => Ok(map),
        Value::Null => Ok(Map::new()),
        Value::String(raw) if raw.trim().is_empty() => Ok(Map::new()),
        Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(other) => Err(serde::de::Error::custom(format!(
                "tool arguments must be an object, got {other}"
            ))),
            Err(e) => Err(serde::de::Error::custom(format!(
                "tool arguments are not valid JSON: {e}"
            ))),
        },
        other => Err(serde::de::Error::custom(format!(
            "tool arguments must be an object, got {other}"
        ))),
    }
}

/// Result from tool execution, fed back to the model
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// Tool that was called
    pub name: String,

    /// Response object; failures carry an `error` field
    pub response: Value,
}

impl ToolResult {
    pub fn success(name: impl Into<String>, response: Value) -> Self {
        Self {
            name: name.into(),
            response,
        }
    }

    pub fn failure(name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            response: json!({ "error": error.into() }),
        }
    }

    pub fn is_error(&self) -> bool {
        self.response.get("error").is_some()
    }
}

/// Parameter definition for tool schema
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterSchema {
    /// Parameter name
    pub name: String,

    /// JSON Schema type (string, number, boolean, object, array)
    #[serde(rename = "type")]
    pub param_type: String,

    /// Human-readable description
    pub description: String,

    /// Whether this parameter is required
    #[serde(default)]
    pub required: bool,

    /// Default value if not provided
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
}

impl ParameterSchema {
    pub fn required(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: true,
            default: None,
        }
    }

    pub fn optional(
        name: impl Into<String>,
        description: impl Into<String>,
        default: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            param_type: "string".into(),
            description: description.into(),
            required: false,
            default: Some(Value::String(default.into())),
        }
    }
}

/// Tool definition schema (for LLM function calling)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ToolSchema {
    /// Unique tool identifier
    pub name: String,

    /// Human-readable description (shown to LLM)
    pub description: String,

    /// Parameter definitions
    pub parameters: Vec<ParameterSchema>,
}

/// Tool trait - implement to add new capabilities
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool's schema for LLM function calling
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with already-validated arguments
    async fn execute(&self, arguments: &Arguments) -> Result<Value>;

    /// Bind arguments to parameters the way keyword arguments bind: every
    /// required parameter present, nothing the tool does not declare.
    fn validate(&self, arguments: &Arguments) -> Result<()> {
        let schema = self.schema();

        for param in &schema.parameters {
            // An explicit null binds nothing
            let bound = arguments.get(&param.name).is_some_and(|v| !v.is_null());
            if param.required && !bound {
                return Err(AgentError::ToolValidation(format!(
                    "{}() missing required argument: '{}'",
                    schema.name, param.name
                )));
            }
        }

        if let Some(unexpected) = arguments
            .keys()
            .find(|key| !schema.parameters.iter().any(|p| &p.name == *key))
        {
            return Err(AgentError::ToolValidation(format!(
                "{}() got an unexpected argument '{}'",
                schema.name, unexpected
            )));
        }

        Ok(())
    }
}

/// Read an argument as display text. Strings are taken as-is, other JSON
/// values use their JSON rendering.
pub fn arg_text(arguments: &Arguments, key: &str) -> Option<String> {
    match arguments.get(key)? {
        Value::String(s) => Some(s.clone()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Registry for available tools
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn Tool>>,
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a new tool
    pub fn register<T: Tool + 'static>(&mut self, tool: T) {
        let schema = tool.schema();
        self.tools.insert(schema.name, Arc::new(tool));
    }

    /// Get a tool by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Invoke a tool by name
    pub async fn invoke(&self, name: &str, arguments: &Arguments) -> Result<ToolResult> {
        let tool = self
            .get(name)
            .ok_or_else(|| AgentError::ToolNotFound(name.to_string()))?;

        tool.validate(arguments)?;

        let response = tool.execute(arguments).await?;
        Ok(ToolResult::success(name, response))
    }

    /// All tool schemas, ordered by name
    pub fn schemas(&self) -> Vec<ToolSchema> {
        let mut schemas: Vec<_> = self.tools.values().map(|t| t.schema()).collect();
        schemas.sort_by(|a, b| a.name.cmp(&b.name));
        schemas
    }

    /// Get tool names
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.tools.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct GreetTool;

    #[async_trait]
    impl Tool for GreetTool {
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "greet".into(),
                description: "Greet someone".into(),
                parameters: vec![
                    ParameterSchema::required("who", "Person to greet"),
                    ParameterSchema::optional("greeting", "Greeting word", "Hello"),
                ],
            }
        }

        async fn execute(&self, arguments: &Arguments) -> Result<Value> {
            let who = arg_text(arguments, "who").unwrap_or_default();
            let greeting = arg_text(arguments, "greeting").unwrap_or_else(|| "Hello".into());
            Ok(json!({ "text": format!("{greeting}, {who}") }))
        }
    }

    fn args(value: Value) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    #[tokio::test]
    async fn test_invoke_registered_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(GreetTool);

        let result = registry
            .invoke("greet", &args(json!({ "who": "Ada" })))
            .await
            .unwrap();

        assert_eq!(result.name, "greet");
        assert_eq!(result.response, json!({ "text": "Hello, Ada" }));
        assert!(!result.is_error());
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new();
        let err = registry.invoke("launch", &Arguments::new()).await.unwrap_err();
        assert!(matches!(err, AgentError::ToolNotFound(name) if name == "launch"));
    }

    #[tokio::test]
    async fn test_missing_and_unexpected_arguments() {
        let mut registry = ToolRegistry::new();
        registry.register(GreetTool);

        let missing = registry.invoke("greet", &Arguments::new()).await.unwrap_err();
        assert!(matches!(missing, AgentError::ToolValidation(msg) if msg.contains("'who'")));

        let unexpected = registry
            .invoke("greet", &args(json!({ "who": "Ada", "mood": "sunny" })))
            .await
            .unwrap_err();
        assert!(matches!(unexpected, AgentError::ToolValidation(msg) if msg.contains("'mood'")));
    }

    #[tokio::test]
    async fn test_null_required_argument_is_missing() {
        let mut registry = ToolRegistry::new();
        registry.register(GreetTool);

        let err = registry
            .invoke("greet", &args(json!({ "who": null })))
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::ToolValidation(msg) if msg.contains("missing required argument: 'who'")));

        let result = registry
            .invoke("greet", &args(json!({ "who": "Ada", "greeting": null })))
            .await
            .unwrap();
        assert_eq!(result.response, json!({ "text": "Hello, Ada" }));
    }

    #[test]
    fn test_arguments_accept_encoded_string() {
        let call: ToolCall = serde_json::from_value(json!({
            "name": "greet",
            "arguments": "{\"who\": \"Grace\"}"
        }))
        .unwrap();
        assert_eq!(call.arguments.get("who"), Some(&json!("Grace")));

        let bad = serde_json::from_value::<ToolCall>(json!({
            "name": "greet",
            "arguments": "[1, 2]"
        }));
        assert!(bad.is_err());
    }

    #[test]
    fn test_failure_result_carries_error() {
        let result = ToolResult::failure("greet", "boom");
        assert!(result.is_error());
        assert_eq!(result.response, json!({ "error": "boom" }));
    }

    #[test]
    fn test_registry_listing() {
        let mut registry = ToolRegistry::new();
        registry.register(GreetTool);

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.names(), vec!["greet"]);
        assert!(registry.get("unknown").is_none());
        assert_eq!(registry.schemas()[0].parameters.len(), 2);
    }
}
