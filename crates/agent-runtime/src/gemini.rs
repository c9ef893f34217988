//! Gemini LLM Provider
//!
//! Implementation of `LlmProvider` for the Google Gemini `generateContent`
//! API with function calling. Tool declarations are fixed when the provider
//! is built and sent with every request.

use std::time::Duration;

use agent_core::{
    error::{AgentError, Result},
    provider::{
        Candidate, Content, ContentRole, FinishReason, LlmProvider, Part, ProviderResponse,
        TokenUsage,
    },
    tool::{ToolCall, ToolResult, ToolSchema},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Gemini provider configuration
#[derive(Clone, Debug)]
pub struct GeminiConfig {
    /// API key sent as `x-goog-api-key`
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// API base URL
    pub api_base: String,

    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.into(),
            api_base: DEFAULT_API_BASE.into(),
            timeout_secs: 120,
        }
    }

    /// Read from `GOOGLE_API_KEY`, `GEMINI_MODEL`, `GEMINI_API_BASE` and
    /// `GEMINI_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup("GOOGLE_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AgentError::Config("GOOGLE_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key);
        if let Some(model) = lookup("GEMINI_MODEL").filter(|m| !m.is_empty()) {
            config.model = model;
        }
        if let Some(base) = lookup("GEMINI_API_BASE").filter(|b| !b.is_empty()) {
            config.api_base = base;
        }
        if let Some(secs) = lookup("GEMINI_TIMEOUT_SECS").and_then(|s| s.parse().ok()) {
            config.timeout_secs = secs;
        }

        Ok(config)
    }
}

// ============================================================================
// Wire types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "no_tools")]
    tools: &'a [GeminiTool],
}

fn no_tools(tools: &&[GeminiTool]) -> bool {
    tools.is_empty()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionCall {
    name: String,
    #[serde(default)]
    args: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    name: String,
    response: Value,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiTool {
    function_declarations: Vec<GeminiFunctionDeclaration>,
}

#[derive(Debug, Clone, Serialize)]
struct GeminiFunctionDeclaration {
    name: String,
    description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    candidates: Option<Vec<GeminiCandidate>>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
    #[serde(default)]
    total_token_count: u32,
}

// ============================================================================
// GeminiProvider
// ============================================================================

/// Google Gemini LLM provider
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    tools: Vec<GeminiTool>,
}

impl GeminiProvider {
    /// Create a provider declaring `tools` on every request
    pub fn from_config(config: GeminiConfig, tools: Vec<ToolSchema>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AgentError::Config(format!("HTTP client: {e}")))?;

        Ok(Self {
            client,
            config,
            tools: Self::declare_tools(&tools),
        })
    }

    /// Create from environment variables
    pub fn from_env(tools: Vec<ToolSchema>) -> Result<Self> {
        Self::from_config(GeminiConfig::from_env()?, tools)
    }

    fn endpoint(&self, method: &str) -> String {
        format!(
            "{}/models/{}{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.model,
            method
        )
    }

    /// All tools go into a single `functionDeclarations` block
    fn declare_tools(schemas: &[ToolSchema]) -> Vec<GeminiTool> {
        if schemas.is_empty() {
            return Vec::new();
        }

        let function_declarations = schemas
            .iter()
            .map(|schema| {
                let parameters = (!schema.parameters.is_empty()).then(|| {
                    let properties: Map<String, Value> = schema
                        .parameters
                        .iter()
                        .map(|p| {
                            (
                                p.name.clone(),
                                json!({
                                    "type": p.param_type.to_uppercase(),
                                    "description": p.description,
                                }),
                            )
                        })
                        .collect();
                    let required: Vec<&str> = schema
                        .parameters
                        .iter()
                        .filter(|p| p.required)
                        .map(|p| p.name.as_str())
                        .collect();

                    json!({
                        "type": "OBJECT",
                        "properties": properties,
                        "required": required,
                    })
                });

                GeminiFunctionDeclaration {
                    name: schema.name.clone(),
                    description: schema.description.clone(),
                    parameters,
                }
            })
            .collect();

        vec![GeminiTool {
            function_declarations,
        }]
    }

    /// Convert agent contents to Gemini format
    fn convert_contents(contents: &[Content]) -> Vec<GeminiContent> {
        contents
            .iter()
            .map(|content| {
                // Gemini only knows "user" and "model"; function responses are user turns
                let role = match content.role {
                    ContentRole::User | ContentRole::Function => "user",
                    ContentRole::Model => "model",
                };
                GeminiContent {
                    role: Some(role.into()),
                    parts: content.parts.iter().map(Self::convert_part).collect(),
                }
            })
            .collect()
    }

    fn convert_part(part: &Part) -> GeminiPart {
        match part {
            Part::Text(text) => GeminiPart {
                text: Some(text.clone()),
                ..Default::default()
            },
            Part::FunctionCall(call) => GeminiPart {
                function_call: Some(GeminiFunctionCall {
                    name: call.name.clone(),
                    args: Value::Object(call.arguments.clone()),
                }),
                ..Default::default()
            },
            Part::FunctionResponse(result) => GeminiPart {
                function_response: Some(GeminiFunctionResponse {
                    name: result.name.clone(),
                    response: result.response.clone(),
                }),
                ..Default::default()
            },
        }
    }

    /// Convert a Gemini response to the agent's response model
    fn convert_response(response: GeminiResponse) -> ProviderResponse {
        let candidates = response
            .candidates
            .unwrap_or_default()
            .into_iter()
            .map(|candidate| Candidate {
                content: candidate.content.map(Self::convert_content),
                finish_reason: candidate.finish_reason.map(|r| Self::convert_finish_reason(&r)),
            })
            .collect();

        ProviderResponse {
            candidates,
            usage: response.usage_metadata.map(|u| TokenUsage {
                prompt_tokens: u.prompt_token_count,
                completion_tokens: u.candidates_token_count,
                total_tokens: u.total_token_count,
            }),
        }
    }

    fn convert_content(content: GeminiContent) -> Content {
        let role = match content.role.as_deref() {
            Some("user") => ContentRole::User,
            _ => ContentRole::Model,
        };

        let parts = content
            .parts
            .into_iter()
            .filter_map(|part| {
                if let Some(call) = part.function_call {
                    let arguments = match call.args {
                        Value::Object(map) => map,
                        _ => Map::new(),
                    };
                    return Some(Part::FunctionCall(ToolCall::new(call.name, arguments)));
                }
                if let Some(response) = part.function_response {
                    return Some(Part::FunctionResponse(ToolResult::success(
                        response.name,
                        response.response,
                    )));
                }
                part.text.map(Part::Text)
            })
            .collect();

        Content::new(role, parts)
    }

    fn convert_finish_reason(reason: &str) -> FinishReason {
        match reason {
            "STOP" => FinishReason::Stop,
            "MAX_TOKENS" => FinishReason::Length,
            "SAFETY" | "RECITATION" | "BLOCKLIST" | "PROHIBITED_CONTENT" | "SPII" => {
                FinishReason::ContentFilter
            }
            other => FinishReason::Other(other.to_string()),
        }
    }

    fn transport_error(e: &reqwest::Error) -> AgentError {
        if e.is_timeout() || e.is_connect() {
            AgentError::ProviderUnavailable(e.to_string())
        } else {
            AgentError::Provider(e.to_string())
        }
    }

    fn status_error(status: StatusCode, body: String) -> AgentError {
        match status {
            StatusCode::TOO_MANY_REQUESTS => AgentError::RateLimited(body),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AgentError::Auth(body),
            StatusCode::SERVICE_UNAVAILABLE => AgentError::ProviderUnavailable(body),
            _ => AgentError::Provider(format!("HTTP {status}: {body}")),
        }
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.endpoint(""))
            .header("x-goog-api-key", &self.config.api_key)
            .send()
            .await;

        match response {
            Ok(r) if r.status().is_success() => Ok(true),
            Ok(r) => {
                tracing::warn!(status = %r.status(), "Gemini health check failed");
                Ok(false)
            }
            Err(e) => {
                tracing::warn!("Gemini health check failed: {}", e);
                Ok(false)
            }
        }
    }

    async fn generate(&self, contents: &[Content]) -> Result<ProviderResponse> {
        let request = GeminiRequest {
            contents: Self::convert_contents(contents),
            tools: &self.tools,
        };

        tracing::debug!(
            model = %self.config.model,
            contents = request.contents.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint(":generateContent"))
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Self::transport_error(&e))?;

        if !status.is_success() {
            tracing::error!(%status, "Gemini API error");
            return Err(Self::status_error(status, body));
        }

        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| AgentError::Parse(format!("Gemini response: {e}")))?;

        Ok(Self::convert_response(parsed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agent_core::tool::ParameterSchema;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const GENERATE_PATH: &str = "/models/gemini-2.0-flash:generateContent";

    fn schemas() -> Vec<ToolSchema> {
        vec![ToolSchema {
            name: "record_unknown_question".into(),
            description: "Records a question".into(),
            parameters: vec![ParameterSchema::required("question", "The question")],
        }]
    }

    fn provider(server: &MockServer) -> GeminiProvider {
        let mut config = GeminiConfig::new("test-key");
        config.api_base = server.uri();
        GeminiProvider::from_config(config, schemas()).unwrap()
    }

    #[test]
    fn test_config_from_lookup() {
        let config = GeminiConfig::from_lookup(|key| match key {
            "GOOGLE_API_KEY" => Some("abc".into()),
            "GEMINI_TIMEOUT_SECS" => Some("30".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.model, "gemini-2.0-flash");
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.timeout_secs, 30);

        let missing = GeminiConfig::from_lookup(|_| None);
        assert!(matches!(missing, Err(AgentError::Config(_))));
    }

    #[test]
    fn test_tool_declarations() {
        let tools = GeminiProvider::declare_tools(&schemas());
        let value = serde_json::to_value(&tools).unwrap();
        assert_eq!(
            value,
            json!([{
                "functionDeclarations": [{
                    "name": "record_unknown_question",
                    "description": "Records a question",
                    "parameters": {
                        "type": "OBJECT",
                        "properties": {
                            "question": { "type": "STRING", "description": "The question" }
                        },
                        "required": ["question"]
                    }
                }]
            }])
        );
    }

    #[test]
    fn test_function_responses_sent_as_user_turns() {
        let contents = vec![Content::function_responses(vec![ToolResult::success(
            "record_unknown_question",
            json!({ "recorded": "ok" }),
        )])];

        let value = serde_json::to_value(GeminiProvider::convert_contents(&contents)).unwrap();
        assert_eq!(
            value,
            json!([{
                "role": "user",
                "parts": [{
                    "functionResponse": {
                        "name": "record_unknown_question",
                        "response": { "recorded": "ok" }
                    }
                }]
            }])
        );
    }

    #[tokio::test]
    async fn test_generate_text_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Hello" }] }],
                "tools": [{ "functionDeclarations": [{ "name": "record_unknown_question" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Hi, I'm Ada." }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": {
                    "promptTokenCount": 12,
                    "candidatesTokenCount": 4,
                    "totalTokenCount": 16
                }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = provider(&server)
            .generate(&[Content::user_text("Hello")])
            .await
            .unwrap();

        assert_eq!(response.text(), "Hi, I'm Ada.");
        assert_eq!(
            response.candidates[0].finish_reason,
            Some(FinishReason::Stop)
        );
        assert_eq!(response.usage.unwrap().total_tokens, 16);
    }

    #[tokio::test]
    async fn test_generate_function_call_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{
                            "functionCall": {
                                "name": "record_unknown_question",
                                "args": { "question": "Do you ski?" }
                            }
                        }]
                    }
                }]
            })))
            .mount(&server)
            .await;

        let response = provider(&server)
            .generate(&[Content::user_text("Do you ski?")])
            .await
            .unwrap();

        let calls = response.tool_calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].name, "record_unknown_question");
        assert_eq!(calls[0].arguments.get("question"), Some(&json!("Do you ski?")));
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_generate_without_candidates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let response = provider(&server)
            .generate(&[Content::user_text("...")])
            .await
            .unwrap();

        assert!(response.candidates.is_empty());
        assert_eq!(response.text(), "");
    }

    #[tokio::test]
    async fn test_generate_maps_http_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path(GENERATE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let provider = provider(&server);
        let contents = [Content::user_text("Hello")];

        let first = provider.generate(&contents).await.unwrap_err();
        assert!(matches!(first, AgentError::RateLimited(body) if body == "quota"));

        let second = provider.generate(&contents).await.unwrap_err();
        assert!(matches!(second, AgentError::Provider(msg) if msg.contains("internal")));

        let third = provider.generate(&contents).await.unwrap_err();
        assert!(matches!(third, AgentError::Parse(_)));
    }
}
