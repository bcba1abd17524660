//! AnthropicEngine implementation using the Messages API.

use brain_core::{
    async_trait, BrainError, Completion, ReasoningEngine, ToolDefinition, ToolUseRequest, Turn,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{ApiError, ApiTool, MessagesRequest, MessagesResponse, ResponseBlock};
use crate::config::AnthropicConfig;

/// A reasoning engine backed by the Anthropic Messages API.
///
/// Stateless: the agent loop owns history and passes it on every call.
pub struct AnthropicEngine {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicEngine {
    /// Create a new engine with the given configuration.
    pub fn new(config: AnthropicConfig) -> Result<Self, BrainError> {
        if config.api_key.is_empty() {
            return Err(BrainError::Configuration("Anthropic API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "AnthropicEngine initialized: url={}, max_tokens={}, system_prompt={}",
            config.api_url,
            config.max_tokens,
            config.system_prompt.is_some()
        );

        Ok(Self { client, config })
    }

    /// Create an engine from environment variables.
    ///
    /// See [`AnthropicConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(AnthropicConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &AnthropicConfig {
        &self.config
    }

    fn build_request<'a>(
        &'a self,
        model: &'a str,
        history: &'a [Turn],
        tools: &'a [ToolDefinition],
    ) -> MessagesRequest<'a> {
        MessagesRequest {
            model,
            max_tokens: self.config.max_tokens,
            system: self.config.system_prompt.as_deref(),
            messages: history,
            tools: tools.iter().map(ApiTool::from).collect(),
            temperature: self.config.temperature,
        }
    }

    async fn send(&self, request: &MessagesRequest<'_>) -> Result<MessagesResponse, BrainError> {
        let url = format!("{}/v1/messages", self.config.api_url.trim_end_matches('/'));

        debug!(
            "Sending {} turns and {} tools to {}",
            request.messages.len(),
            request.tools.len(),
            request.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", &self.config.api_version)
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();

            if let Ok(api_error) = serde_json::from_str::<ApiError>(&error_text) {
                return Err(BrainError::ProcessingFailed(format!(
                    "API error ({}): {}",
                    status.as_u16(),
                    api_error.error.message
                )));
            }

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                body_excerpt(&error_text)
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BrainError::InvalidResponse(format!("Failed to parse response: {}", e)))
    }
}

/// Longest slice of a non-JSON error body kept in the error.
const ERROR_BODY_LIMIT: usize = 200;

fn body_excerpt(body: &str) -> String {
    let mut excerpt: String = body.chars().take(ERROR_BODY_LIMIT).collect();
    if body.chars().count() > ERROR_BODY_LIMIT {
        excerpt.push('…');
    }
    excerpt
}

/// Convert an API response into a completion.
///
/// `end_turn` is the engine's explicit done signal; any other stop reason
/// with tool-use blocks asks for another round.
pub(crate) fn to_completion(response: MessagesResponse) -> Completion {
    let mut texts = Vec::new();
    let mut tool_uses = Vec::new();

    for block in response.content {
        match block {
            ResponseBlock::Text { text } => texts.push(text),
            ResponseBlock::ToolUse { id, name, input } => {
                tool_uses.push(ToolUseRequest::new(id, name, input))
            }
            ResponseBlock::Other => {}
        }
    }

    let text = texts.join("\n");
    let usage = response.usage.unwrap_or_default();

    Completion {
        text: (!text.trim().is_empty()).then_some(text),
        tool_uses,
        done: response.stop_reason.as_deref() == Some("end_turn"),
        usage: brain_core::Usage {
            input_tokens: usage.input_tokens,
            output_tokens: usage.output_tokens,
        },
    }
}

#[async_trait]
impl ReasoningEngine for AnthropicEngine {
    async fn complete(
        &self,
        model: &str,
        history: &[Turn],
        tools: &[ToolDefinition],
    ) -> Result<Completion, BrainError> {
        let request = self.build_request(model, history, tools);
        let response = self.send(&request).await?;

        debug!(
            "Response {} from {}: stop_reason={:?}",
            response.id, response.model, response.stop_reason
        );

        Ok(to_completion(response))
    }

    fn name(&self) -> &str {
        "AnthropicEngine"
    }
}
