//! OpenAI-compatible API provider
//!
//! Used for providers that implement the OpenAI chat completions API:
//! - OpenRouter
//! - Cerebras
//! - Ollama (local, no API key)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::http;
use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};

pub const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const CEREBRAS_BASE_URL: &str = "https://api.cerebras.ai/v1";
pub const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";

/// Provider for OpenAI-compatible APIs
pub struct OpenAICompatibleProvider {
    model: String,
    base_url: String,
    api_key: Option<String>,
    name: &'static str,
    timeout: Duration,
    client: Client,
}

impl OpenAICompatibleProvider {
    /// Create a new OpenAI-compatible provider
    pub fn new(
        model: &str,
        base_url: &str,
        api_key: Option<String>,
        name: &'static str,
        timeout: Duration,
    ) -> Result<Self> {
        Ok(Self {
            model: model.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            name,
            timeout,
            client: http::build_client(timeout)?,
        })
    }

    /// Create an OpenRouter provider
    pub fn openrouter(model: &str, api_key: String, timeout: Duration) -> Result<Self> {
        Self::new(model, OPENROUTER_BASE_URL, Some(api_key), "OpenRouter", timeout)
    }

    /// Create a Cerebras provider
    pub fn cerebras(model: &str, api_key: String, timeout: Duration) -> Result<Self> {
        Self::new(model, CEREBRAS_BASE_URL, Some(api_key), "Cerebras", timeout)
    }

    /// Create a provider for a local Ollama server
    pub fn ollama(model: &str, base_url: Option<&str>, timeout: Duration) -> Result<Self> {
        Self::new(
            model,
            base_url.unwrap_or(OLLAMA_BASE_URL),
            None,
            "Ollama",
            timeout,
        )
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[async_trait]
impl LlmProvider for OpenAICompatibleProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let mut messages = Vec::with_capacity(2);

        if let Some(system) = request.system_prompt.as_deref() {
            messages.push(Message {
                role: "system",
                content: system,
            });
        }

        messages.push(Message {
            role: "user",
            content: &request.prompt,
        });

        let chat_request = ChatCompletionRequest {
            model: &self.model,
            messages,
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        let mut builder = self.client.post(self.completions_url()).json(&chat_request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| http::send_error(e, self.timeout))?;

        if !response.status().is_success() {
            return Err(http::status_error(response).await);
        }

        let chat_response: ChatCompletionResponse =
            response.json().await.map_err(|e| LlmError::ApiError {
                message: format!("Failed to parse response: {}", e),
                status_code: None,
            })?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .unwrap_or_default();

        let usage = chat_response.usage.map(|u| TokenUsage {
            input_tokens: u.prompt_tokens,
            output_tokens: u.completion_tokens,
        });

        Ok(LlmResponse {
            content,
            model: self.model.clone(),
            usage,
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> Result<()> {
        // Keyless providers (Ollama) are assumed reachable until a request fails
        match &self.api_key {
            Some(key) if key.trim().is_empty() => Err(LlmError::ProviderUnavailable(format!(
                "{} API key is empty",
                self.name
            ))),
            _ => Ok(()),
        }
    }
}
