//! LLM provider implementations

mod anthropic;
mod http;
pub mod mock;
mod openai_compatible;

pub use anthropic::AnthropicProvider;
pub use mock::MockProvider;
pub use openai_compatible::OpenAICompatibleProvider;

use crate::config::{ModelPreset, ProviderConfig};
use crate::error::{LlmError, Result};
use crate::provider::LlmProvider;

/// Supported provider types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Ollama,
    Anthropic,
    OpenRouter,
    Cerebras,
}

impl ProviderKind {
    /// Parse provider kind from string
    pub fn parse(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "ollama" | "local" => Ok(Self::Ollama),
            "anthropic" => Ok(Self::Anthropic),
            "openrouter" => Ok(Self::OpenRouter),
            "cerebras" => Ok(Self::Cerebras),
            _ => Err(LlmError::ConfigError(format!("Unknown provider: {}", s))),
        }
    }

    /// Get the environment variable name for this provider's API key
    pub fn env_var(&self) -> Option<&'static str> {
        match self {
            Self::Ollama => None,
            Self::Anthropic => Some("ANTHROPIC_API_KEY"),
            Self::OpenRouter => Some("OPENROUTER_API_KEY"),
            Self::Cerebras => Some("CEREBRAS_API_KEY"),
        }
    }

    fn display_name(&self) -> &'static str {
        match self {
            Self::Ollama => "Ollama",
            Self::Anthropic => "Anthropic",
            Self::OpenRouter => "OpenRouter",
            Self::Cerebras => "Cerebras",
        }
    }
}

/// Create a provider instance from a preset and optional config
pub fn get_provider(
    preset: &ModelPreset,
    provider_config: Option<&ProviderConfig>,
) -> Result<Box<dyn LlmProvider>> {
    let kind = ProviderKind::parse(&preset.provider)?;
    let timeout = ProviderConfig::timeout(provider_config);
    let base_url = provider_config.and_then(|c| c.base_url.as_deref());

    let provider: Box<dyn LlmProvider> = match kind {
        ProviderKind::Ollama => Box::new(OpenAICompatibleProvider::ollama(
            &preset.model,
            base_url,
            timeout,
        )?),
        ProviderKind::Anthropic => {
            let api_key = get_api_key(provider_config, kind)?;
            Box::new(AnthropicProvider::new(
                &preset.model,
                api_key,
                base_url,
                timeout,
            )?)
        }
        ProviderKind::OpenRouter => {
            let api_key = get_api_key(provider_config, kind)?;
            Box::new(OpenAICompatibleProvider::openrouter(
                &preset.model,
                api_key,
                timeout,
            )?)
        }
        ProviderKind::Cerebras => {
            let api_key = get_api_key(provider_config, kind)?;
            Box::new(OpenAICompatibleProvider::cerebras(
                &preset.model,
                api_key,
                timeout,
            )?)
        }
    };

    provider.is_available()?;
    Ok(provider)
}

/// Get API key from config or environment variable
fn get_api_key(config: Option<&ProviderConfig>, kind: ProviderKind) -> Result<String> {
    if let Some(key) = config.and_then(|c| c.api_key.clone()) {
        return Ok(key);
    }

    let env_var = kind.env_var().unwrap_or_default();
    std::env::var(env_var).map_err(|_| LlmError::MissingApiKey {
        provider: kind.display_name().to_string(),
        env_var: env_var.to_string(),
    })
}
