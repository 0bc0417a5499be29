//! Summarization handle over an LLM provider.
//!
//! A [`Summarizer`] is built once per run and shared by reference; long
//! passages go through [`long::summarize_long_text`].

pub mod long;

use anyhow::{Context, Result};
use llm_client::{
    Config, LlmError, LlmProvider, LlmRequest, RetryPolicy, complete_with_retry, get_provider,
};

pub use long::{WindowSettings, summarize_long_text};

use crate::text::cleaner::clean_for_prompt;

/// Program name used for per-program defaults in the LLM config.
pub const PROGRAM_NAME: &str = "book-digest";

const SYSTEM_PROMPT: &str = "You summarize passages of fiction and other literature. \
Write plain prose in the third person and the past tense. Keep names, places and the \
order of events. Return only the summary, with no preamble, headings or lists.";

/// Requested summary length in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryLimits {
    pub max_words: usize,
    pub min_words: usize,
}

impl SummaryLimits {
    pub fn new(max_words: usize, min_words: usize) -> Self {
        Self {
            max_words,
            min_words: min_words.min(max_words),
        }
    }

    /// Output token budget, roughly two tokens per requested word.
    fn max_tokens(&self) -> u32 {
        u32::try_from(self.max_words.saturating_mul(2).max(16)).unwrap_or(u32::MAX)
    }
}

pub struct Summarizer {
    provider: Box<dyn LlmProvider>,
    policy: RetryPolicy,
}

impl Summarizer {
    pub fn new(provider: Box<dyn LlmProvider>, policy: RetryPolicy) -> Self {
        Self { provider, policy }
    }

    /// Build from the LLM config, using `preset` or the program default.
    pub fn from_config(preset: Option<&str>, policy: RetryPolicy) -> Result<Self> {
        let config = Config::load().context("Failed to load LLM configuration")?;

        let preset_name = preset.unwrap_or_else(|| config.get_default_for_program(PROGRAM_NAME));
        let preset = config
            .get_preset(preset_name)
            .with_context(|| format!("Unknown preset: {}", preset_name))?;

        let provider_config = config.get_provider_config(&preset.provider);
        let provider = get_provider(preset, provider_config).with_context(|| {
            format!(
                "Failed to initialize provider '{}' for preset '{}'",
                preset.provider, preset_name
            )
        })?;

        log::info!(
            "Using LLM provider: {} (model: {})",
            provider.name(),
            preset.model
        );
        Ok(Self::new(provider, policy))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Summarize one passage within `limits`.
    pub async fn summarize(&self, text: &str, limits: SummaryLimits) -> llm_client::Result<String> {
        let passage = clean_for_prompt(text);
        let prompt = format!(
            "Summarize this literary passage in {} to {} words.\n\n{}",
            limits.min_words, limits.max_words, passage
        );
        let request = LlmRequest::new(prompt)
            .with_system(SYSTEM_PROMPT)
            .with_max_tokens(limits.max_tokens())
            .with_temperature(0.0);

        let response = complete_with_retry(self.provider.as_ref(), request, &self.policy).await?;
        if let Some(usage) = &response.usage {
            log::debug!(
                "Tokens: {} in, {} out",
                usage.input_tokens,
                usage.output_tokens
            );
        }

        let summary = response.content.trim();
        if summary.is_empty() {
            return Err(LlmError::EmptyCompletion {
                provider: self.provider.name().to_string(),
            });
        }
        Ok(summary.to_string())
    }
}
