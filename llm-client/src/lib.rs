//! LLM client library for book-digest summarization
//!
//! Provides a unified interface for multiple LLM providers:
//! - Ollama (local, OpenAI-compatible)
//! - Anthropic API (direct)
//! - OpenRouter (multi-model access)
//! - Cerebras (fast Llama inference)
//!
//! Transient failures are retried through [`complete_with_retry`].

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;
pub mod retry;

pub use config::{Config, ModelPreset, ProviderConfig};
pub use error::{LlmError, Result};
pub use provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};
pub use providers::{MockProvider, ProviderKind, get_provider};
pub use retry::{RetryPolicy, complete_with_retry};
