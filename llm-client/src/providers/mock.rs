//! Mock LLM provider for testing
//!
//! Simulates failures, retries and canned or prompt-dependent responses, and
//! records every prompt it receives.

use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::{LlmError, Result};
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

type Responder = Box<dyn Fn(&LlmRequest) -> Result<String> + Send + Sync>;

enum Behavior {
    /// Fail the first `fail_count` calls with `error`, then answer `response`
    Scripted {
        fail_count: usize,
        error: Option<LlmError>,
        response: String,
    },
    /// Compute the answer from the request
    Responder(Responder),
}

/// A mock provider for testing retry, skip and reduction behavior
pub struct MockProvider {
    behavior: Behavior,
    call_count: AtomicUsize,
    prompts: Mutex<Vec<String>>,
    name: &'static str,
}

impl MockProvider {
    fn scripted(fail_count: usize, error: Option<LlmError>, response: &str) -> Self {
        Self {
            behavior: Behavior::Scripted {
                fail_count,
                error,
                response: response.to_string(),
            },
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    /// Create a provider that fails `n` times with the given error, then succeeds
    pub fn fails_then_succeeds(n: usize, error: LlmError, response: &str) -> Self {
        Self::scripted(n, Some(error), response)
    }

    /// Create a provider that always fails with the given error
    pub fn always_fails(error: LlmError) -> Self {
        Self::scripted(usize::MAX, Some(error), "")
    }

    /// Create a provider that always succeeds
    pub fn always_succeeds(response: &str) -> Self {
        Self::scripted(0, None, response)
    }

    /// Create a provider whose answer is computed from each request
    pub fn with_responder<F>(responder: F) -> Self
    where
        F: Fn(&LlmRequest) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            behavior: Behavior::Responder(Box::new(responder)),
            call_count: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            name: "mock",
        }
    }

    /// Get the number of times complete() was called
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Prompts received so far, in call order
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .map(|p| p.clone())
            .unwrap_or_default()
    }

    /// Set a custom provider name
    pub fn with_name(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let call_num = self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        let content = match &self.behavior {
            Behavior::Scripted {
                fail_count,
                error,
                response,
            } => {
                if call_num < *fail_count {
                    if let Some(err) = error {
                        return Err(clone_error(err));
                    }
                }
                response.clone()
            }
            Behavior::Responder(responder) => responder(&request)?,
        };

        Ok(LlmResponse {
            content,
            model: "mock-model".to_string(),
            usage: None,
        })
    }

    fn name(&self) -> &'static str {
        self.name
    }

    fn is_available(&self) -> Result<()> {
        Ok(())
    }
}

/// Clone an LlmError (needed because LlmError doesn't implement Clone)
fn clone_error(err: &LlmError) -> LlmError {
    match err {
        LlmError::ServerOverloaded { message } => LlmError::ServerOverloaded {
            message: message.clone(),
        },
        LlmError::MissingApiKey { provider, env_var } => LlmError::MissingApiKey {
            provider: provider.clone(),
            env_var: env_var.clone(),
        },
        LlmError::RateLimited { retry_after } => LlmError::RateLimited {
            retry_after: *retry_after,
        },
        LlmError::ApiError {
            message,
            status_code,
        } => LlmError::ApiError {
            message: message.clone(),
            status_code: *status_code,
        },
        LlmError::Timeout { seconds } => LlmError::Timeout { seconds: *seconds },
        LlmError::EmptyCompletion { provider } => LlmError::EmptyCompletion {
            provider: provider.clone(),
        },
        LlmError::ProviderUnavailable(s) => LlmError::ProviderUnavailable(s.clone()),
        LlmError::ConfigError(s) => LlmError::ConfigError(s.clone()),
        LlmError::InvalidPreset(s) => LlmError::InvalidPreset(s.clone()),
        // Io and Toml errors can't be cloned
        LlmError::Io(_) => LlmError::ConfigError("IO error (mock)".to_string()),
        LlmError::TomlParse(_) => LlmError::ConfigError("TOML parse error (mock)".to_string()),
        LlmError::TomlSerialize(_) => {
            LlmError::ConfigError("TOML serialize error (mock)".to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_always_succeeds() {
        let provider = MockProvider::always_succeeds("success");

        let result = provider.complete(LlmRequest::new("test")).await;
        assert_eq!(result.unwrap().content, "success");
        assert_eq!(provider.call_count(), 1);
        assert_eq!(provider.prompts(), vec!["test".to_string()]);
    }

    #[tokio::test]
    async fn test_always_fails() {
        let provider = MockProvider::always_fails(LlmError::ServerOverloaded {
            message: "overloaded".to_string(),
        });
        let request = LlmRequest::new("test");

        for _ in 0..3 {
            let result = provider.complete(request.clone()).await;
            assert!(result.is_err());
        }
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_fails_then_succeeds() {
        let provider = MockProvider::fails_then_succeeds(
            2,
            LlmError::ServerOverloaded {
                message: "overloaded".to_string(),
            },
            "success",
        );
        let request = LlmRequest::new("test");

        assert!(provider.complete(request.clone()).await.is_err());
        assert!(provider.complete(request.clone()).await.is_err());

        let result = provider.complete(request).await;
        assert_eq!(result.unwrap().content, "success");
        assert_eq!(provider.call_count(), 3);
    }

    #[tokio::test]
    async fn test_responder_sees_request() {
        let provider = MockProvider::with_responder(|request| {
            if request.prompt.contains("boom") {
                Err(LlmError::ApiError {
                    message: "boom".into(),
                    status_code: Some(500),
                })
            } else {
                Ok(request.prompt.to_uppercase())
            }
        });

        let ok = provider.complete(LlmRequest::new("quiet")).await.unwrap();
        assert_eq!(ok.content, "QUIET");
        assert!(provider.complete(LlmRequest::new("boom")).await.is_err());
        assert_eq!(provider.call_count(), 2);
    }
}
