//! Retry with exponential backoff for transient provider failures

use std::time::Duration;

use crate::error::Result;
use crate::provider::{LlmProvider, LlmRequest, LlmResponse};

/// How often and how patiently a request is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first one (at least 1)
    pub max_attempts: u32,
    /// Delay before the first retry; doubled on every further retry
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl RetryPolicy {
    /// A policy that never retries
    pub fn none() -> Self {
        Self {
            max_attempts: 1,
            base_delay: Duration::ZERO,
        }
    }

    /// Backoff before retry number `retry` (1-based)
    fn delay_for(&self, retry: u32) -> Duration {
        let factor = 2u32.saturating_pow(retry.saturating_sub(1));
        self.base_delay.saturating_mul(factor)
    }
}

/// Send `request`, retrying rate limits, overloads and timeouts per `policy`
pub async fn complete_with_retry(
    provider: &dyn LlmProvider,
    request: LlmRequest,
    policy: &RetryPolicy,
) -> Result<LlmResponse> {
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        match provider.complete(request.clone()).await {
            Ok(response) => return Ok(response),
            Err(err) if err.is_retryable() && attempt < max_attempts => {
                let delay = match &err {
                    crate::LlmError::RateLimited {
                        retry_after: Some(secs),
                    } => Duration::from_secs(*secs),
                    _ => policy.delay_for(attempt),
                };
                log::warn!(
                    "{} request failed ({}); retry {}/{} in {:?}",
                    provider.name(),
                    err,
                    attempt,
                    max_attempts - 1,
                    delay
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
