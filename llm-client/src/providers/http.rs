//! HTTP plumbing shared by the API providers

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

use crate::error::{LlmError, Result};

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// Build a client whose requests give up after `timeout`
pub(crate) fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| LlmError::ConfigError(format!("Failed to build HTTP client: {}", e)))
}

/// Map a transport failure
pub(crate) fn send_error(err: reqwest::Error, timeout: Duration) -> LlmError {
    if err.is_timeout() {
        LlmError::Timeout {
            seconds: timeout.as_secs(),
        }
    } else {
        LlmError::ApiError {
            message: format!("Request failed: {}", err),
            status_code: None,
        }
    }
}

/// Map a non-success response to an error, keeping 429 and 503 distinct for retries
pub(crate) async fn status_error(response: Response) -> LlmError {
    let status = response.status().as_u16();
    let retry_after = response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok());

    let error_text = response.text().await.unwrap_or_default();
    let message = extract_message(&error_text);

    classify(status, retry_after, message)
}

fn extract_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) => body.to_string(),
    }
}

fn classify(status: u16, retry_after: Option<u64>, message: String) -> LlmError {
    match status {
        429 => LlmError::RateLimited { retry_after },
        503 => LlmError::ServerOverloaded { message },
        _ => LlmError::ApiError {
            message,
            status_code: Some(status),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_message_from_json() {
        let body = r#"{"error": {"message": "model not found", "type": "invalid_request"}}"#;
        assert_eq!(extract_message(body), "model not found");
    }

    #[test]
    fn test_extract_message_plain_text() {
        assert_eq!(extract_message("Bad Gateway"), "Bad Gateway");
    }

    #[test]
    fn test_classify_statuses() {
        assert!(matches!(
            classify(429, Some(7), String::new()),
            LlmError::RateLimited {
                retry_after: Some(7)
            }
        ));
        assert!(matches!(
            classify(503, None, "busy".into()),
            LlmError::ServerOverloaded { .. }
        ));
        assert!(matches!(
            classify(401, None, "unauthorized".into()),
            LlmError::ApiError {
                status_code: Some(401),
                ..
            }
        ));
    }
}
