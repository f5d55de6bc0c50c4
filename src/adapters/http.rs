//! HTTP retry helper shared by the API clients
//!
//! Transport errors and 5xx responses are retried with a linear delay, 429 with
//! exponential backoff. Any other status is handed back to the caller.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server error: {0}")]
    Server(StatusCode),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("No attempts made (max_retries = 0)")]
    NoAttempts,
}

/// Delay before the next attempt after a failed one
pub fn backoff_delay(status: Option<StatusCode>, attempt: u32) -> Duration {
    match status {
        Some(StatusCode::TOO_MANY_REQUESTS) => Duration::from_secs(2u64.pow(attempt + 1)), // 2s, 4s, 8s
        _ => Duration::from_millis(500 * (u64::from(attempt) + 1)),
    }
}

/// Execute request with retry logic and rate limit handling
pub async fn send_with_retry<F, Fut>(max_retries: u32, request_fn: F) -> Result<Response, HttpError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut last_error = None;

    for attempt in 0..max_retries {
        let is_last = attempt + 1 == max_retries;
        match request_fn().await {
            Ok(response) => {
                let status = response.status();

                if status == StatusCode::TOO_MANY_REQUESTS {
                    last_error = Some(HttpError::RateLimited);
                } else if status.is_server_error() {
                    last_error = Some(HttpError::Server(status));
                } else {
                    return Ok(response);
                }

                if !is_last {
                    let backoff = backoff_delay(Some(status), attempt);
                    tracing::warn!(
                        "HTTP {} - backing off for {:?} (attempt {}/{})",
                        status, backoff, attempt + 1, max_retries
                    );
                    tokio::time::sleep(backoff).await;
                }
            }
            Err(e) => {
                tracing::warn!("Request error (attempt {}/{}): {}", attempt + 1, max_retries, e);
                last_error = Some(HttpError::Request(e));
                if !is_last {
                    tokio::time::sleep(backoff_delay(None, attempt)).await;
                }
            }
        }
    }

    Err(last_error.unwrap_or(HttpError::NoAttempts))
}
