//! Bounded retry with exponential backoff for idempotent GETs.
//!
//! Retried:
//! - connection failures and timeouts
//! - HTTP 500, 502, 503 and 504
//!
//! Everything else (4xx included) is returned after a single attempt.

use std::future::Future;
use std::time::Duration;

use reqwest::{Response, StatusCode};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;
pub const DEFAULT_INITIAL_DELAY_MS: u64 = 200;
pub const DEFAULT_MAX_DELAY_MS: u64 = 5000;

/// Server errors worth asking again for
pub const RETRYABLE_STATUSES: [StatusCode; 4] = [
    StatusCode::INTERNAL_SERVER_ERROR,
    StatusCode::BAD_GATEWAY,
    StatusCode::SERVICE_UNAVAILABLE,
    StatusCode::GATEWAY_TIMEOUT,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Total attempts including the first; never less than 1
    pub max_attempts: u32,
    /// Delay before the first retry (doubles each retry)
    pub initial_delay: Duration,
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_INITIAL_DELAY_MS),
            max_delay: Duration::from_millis(DEFAULT_MAX_DELAY_MS),
        }
    }
}

impl RetryConfig {
    pub fn new(max_attempts: u32, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            initial_delay: Duration::from_millis(initial_delay_ms),
            max_delay: Duration::from_millis(max_delay_ms),
        }
    }

    /// Delay before retry number `retry` (0-based): `initial * 2^retry`, capped.
    pub fn delay_for_retry(&self, retry: u32) -> Duration {
        let factor = 2u64.saturating_pow(retry);
        let delay_ms = (self.initial_delay.as_millis() as u64).saturating_mul(factor);
        Duration::from_millis(delay_ms.min(self.max_delay.as_millis() as u64))
    }
}

/// Whether a failed attempt is worth repeating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryDecision {
    Retry,
    NoRetry,
}

/// Classify an HTTP status against [`RETRYABLE_STATUSES`].
pub fn classify_status(status: StatusCode) -> RetryDecision {
    if RETRYABLE_STATUSES.contains(&status) {
        RetryDecision::Retry
    } else {
        RetryDecision::NoRetry
    }
}

/// Classify a transport error; timeouts and connect failures are retried.
pub fn classify_error(error: &reqwest::Error) -> RetryDecision {
    if error.is_timeout() || error.is_connect() {
        return RetryDecision::Retry;
    }
    match error.status() {
        Some(status) => classify_status(status),
        None => RetryDecision::NoRetry,
    }
}

/// What the last attempt produced, and how many attempts it took.
#[derive(Debug)]
pub struct RetryOutcome {
    pub result: Result<Response, reqwest::Error>,
    pub attempts: u32,
}

impl RetryOutcome {
    /// True when the final answer was still retryable, i.e. attempts ran out.
    pub fn exhausted(&self) -> bool {
        let decision = match &self.result {
            Ok(response) => classify_status(response.status()),
            Err(e) => classify_error(e),
        };
        decision == RetryDecision::Retry
    }
}

/// Run `operation` until it yields a non-retryable answer or attempts run out.
///
/// The final response is returned as-is even when its status is retryable, so
/// callers can report the status they gave up on.
pub async fn send_with_retry<F, Fut>(config: &RetryConfig, operation: F) -> RetryOutcome
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let max_attempts = config.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let result = operation().await;

        let decision = match &result {
            Ok(response) => classify_status(response.status()),
            Err(e) => classify_error(e),
        };

        if decision == RetryDecision::NoRetry {
            if attempt > 1 {
                tracing::info!("Request settled after {} attempts", attempt);
            }
            return RetryOutcome { result, attempts: attempt };
        }

        if attempt >= max_attempts {
            tracing::error!("All {} attempts exhausted", max_attempts);
            return RetryOutcome { result, attempts: attempt };
        }

        let delay = config.delay_for_retry(attempt - 1);
        match &result {
            Ok(response) => tracing::warn!(
                "Attempt {} of {} returned {}, retrying in {:?}",
                attempt,
                max_attempts,
                response.status(),
                delay
            ),
            Err(e) => tracing::warn!(
                "Attempt {} of {} failed: {}, retrying in {:?}",
                attempt,
                max_attempts,
                e,
                delay
            ),
        }

        tokio::time::sleep(delay).await;
        attempt += 1;
    }
}
