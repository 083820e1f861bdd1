//! Retry and backoff for transient upstream failures.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::StatusCode;
use std::time::Duration;

/// Statuses treated as transient.
pub const RETRYABLE_STATUSES: [u16; 5] = [429, 500, 502, 503, 504];

/// How many times to retry a request, and how long to wait in between.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: u32,
    /// Base delay; doubled on each retry.
    pub backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 5,
            backoff: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    pub fn is_retryable(status: StatusCode) -> bool {
        RETRYABLE_STATUSES.contains(&status.as_u16())
    }

    /// Delay before retry number `attempt` (0-based). A server-supplied `Retry-After` wins.
    pub fn delay(&self, attempt: u32, retry_after: Option<Duration>) -> Duration {
        retry_after.unwrap_or_else(|| {
            self.backoff
                .saturating_mul(2u32.saturating_pow(attempt))
        })
    }
}

/// Reads a `Retry-After` header given in whole seconds.
///
/// HTTP-date values are ignored and fall back to exponential backoff.
pub fn retry_after(headers: &HeaderMap) -> Option<Duration> {
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
