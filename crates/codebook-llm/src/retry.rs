//! Retry with exponential backoff for LLM calls
//!
//! Wraps a fallible async operation in a bounded retry loop. Each attempt
//! runs under its own timeout; a timeout consumes one attempt and does not
//! cancel the loop. Backoff between attempts grows exponentially with a
//! small random jitter so concurrent callers do not retry in lockstep.

use serde::{Deserialize, Serialize};
use std::future::Future;
use std::time::Duration;
use thiserror::Error;
use tokio::time::{sleep, timeout};
use tracing::{info, warn};

/// Upper bound (exclusive) of the per-sleep jitter, in milliseconds.
const JITTER_MAX_MS: u64 = 100;

/// Retry behavior for a fallible async operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryPolicy {
    /// Maximum number of attempts (a value of 0 is treated as 1)
    pub max_attempts: u32,

    /// Base backoff delay in milliseconds, doubled after each failure
    pub base_delay_ms: u64,

    /// Timeout per attempt in seconds
    pub attempt_timeout_secs: u64,
}

impl RetryPolicy {
    /// Base backoff delay as a Duration.
    pub fn base_delay(&self) -> Duration {
        Duration::from_millis(self.base_delay_ms)
    }

    /// Per-attempt timeout as a Duration.
    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_secs(self.attempt_timeout_secs)
    }
}

impl Default for RetryPolicy {
    /// Three attempts, 1s base delay, 30s per-attempt timeout.
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_ms: 1_000,
            attempt_timeout_secs: 30,
        }
    }
}

/// Failure returned once all attempts are exhausted.
///
/// Always carries the most recent failure; never a synthetic summary error.
#[derive(Debug, Error)]
pub enum RetryError<E: std::error::Error> {
    /// The final attempt exceeded the per-attempt timeout
    #[error("attempt timed out after {timeout:?}")]
    Timeout {
        /// The per-attempt timeout that was exceeded
        timeout: Duration,
    },

    /// The final attempt failed with the operation's own error
    #[error("{0}")]
    Failed(E),
}

/// Run `operation` with retry, backoff, and per-attempt timeouts.
///
/// The operation is a factory invoked once per attempt, so each attempt
/// gets a fresh future. Between failed attempts (never after the last) the
/// loop sleeps for `base_delay * 2^attempt_index` plus up to 100ms of
/// jitter. A success after at least one failure is logged at info; a
/// first-attempt success is not logged.
pub async fn call_with_retry<T, E, F, Fut>(
    policy: &RetryPolicy,
    mut operation: F,
) -> Result<T, RetryError<E>>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::error::Error,
{
    let max_attempts = policy.max_attempts.max(1);
    let mut attempt: u32 = 0;

    loop {
        let failure = match timeout(policy.attempt_timeout(), operation()).await {
            Ok(Ok(result)) => {
                if attempt > 0 {
                    info!(attempt = attempt + 1, "call succeeded after retry");
                }
                return Ok(result);
            }
            Ok(Err(error)) => {
                warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    error = %error,
                    "call failed"
                );
                RetryError::Failed(error)
            }
            Err(_) => {
                warn!(
                    attempt = attempt + 1,
                    max_attempts,
                    timeout_secs = policy.attempt_timeout_secs,
                    "call timed out"
                );
                RetryError::Timeout {
                    timeout: policy.attempt_timeout(),
                }
            }
        };

        attempt += 1;
        if attempt >= max_attempts {
            warn!(max_attempts, "all retry attempts failed");
            return Err(failure);
        }

        let backoff = policy.base_delay() * 2u32.pow(attempt - 1);
        let jitter = Duration::from_millis(fastrand::u64(0..JITTER_MAX_MS));
        sleep(backoff + jitter).await;
    }
}
