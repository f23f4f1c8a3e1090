//! Bounded retry with exponential backoff
//!
//! An operation reports one of three outcomes per attempt: done, retry, or
//! abort. [`retry`] keeps calling it until it is done, aborts, or the
//! configured ceiling elapses.

use crate::error::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Result of a single attempt
#[derive(Debug)]
pub enum RetryOutcome<T> {
    /// The operation succeeded
    Done(T),
    /// The operation failed but may succeed later
    Retry(CloudError),
    /// The operation failed and must not be retried
    Abort(CloudError),
}

/// Retry configuration for provider operations
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Total time allowed across all attempts
    pub timeout: Duration,

    /// Initial delay between retries
    pub initial_delay: Duration,

    /// Maximum delay between retries
    pub max_delay: Duration,

    /// Backoff multiplier
    pub backoff_multiplier: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5 * 60),
            initial_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(10),
            backoff_multiplier: 2.0,
        }
    }
}

impl RetryConfig {
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout,
            ..Default::default()
        }
    }

    /// Delay before the attempt following `attempt` (0-based), capped at `max_delay`.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let factor = self.backoff_multiplier.powi(attempt as i32);
        let delay = self.initial_delay.mul_f64(factor);
        delay.min(self.max_delay)
    }
}

/// Run `op` until it returns [`RetryOutcome::Done`] or [`RetryOutcome::Abort`].
///
/// A [`RetryOutcome::Retry`] sleeps with backoff and tries again. When the
/// next sleep would cross `config.timeout` the last retryable error is
/// returned wrapped in [`CloudError::Timeout`].
pub async fn retry<T, F, Fut>(config: &RetryConfig, operation: &str, mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = RetryOutcome<T>>,
{
    let start = Instant::now();
    let mut attempt = 0u32;

    loop {
        match op().await {
            RetryOutcome::Done(value) => {
                tracing::debug!(operation, attempts = attempt + 1, "Operation completed");
                return Ok(value);
            }
            RetryOutcome::Abort(err) => {
                tracing::warn!(operation, attempt, error = %err, "Operation aborted");
                return Err(err);
            }
            RetryOutcome::Retry(err) => {
                let delay = config.delay_for_attempt(attempt);
                let elapsed = start.elapsed();
                if elapsed + delay > config.timeout {
                    return Err(CloudError::Timeout {
                        elapsed,
                        message: format!("{operation}: {err}"),
                    });
                }

                tracing::debug!(
                    operation,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    error = %err,
                    "Retrying"
                );
                sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
