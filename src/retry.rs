//! Retry logic with capped exponential backoff.
//!
//! [`RetryExecutor`] wraps any adapter call with the shared retry protocol:
//! each failure is classified as retryable or fatal, fatal failures return
//! immediately, and retryable failures back off `min(base * 2^attempt, cap)`
//! before the next attempt. Rate limits use the longer base and climb toward
//! the full 30s cap; timeouts and connection failures restart sooner.
//!
//! The per-call timeout is enforced at the transport layer by the adapters,
//! not here, and no deadline spans the whole retry sequence — callers that
//! need an overall budget track elapsed time across calls themselves.

use crate::error::{LlmError, LlmResult};
use crate::logging::{log_debug, log_warn};
use std::time::Duration;
use tokio::time::sleep;

/// Ceiling for any single backoff delay.
pub const RATE_LIMIT_BACKOFF_MAX: Duration = Duration::from_secs(30);

/// Retry policy configuration for LLM requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Retries allowed on top of the initial attempt.
    pub max_retries: u32,
    /// Backoff base for timeouts and transient network failures.
    pub transient_base: Duration,
    /// Backoff base for rate-limited calls.
    pub rate_limit_base: Duration,
    /// Delay ceiling for both failure classes.
    pub backoff_cap: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 3,
            transient_base: Duration::from_secs(1),
            rate_limit_base: Duration::from_secs(2),
            backoff_cap: RATE_LIMIT_BACKOFF_MAX,
        }
    }
}

impl RetryPolicy {
    /// Policy with the given retry budget and default backoff timing.
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Self::default()
        }
    }
}

/// Executes provider calls under a [`RetryPolicy`].
///
/// Generic over the operation, so the same executor wraps every adapter
/// without knowing which backend sits underneath.
#[derive(Debug, Clone, Default)]
pub struct RetryExecutor {
    policy: RetryPolicy,
}

impl RetryExecutor {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Run `operation`, retrying retryable failures up to the policy budget.
    ///
    /// Makes at most `max_retries + 1` underlying calls. A success at any
    /// attempt short-circuits with that attempt's value, and a fatal
    /// classification returns immediately regardless of remaining budget.
    ///
    /// # Errors
    ///
    /// Fatal failures are returned unchanged. When the budget runs out, the
    /// final failure is wrapped in [`LlmError::RetriesExhausted`], which
    /// names the number of attempts made and the last underlying error.
    pub async fn execute<F, Fut, T>(&self, operation: F) -> LlmResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = LlmResult<T>>,
    {
        let mut attempt: u32 = 0;
        loop {
            match operation().await {
                Ok(value) => {
                    if attempt > 0 {
                        log_debug!(attempt = attempt + 1, "call succeeded after retries");
                    }
                    return Ok(value);
                }
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => {
                    if attempt >= self.policy.max_retries {
                        return Err(LlmError::retries_exhausted(attempt + 1, err));
                    }
                    let delay = self.backoff_delay(&err, attempt);
                    log_warn!(
                        attempt = attempt + 1,
                        max_attempts = self.policy.max_retries + 1,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "call failed, retrying after backoff"
                    );
                    sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    /// Delay before the retry that follows failure number `attempt`
    /// (0-based): `min(base * 2^attempt, cap)`, with the base chosen by the
    /// failure class.
    pub fn backoff_delay(&self, error: &LlmError, attempt: u32) -> Duration {
        let base = match error {
            LlmError::RateLimitExceeded { .. } => self.policy.rate_limit_base,
            _ => self.policy.transient_base,
        };
        base.saturating_mul(2u32.saturating_pow(attempt))
            .min(self.policy.backoff_cap)
    }
}
